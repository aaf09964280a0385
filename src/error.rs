//! Unified error types for epss-audit.
//!
//! Fatal conditions carry enough context (resource, path, URL) to be
//! reported directly to the user; the exit-code mapping happens once in
//! `main`, not here.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for audit operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AuditError {
    /// Required project file is missing from the audited directory.
    ///
    /// Checked before any enrichment work starts.
    #[error(
        "{name} not found in {dir:?}. Run epss-audit in the project root \
         directory where {name} is located."
    )]
    MissingProjectFile { name: &'static str, dir: PathBuf },

    /// A project file exists but could not be decoded.
    #[error("Failed to parse {path:?}: {message}")]
    ProjectParse { path: PathBuf, message: String },

    /// The registry answered with an error payload instead of results.
    #[error("Registry audit error: {payload}")]
    Registry { payload: String },

    /// Network failure fetching an upstream resource.
    #[error("Failed to fetch {resource} from {url}: {message}")]
    Fetch {
        resource: &'static str,
        url: String,
        message: String,
    },

    /// An upstream response could not be decoded.
    #[error("Invalid {resource} response: {message}")]
    InvalidResponse {
        resource: &'static str,
        message: String,
    },

    /// IO errors with path context.
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenient Result type for audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;

impl AuditError {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a fetch error for an upstream resource.
    pub fn fetch(resource: &'static str, url: impl Into<String>, err: &reqwest::Error) -> Self {
        Self::Fetch {
            resource,
            url: url.into(),
            message: err.to_string(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_project_file_display() {
        let err = AuditError::MissingProjectFile {
            name: "package.json",
            dir: PathBuf::from("/work/app"),
        };
        let display = err.to_string();
        assert!(display.contains("package.json"));
        assert!(display.contains("/work/app"));
    }

    #[test]
    fn test_io_error_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = AuditError::io("/cache/epss_scores.csv", io_err);
        assert!(err.to_string().contains("/cache/epss_scores.csv"));
    }

    #[test]
    fn test_registry_error_is_verbatim() {
        let err = AuditError::Registry {
            payload: "{\"error\":\"ENOAUDIT\"}".to_string(),
        };
        assert!(err.to_string().contains("ENOAUDIT"));
    }
}
