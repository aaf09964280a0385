//! On-disk layout for the cached upstream datasets.
//!
//! A single directory holds the compressed score table, its decompressed
//! form, and the KEV catalog JSON. `--refresh` replaces the files in
//! place; there is no TTL and no atomic swap.

use crate::error::{AuditError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Compressed EPSS score table as downloaded.
const EPSS_ARCHIVE: &str = "epss_scores.csv.gz";
/// Decompressed EPSS score table.
const EPSS_TABLE: &str = "epss_scores.csv";
/// CISA KEV catalog feed.
const KEV_CATALOG: &str = "kev_catalog.json";

/// Cache directory for the audit datasets.
#[derive(Debug, Clone)]
pub struct DataCache {
    dir: PathBuf,
}

impl DataCache {
    /// Open (creating if needed) the cache at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            tracing::info!("Creating cache directory {}", dir.display());
            fs::create_dir_all(&dir).map_err(|e| AuditError::io(&dir, e))?;
        }
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn epss_archive_path(&self) -> PathBuf {
        self.dir.join(EPSS_ARCHIVE)
    }

    #[must_use]
    pub fn epss_table_path(&self) -> PathBuf {
        self.dir.join(EPSS_TABLE)
    }

    #[must_use]
    pub fn kev_catalog_path(&self) -> PathBuf {
        self.dir.join(KEV_CATALOG)
    }

    /// Read a cached file to a string with path context on failure.
    pub fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| AuditError::io(path, e))
    }

    /// Write a cached file with path context on failure.
    pub fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).map_err(|e| AuditError::io(path, e))
    }
}

/// Platform-specific default cache directory: `<cache root>/epss-audit`.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    cache_root()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("epss-audit")
}

/// Get the platform-specific cache root.
fn cache_root() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library").join("Caches"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CACHE_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".cache"))
            })
    }
    #[cfg(target_os = "windows")]
    {
        std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join(".cache"))
    }
}
