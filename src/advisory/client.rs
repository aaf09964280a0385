//! npm registry quick-audit HTTP client.

use super::project::AuditRequest;
use crate::error::{AuditError, Result};
use crate::model::AdvisoryReport;
use std::time::Duration;

/// npm quick-audit endpoint.
pub const QUICK_AUDIT_URL: &str = "https://registry.npmjs.org/-/npm/v1/security/audits/quick";

/// Registry client configuration.
#[derive(Debug, Clone)]
pub struct RegistryClientConfig {
    /// Quick-audit endpoint URL.
    pub url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for RegistryClientConfig {
    fn default() -> Self {
        Self {
            url: QUICK_AUDIT_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the quick-audit endpoint.
pub struct RegistryClient {
    client: reqwest::blocking::Client,
    config: RegistryClientConfig,
}

impl RegistryClient {
    /// Create a new registry client.
    pub fn new(config: RegistryClientConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| AuditError::fetch("advisory report", &config.url, &e))?;

        Ok(Self { client, config })
    }

    /// POST the audit request and decode the advisory report.
    ///
    /// A response carrying an `error` payload is fatal and reported
    /// verbatim.
    pub fn fetch_report(&self, request: &AuditRequest) -> Result<AdvisoryReport> {
        let response = self
            .client
            .post(&self.config.url)
            .json(request)
            .send()
            .map_err(|e| AuditError::fetch("advisory report", &self.config.url, &e))?;

        if !response.status().is_success() {
            return Err(AuditError::InvalidResponse {
                resource: "advisory report",
                message: format!("server returned status {}", response.status()),
            });
        }

        let report: AdvisoryReport =
            response
                .json()
                .map_err(|e| AuditError::InvalidResponse {
                    resource: "advisory report",
                    message: e.to_string(),
                })?;

        if let Some(error) = &report.error {
            let payload = serde_json::to_string_pretty(error)
                .unwrap_or_else(|_| error.to_string());
            return Err(AuditError::Registry { payload });
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let config = RegistryClientConfig::default();
        assert_eq!(config.url, QUICK_AUDIT_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_error_payload_maps_to_registry_error() {
        let report: AdvisoryReport = serde_json::from_str(
            r#"{"error": {"code": "ENOAUDIT", "summary": "endpoint unavailable"}}"#,
        )
        .unwrap();

        // fetch_report surfaces this as AuditError::Registry; the payload
        // check itself is what we exercise here.
        let error = report.error.unwrap();
        let payload = serde_json::to_string_pretty(&error).unwrap();
        assert!(payload.contains("ENOAUDIT"));
    }
}
