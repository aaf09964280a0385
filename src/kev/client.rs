//! KEV catalog client with file caching.

use super::catalog::{KevCatalog, KevFeed};
use crate::cache::DataCache;
use crate::error::{AuditError, Result};
use std::time::Duration;

/// Default CISA KEV catalog URL.
pub const KEV_CATALOG_URL: &str =
    "https://www.cisa.gov/sites/default/files/feeds/known_exploited_vulnerabilities.json";

/// KEV client configuration.
#[derive(Debug, Clone)]
pub struct KevClientConfig {
    /// KEV catalog URL.
    pub url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Re-download even if a cached copy exists.
    pub refresh: bool,
}

impl Default for KevClientConfig {
    fn default() -> Self {
        Self {
            url: KEV_CATALOG_URL.to_string(),
            timeout: Duration::from_secs(30),
            refresh: false,
        }
    }
}

/// Fetches and loads the KEV catalog.
pub struct KevClient {
    client: reqwest::blocking::Client,
    config: KevClientConfig,
}

impl KevClient {
    /// Create a new KEV client.
    pub fn new(config: KevClientConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| AuditError::fetch("KEV catalog", &config.url, &e))?;

        Ok(Self { client, config })
    }

    /// Ensure the cached feed is present (downloading as needed), then
    /// build the catalog from it.
    pub fn sync(&self, cache: &DataCache) -> Result<KevCatalog> {
        let catalog_path = cache.kev_catalog_path();
        if self.config.refresh || !catalog_path.exists() {
            tracing::info!("Downloading KEV catalog from {}", self.config.url);
            let body = self.download()?;
            cache.write(&catalog_path, body.as_bytes())?;
        }

        let raw = cache.read_to_string(&catalog_path)?;
        let feed: KevFeed =
            serde_json::from_str(&raw).map_err(|e| AuditError::InvalidResponse {
                resource: "KEV catalog",
                message: e.to_string(),
            })?;

        Ok(KevCatalog::from_feed(feed))
    }

    fn download(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.config.url)
            .send()
            .map_err(|e| AuditError::fetch("KEV catalog", &self.config.url, &e))?;

        if !response.status().is_success() {
            return Err(AuditError::InvalidResponse {
                resource: "KEV catalog",
                message: format!("server returned status {}", response.status()),
            });
        }

        response
            .text()
            .map_err(|e| AuditError::fetch("KEV catalog", &self.config.url, &e))
    }
}
