//! EPSS score table client with file caching.

use super::store::ScoreStore;
use crate::cache::DataCache;
use crate::error::{AuditError, Result};
use flate2::read::GzDecoder;
use std::io::Read;
use std::time::Duration;

/// Daily EPSS score table, gzipped CSV.
pub const EPSS_SCORES_URL: &str = "https://epss.cyentia.com/epss_scores-current.csv.gz";

/// EPSS client configuration.
#[derive(Debug, Clone)]
pub struct EpssClientConfig {
    /// Score table URL.
    pub url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Re-download and re-decompress even if cached copies exist.
    pub refresh: bool,
}

impl Default for EpssClientConfig {
    fn default() -> Self {
        Self {
            url: EPSS_SCORES_URL.to_string(),
            timeout: Duration::from_secs(30),
            refresh: false,
        }
    }
}

/// Fetches and loads the EPSS score table.
pub struct EpssClient {
    client: reqwest::blocking::Client,
    config: EpssClientConfig,
}

impl EpssClient {
    /// Create a new EPSS client.
    pub fn new(config: EpssClientConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| AuditError::fetch("EPSS scores", &config.url, &e))?;

        Ok(Self { client, config })
    }

    /// Ensure the cached table is present (downloading and decompressing
    /// as needed), then parse it into a store.
    ///
    /// With `refresh` set, both the archive and the decompressed table
    /// are replaced in place before the re-read.
    pub fn sync(&self, cache: &DataCache) -> Result<ScoreStore> {
        let archive_path = cache.epss_archive_path();
        if self.config.refresh || !archive_path.exists() {
            tracing::info!("Downloading EPSS scores from {}", self.config.url);
            let bytes = self.download()?;
            cache.write(&archive_path, &bytes)?;
        }

        let table_path = cache.epss_table_path();
        if self.config.refresh || !table_path.exists() {
            tracing::info!("Decompressing EPSS score table");
            let compressed =
                std::fs::read(&archive_path).map_err(|e| AuditError::io(&archive_path, e))?;
            let table = gunzip(&compressed)
                .map_err(|e| AuditError::io(&archive_path, e))?;
            cache.write(&table_path, &table)?;
        }

        let raw = cache.read_to_string(&table_path)?;
        let store = ScoreStore::parse(&raw);

        if self.config.refresh {
            if let Some(meta) = store.metadata_line() {
                tracing::info!("EPSS scores refreshed: {meta}");
            }
        }

        Ok(store)
    }

    fn download(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.config.url)
            .send()
            .map_err(|e| AuditError::fetch("EPSS scores", &self.config.url, &e))?;

        if !response.status().is_success() {
            return Err(AuditError::InvalidResponse {
                resource: "EPSS scores",
                message: format!("server returned status {}", response.status()),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| AuditError::fetch("EPSS scores", &self.config.url, &e))?;
        Ok(bytes.to_vec())
    }
}

/// Decompress a gzip archive fully into memory.
fn gunzip(compressed: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(compressed);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    const TABLE: &str = "\
#score_date:2024-06-01
cve,epss,percentile
CVE-2023-0001,0.00234,0.4
";

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_client_config_defaults() {
        let config = EpssClientConfig::default();
        assert_eq!(config.url, EPSS_SCORES_URL);
        assert!(!config.refresh);
    }

    #[test]
    fn test_gunzip_roundtrip() {
        let out = gunzip(&gzip(TABLE.as_bytes())).unwrap();
        assert_eq!(out, TABLE.as_bytes());
    }

    #[test]
    fn test_gunzip_rejects_garbage() {
        assert!(gunzip(b"definitely not gzip").is_err());
    }

    #[test]
    fn test_sync_uses_cached_archive_without_refresh() {
        // A populated cache means sync never hits the network: decompress
        // and parse only.
        let temp = TempDir::new().unwrap();
        let cache = DataCache::open(temp.path()).unwrap();
        cache
            .write(&cache.epss_archive_path(), &gzip(TABLE.as_bytes()))
            .unwrap();

        let client = EpssClient::new(EpssClientConfig::default()).unwrap();
        let store = client.sync(&cache).unwrap();
        assert_eq!(store.len(), 1);
        assert!(cache.epss_table_path().exists());
    }

    #[test]
    fn test_sync_prefers_existing_table() {
        // When both files exist, the decompressed table is authoritative.
        let temp = TempDir::new().unwrap();
        let cache = DataCache::open(temp.path()).unwrap();
        cache
            .write(&cache.epss_archive_path(), &gzip(TABLE.as_bytes()))
            .unwrap();
        cache
            .write(
                &cache.epss_table_path(),
                b"#c\nh\nCVE-2020-0001,0.5,0.5\nCVE-2020-0002,0.6,0.6\n",
            )
            .unwrap();

        let client = EpssClient::new(EpssClientConfig::default()).unwrap();
        let store = client.sync(&cache).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.lookup("CVE-2020-0001").is_some());
    }
}
