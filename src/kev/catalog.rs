//! KEV catalog data structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// CISA KEV feed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KevFeed {
    #[serde(default, rename = "catalogVersion")]
    pub catalog_version: Option<String>,
    #[serde(default, rename = "dateReleased")]
    pub date_released: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub vulnerabilities: Vec<KevRecord>,
}

/// One raw vulnerability record from the feed. Dates arrive as
/// `YYYY-MM-DD` strings and are parsed into [`KevEntry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KevRecord {
    #[serde(rename = "cveID")]
    pub cve_id: String,
    #[serde(default, rename = "vendorProject")]
    pub vendor_project: String,
    #[serde(default)]
    pub product: String,
    #[serde(default, rename = "vulnerabilityName")]
    pub vulnerability_name: String,
    #[serde(rename = "dateAdded")]
    pub date_added: String,
    #[serde(default, rename = "requiredAction")]
    pub required_action: String,
    #[serde(rename = "dueDate")]
    pub due_date: String,
    #[serde(default, rename = "knownRansomwareCampaignUse")]
    pub known_ransomware_campaign_use: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Exploitation metadata for one CVE, dates resolved to calendar days.
///
/// Upstream publishes date-only values with no timezone; they are treated
/// as UTC calendar dates throughout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KevEntry {
    pub cve_id: String,
    pub vendor_project: String,
    pub product: String,
    pub vulnerability_name: String,
    pub date_added: NaiveDate,
    pub required_action: String,
    pub due_date: NaiveDate,
    pub known_ransomware_use: bool,
    pub notes: Option<String>,
}

impl KevEntry {
    /// Parse a raw record. Records with unparseable dates yield `None`
    /// and are skipped by the catalog build; the rest of the feed stays
    /// usable.
    #[must_use]
    pub fn from_record(record: &KevRecord) -> Option<Self> {
        let date_added = parse_kev_date(&record.date_added)?;
        let due_date = parse_kev_date(&record.due_date)?;
        let known_ransomware_use = record.known_ransomware_campaign_use.eq_ignore_ascii_case("known");

        Some(Self {
            cve_id: normalize_cve_id(&record.cve_id),
            vendor_project: record.vendor_project.clone(),
            product: record.product.clone(),
            vulnerability_name: record.vulnerability_name.clone(),
            date_added,
            required_action: record.required_action.clone(),
            due_date,
            known_ransomware_use,
            notes: record.notes.clone(),
        })
    }
}

/// Immutable CVE → exploitation-metadata lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KevCatalog {
    entries: HashMap<String, KevEntry>,
    pub catalog_version: Option<String>,
}

impl KevCatalog {
    /// Build the catalog from a decoded feed, indexing by CVE id.
    #[must_use]
    pub fn from_feed(feed: KevFeed) -> Self {
        let mut entries = HashMap::new();
        let mut skipped = 0usize;

        for record in &feed.vulnerabilities {
            match KevEntry::from_record(record) {
                Some(entry) => {
                    entries.insert(entry.cve_id.clone(), entry);
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!("Skipped {skipped} KEV records with unparseable dates");
        }
        tracing::debug!("Loaded {} KEV entries", entries.len());

        Self {
            entries,
            catalog_version: feed.catalog_version,
        }
    }

    /// Whether a CVE is in the catalog, i.e. known actively exploited.
    #[must_use]
    pub fn contains(&self, cve_id: &str) -> bool {
        self.entries.contains_key(&normalize_cve_id(cve_id))
    }

    /// Get the entry for a CVE. Absence means "not currently known to be
    /// actively exploited".
    #[must_use]
    pub fn get(&self, cve_id: &str) -> Option<&KevEntry> {
        self.entries.get(&normalize_cve_id(cve_id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the feed's `YYYY-MM-DD` date format.
fn parse_kev_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()
}

/// Normalize CVE IDs for consistent lookup.
fn normalize_cve_id(cve_id: &str) -> String {
    cve_id.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cve: &str, due: &str) -> KevRecord {
        KevRecord {
            cve_id: cve.to_string(),
            vendor_project: "Test Vendor".to_string(),
            product: "Test Product".to_string(),
            vulnerability_name: "Test Vulnerability".to_string(),
            date_added: "2024-01-01".to_string(),
            required_action: "Apply updates".to_string(),
            due_date: due.to_string(),
            known_ransomware_campaign_use: "Known".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_parse_kev_date() {
        assert_eq!(
            parse_kev_date("2024-01-15"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert!(parse_kev_date("01/15/2024").is_none());
    }

    #[test]
    fn test_entry_from_record() {
        let entry = KevEntry::from_record(&record("CVE-2024-1234", "2024-02-01")).unwrap();
        assert_eq!(entry.cve_id, "CVE-2024-1234");
        assert_eq!(entry.due_date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert!(entry.known_ransomware_use);
    }

    #[test]
    fn test_entry_with_bad_date_is_skipped() {
        let feed = KevFeed {
            vulnerabilities: vec![
                record("CVE-2024-0001", "2024-02-01"),
                record("CVE-2024-0002", "next Tuesday"),
            ],
            ..Default::default()
        };
        let catalog = KevCatalog::from_feed(feed);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains("CVE-2024-0001"));
        assert!(!catalog.contains("CVE-2024-0002"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let feed = KevFeed {
            vulnerabilities: vec![record("CVE-2024-1234", "2024-02-01")],
            ..Default::default()
        };
        let catalog = KevCatalog::from_feed(feed);
        assert!(catalog.contains("cve-2024-1234"));
        assert!(catalog.get("  CVE-2024-1234 ").is_some());
        assert!(!catalog.contains("CVE-2024-5678"));
    }

    #[test]
    fn test_feed_decodes_cisa_shape() {
        let json = r#"{
            "title": "CISA Catalog of Known Exploited Vulnerabilities",
            "catalogVersion": "2024.06.01",
            "dateReleased": "2024-06-01T12:00:00.000Z",
            "count": 1,
            "vulnerabilities": [{
                "cveID": "CVE-2021-44228",
                "vendorProject": "Apache",
                "product": "Log4j2",
                "vulnerabilityName": "Apache Log4j2 Remote Code Execution Vulnerability",
                "dateAdded": "2021-12-10",
                "shortDescription": "...",
                "requiredAction": "Apply updates per vendor instructions.",
                "dueDate": "2021-12-24",
                "knownRansomwareCampaignUse": "Known",
                "notes": ""
            }]
        }"#;
        let feed: KevFeed = serde_json::from_str(json).unwrap();
        let catalog = KevCatalog::from_feed(feed);
        let entry = catalog.get("CVE-2021-44228").unwrap();
        assert_eq!(entry.vendor_project, "Apache");
        assert_eq!(
            entry.due_date,
            NaiveDate::from_ymd_opt(2021, 12, 24).unwrap()
        );
    }
}
