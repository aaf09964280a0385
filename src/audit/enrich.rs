//! Enrichment join: advisories × score store × KEV catalog.

use super::round_dp;
use crate::epss::ScoreStore;
use crate::kev::KevCatalog;
use crate::model::{Advisory, EnrichedFinding, EpssPercent};

/// Join each advisory against the score store and the KEV catalog.
///
/// Only the first CVE of a multi-CVE advisory is evaluated; advisories
/// with multiple CVEs are deliberately under-represented rather than
/// expanded. Advisories with no CVE at all are excluded entirely (there
/// is nothing to score against).
///
/// Pure with respect to its three inputs; no I/O.
#[must_use]
pub fn enrich(
    advisories: &[Advisory],
    scores: &ScoreStore,
    kev: &KevCatalog,
) -> Vec<EnrichedFinding> {
    advisories
        .iter()
        .filter_map(|advisory| {
            let cve = advisory.primary_cve()?;

            let (epss_probability, epss_percent) = match scores.lookup(cve) {
                Some(entry) => (
                    Some(entry.epss),
                    EpssPercent::Known(round_dp(entry.epss * 100.0, 3)),
                ),
                None => (None, EpssPercent::Unknown),
            };

            let kev_entry = kev.get(cve);

            Some(EnrichedFinding {
                module: advisory.module_name.clone(),
                severity: advisory.severity,
                cve: cve.to_string(),
                cvss_score: advisory.cvss.score,
                epss_probability,
                epss_percent,
                is_kev: kev_entry.is_some(),
                kev_due_date: kev_entry.map(|e| e.due_date),
                url: advisory.url.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kev::KevFeed;
    use crate::model::Severity;

    fn advisory(module: &str, cves: &[&str]) -> Advisory {
        serde_json::from_value(serde_json::json!({
            "module_name": module,
            "severity": "high",
            "cves": cves,
            "cvss": {"score": 7.5},
            "url": format!("https://npmjs.com/advisories/{module}")
        }))
        .unwrap()
    }

    fn scores() -> ScoreStore {
        ScoreStore::parse(
            "#comment\ncve,epss,percentile\nCVE-2023-0001,0.00234,0.4\nCVE-2023-0003,0.97,0.999\n",
        )
    }

    fn kev_with(cve: &str, due: &str) -> KevCatalog {
        let feed: KevFeed = serde_json::from_value(serde_json::json!({
            "vulnerabilities": [{
                "cveID": cve,
                "vendorProject": "Acme",
                "product": "Widget",
                "vulnerabilityName": "Acme Widget RCE",
                "dateAdded": "2024-01-01",
                "requiredAction": "Apply updates",
                "dueDate": due,
                "knownRansomwareCampaignUse": "Unknown"
            }]
        }))
        .unwrap();
        KevCatalog::from_feed(feed)
    }

    #[test]
    fn test_empty_cve_advisories_are_excluded() {
        let advisories = vec![
            advisory("no-cve", &[]),
            advisory("scored", &["CVE-2023-0001"]),
        ];
        let findings = enrich(&advisories, &scores(), &KevCatalog::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].module, "scored");
    }

    #[test]
    fn test_only_first_cve_is_evaluated() {
        let advisories = vec![advisory("multi", &["CVE-2023-0001", "CVE-2023-0003"])];
        let findings = enrich(&advisories, &scores(), &KevCatalog::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].cve, "CVE-2023-0001");
        assert_eq!(findings[0].epss_percent, EpssPercent::Known(0.234));
    }

    #[test]
    fn test_epss_percent_is_display_rounded() {
        let advisories = vec![advisory("a", &["CVE-2023-0003"])];
        let findings = enrich(&advisories, &scores(), &KevCatalog::default());
        assert_eq!(findings[0].epss_percent, EpssPercent::Known(97.0));
        assert_eq!(findings[0].epss_probability, Some(0.97));
    }

    #[test]
    fn test_unknown_cve_yields_sentinel_not_zero() {
        let advisories = vec![advisory("a", &["CVE-2099-9999"])];
        let findings = enrich(&advisories, &scores(), &KevCatalog::default());
        assert_eq!(findings[0].epss_percent, EpssPercent::Unknown);
        assert_eq!(findings[0].epss_probability, None);
        assert_ne!(findings[0].epss_percent, EpssPercent::Known(0.0));
    }

    #[test]
    fn test_kev_fields_copied_when_present() {
        let advisories = vec![
            advisory("listed", &["CVE-2023-0001"]),
            advisory("unlisted", &["CVE-2023-0003"]),
        ];
        let kev = kev_with("CVE-2023-0001", "2024-01-22");
        let findings = enrich(&advisories, &scores(), &kev);

        assert!(findings[0].is_kev);
        assert_eq!(
            findings[0].kev_due_date,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 22)
        );
        assert!(!findings[1].is_kev);
        assert_eq!(findings[1].kev_due_date, None);
    }

    #[test]
    fn test_severity_and_cvss_carried_through() {
        let advisories = vec![advisory("a", &["CVE-2023-0001"])];
        let findings = enrich(&advisories, &scores(), &KevCatalog::default());
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].cvss_score, 7.5);
    }
}
