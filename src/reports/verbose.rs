//! Verbose per-advisory report.

use super::ansi_color;
use crate::model::{Advisory, AuditVerdict, EnrichedFinding, VulnerabilityCounts};
use std::collections::HashMap;

/// Detailed view: one block per advisory, including advisories that have
/// no CVE (and therefore no enriched finding).
pub struct VerboseReporter {
    colored: bool,
}

impl VerboseReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output.
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    /// Render the severity counts from the report metadata.
    #[must_use]
    pub fn render_counts(&self, counts: &VulnerabilityCounts) -> String {
        let json = serde_json::to_string_pretty(counts)
            .unwrap_or_else(|_| "{}".to_string());
        format!("{} {json}\n", self.color("Vulnerabilities:", "bold"))
    }

    /// Render one block per advisory, enriched where a finding exists.
    #[must_use]
    pub fn render(&self, advisories: &[Advisory], verdict: &AuditVerdict) -> String {
        let by_cve: HashMap<&str, &EnrichedFinding> = verdict
            .findings
            .iter()
            .map(|f| (f.cve.as_str(), f))
            .collect();

        let mut lines = Vec::new();
        for (idx, advisory) in advisories.iter().enumerate() {
            lines.push(format!(
                "{} {}",
                self.color(&format!("Advisory {}:", idx + 1), "bold"),
                advisory.title
            ));
            lines.push(format!("Severity: {}", advisory.severity));
            lines.push(format!("Package: {}", advisory.module_name));
            if let Some(occurrence) = advisory.findings.first() {
                lines.push(format!("  Version: {}", occurrence.version));
                if let Some(path) = occurrence.paths.first() {
                    lines.push(format!("  Path: {path}"));
                }
            }
            lines.push(format!(
                "Vulnerable Versions: {}",
                advisory.vulnerable_versions
            ));
            lines.push(format!("Patched Versions: {}", advisory.patched_display()));
            lines.push(format!("More info: {}", advisory.url));

            if let Some(finding) = advisory.primary_cve().and_then(|cve| by_cve.get(cve)) {
                lines.push(format!("CVSS Score: {}", finding.cvss_score));
                lines.push(format!("CVE: {}", finding.cve));
                match finding.epss_percent {
                    crate::model::EpssPercent::Known(pct) => {
                        lines.push(format!("EPSS Score: {pct}%"));
                    }
                    crate::model::EpssPercent::Unknown => {
                        lines.push("EPSS Score: UNKNOWN".to_string());
                    }
                }
                if finding.is_kev {
                    let due = finding
                        .kev_due_date
                        .map_or_else(String::new, |d| format!(", remediation due {d}"));
                    lines.push(self.color(
                        &format!("Known exploited vulnerability{due}"),
                        "red",
                    ));
                }
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

impl Default for VerboseReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuditOutcome, EpssPercent, Severity};

    fn advisory_fixture() -> Advisory {
        serde_json::from_value(serde_json::json!({
            "title": "Prototype Pollution",
            "module_name": "minimist",
            "severity": "moderate",
            "cves": ["CVE-2020-7598"],
            "cvss": {"score": 5.6},
            "vulnerable_versions": "<0.2.1",
            "patched_versions": ">=0.2.1",
            "url": "https://npmjs.com/advisories/1179",
            "findings": [{"version": "0.0.8", "paths": ["mocha>mkdirp>minimist"]}]
        }))
        .unwrap()
    }

    fn verdict_for(advisory: &Advisory) -> AuditVerdict {
        AuditVerdict {
            findings: vec![EnrichedFinding {
                module: advisory.module_name.clone(),
                severity: Severity::Moderate,
                cve: "CVE-2020-7598".to_string(),
                cvss_score: 5.6,
                epss_probability: Some(0.00514),
                epss_percent: EpssPercent::Known(0.514),
                is_kev: false,
                kev_due_date: None,
                url: advisory.url.clone(),
            }],
            any_unknown_epss: false,
            any_past_due_kev: false,
            any_above_threshold: true,
            outcome: AuditOutcome::ThresholdExceeded,
        }
    }

    #[test]
    fn test_verbose_block_contains_advisory_details() {
        let advisory = advisory_fixture();
        let verdict = verdict_for(&advisory);
        let out = VerboseReporter::new()
            .no_color()
            .render(std::slice::from_ref(&advisory), &verdict);

        assert!(out.contains("Advisory 1: Prototype Pollution"));
        assert!(out.contains("Package: minimist"));
        assert!(out.contains("  Version: 0.0.8"));
        assert!(out.contains("  Path: mocha>mkdirp>minimist"));
        assert!(out.contains("Patched Versions: >=0.2.1"));
        assert!(out.contains("EPSS Score: 0.514%"));
    }

    #[test]
    fn test_advisory_without_cve_has_no_score_block() {
        let mut advisory = advisory_fixture();
        advisory.cves.clear();
        let verdict = AuditVerdict {
            findings: vec![],
            any_unknown_epss: false,
            any_past_due_kev: false,
            any_above_threshold: false,
            outcome: AuditOutcome::AdvisoriesBelowThreshold,
        };
        let out = VerboseReporter::new()
            .no_color()
            .render(std::slice::from_ref(&advisory), &verdict);

        assert!(out.contains("Package: minimist"));
        assert!(!out.contains("EPSS Score:"));
    }

    #[test]
    fn test_unknown_score_renders_sentinel() {
        let advisory = advisory_fixture();
        let mut verdict = verdict_for(&advisory);
        verdict.findings[0].epss_probability = None;
        verdict.findings[0].epss_percent = EpssPercent::Unknown;
        let out = VerboseReporter::new()
            .no_color()
            .render(std::slice::from_ref(&advisory), &verdict);
        assert!(out.contains("EPSS Score: UNKNOWN"));
    }

    #[test]
    fn test_kev_finding_is_flagged() {
        let advisory = advisory_fixture();
        let mut verdict = verdict_for(&advisory);
        verdict.findings[0].is_kev = true;
        verdict.findings[0].kev_due_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 22);
        let out = VerboseReporter::new()
            .no_color()
            .render(std::slice::from_ref(&advisory), &verdict);
        assert!(out.contains("Known exploited vulnerability, remediation due 2024-01-22"));
    }
}
