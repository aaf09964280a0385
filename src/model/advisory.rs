//! Advisory report types as returned by the npm quick-audit endpoint.
//!
//! All optional upstream fields are decoded explicitly here, at the
//! boundary, with defined fallbacks; downstream logic never touches raw
//! JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Advisory severity as reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Moderate,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// CVSS block of an advisory. Absent blocks decode to a 0.0 score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cvss {
    #[serde(default)]
    pub score: f64,
}

/// A concrete occurrence of an advisory in the dependency tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisoryFinding {
    #[serde(default)]
    pub version: String,
    /// Require-paths through the tree that reach the vulnerable version.
    #[serde(default)]
    pub paths: Vec<String>,
}

/// A single advisory record.
///
/// Only the first CVE of `cves` is ever evaluated downstream; see
/// `audit::enrich`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    #[serde(default)]
    pub title: String,
    pub module_name: String,
    pub severity: Severity,
    #[serde(default)]
    pub cves: Vec<String>,
    #[serde(default)]
    pub cvss: Cvss,
    #[serde(default)]
    pub vulnerable_versions: String,
    /// None means the registry reports no patched release yet.
    #[serde(default)]
    pub patched_versions: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub findings: Vec<AdvisoryFinding>,
}

impl Advisory {
    /// The primary CVE of this advisory, if it has one.
    #[must_use]
    pub fn primary_cve(&self) -> Option<&str> {
        self.cves.first().map(String::as_str)
    }

    /// Patched-versions range for display, with the no-patch fallback.
    #[must_use]
    pub fn patched_display(&self) -> &str {
        self.patched_versions
            .as_deref()
            .unwrap_or("No patch available")
    }
}

/// Per-severity vulnerability counts from the report metadata.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VulnerabilityCounts {
    #[serde(default)]
    pub info: u64,
    #[serde(default)]
    pub low: u64,
    #[serde(default)]
    pub moderate: u64,
    #[serde(default)]
    pub high: u64,
    #[serde(default)]
    pub critical: u64,
}

/// Metadata block of the audit response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMetadata {
    #[serde(default)]
    pub vulnerabilities: Option<VulnerabilityCounts>,
}

/// The full quick-audit response.
///
/// The advisory map preserves response order (`IndexMap`), which is the
/// stable fallback ordering for equal-EPSS findings in the final report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisoryReport {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: Option<ReportMetadata>,
    #[serde(default)]
    pub advisories: IndexMap<String, Advisory>,
}

impl AdvisoryReport {
    /// Advisories in response order.
    #[must_use]
    pub fn advisories(&self) -> Vec<Advisory> {
        self.advisories.values().cloned().collect()
    }
}
