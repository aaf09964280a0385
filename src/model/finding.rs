//! Derived record types produced by the enrichment join and the verdict
//! engine.

use super::advisory::Severity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Display-rounded EPSS percentage, or the explicit unknown sentinel.
///
/// A CVE too new to be scored is a normal outcome, distinct from a real
/// 0% score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EpssPercent {
    Known(f64),
    Unknown,
}

impl EpssPercent {
    /// Descending order for presentation: higher percentages first,
    /// `Unknown` strictly after every numeric value in both directions.
    #[must_use]
    pub fn cmp_desc(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Known(a), Self::Known(b)) => b.total_cmp(a),
            (Self::Known(_), Self::Unknown) => Ordering::Less,
            (Self::Unknown, Self::Known(_)) => Ordering::Greater,
            (Self::Unknown, Self::Unknown) => Ordering::Equal,
        }
    }

    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for EpssPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(pct) => write!(f, "{pct}"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// One advisory joined against the score store and the KEV catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedFinding {
    pub module: String,
    pub severity: Severity,
    pub cve: String,
    pub cvss_score: f64,
    /// Raw EPSS probability, kept unrounded for the threshold comparison.
    pub epss_probability: Option<f64>,
    /// Display percentage, rounded to 3 decimals.
    pub epss_percent: EpssPercent,
    pub is_kev: bool,
    pub kev_due_date: Option<NaiveDate>,
    pub url: String,
}

impl EnrichedFinding {
    /// KEV remediation deadline has passed (date-only comparison).
    #[must_use]
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.is_kev && self.kev_due_date.is_some_and(|due| due < today)
    }
}

/// Policy knobs for the verdict engine.
#[derive(Debug, Clone, Copy)]
pub struct AuditPolicy {
    /// EPSS probability above which the audit fails. Compared at
    /// 5-decimal precision.
    pub threshold: f64,
    /// Fail the audit when a KEV finding is past its remediation due date.
    pub fail_on_past_due_kev: bool,
}

impl Default for AuditPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            fail_on_past_due_kev: false,
        }
    }
}

/// Final outcome of an audit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOutcome {
    /// No advisories at all.
    Clean,
    /// Advisories exist but policy is not violated.
    AdvisoriesBelowThreshold,
    /// At least one EPSS probability exceeds the threshold.
    ThresholdExceeded,
    /// At least one KEV finding is past due and the policy fails on it.
    PastDueKev,
}

impl AuditOutcome {
    /// Whether this outcome is a policy violation.
    #[must_use]
    pub const fn is_violation(&self) -> bool {
        matches!(self, Self::ThresholdExceeded | Self::PastDueKev)
    }
}

/// Structured result of the verdict engine.
///
/// Findings are sorted descending by EPSS percent with unknown scores
/// trailing; all flags are computed regardless of which one decides the
/// outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditVerdict {
    pub findings: Vec<EnrichedFinding>,
    pub any_unknown_epss: bool,
    pub any_past_due_kev: bool,
    pub any_above_threshold: bool,
    pub outcome: AuditOutcome,
}
