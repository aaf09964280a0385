//! Verdict engine: fold findings and policy into a structured result.

use super::round_dp;
use crate::model::{AuditOutcome, AuditPolicy, AuditVerdict, EnrichedFinding};
use chrono::NaiveDate;

/// Decide the audit outcome for a set of enriched findings.
///
/// `today` is injected by the caller (normally `Utc::now().date_naive()`)
/// so the past-due comparison is deterministic under test.
///
/// All flags are computed and reported regardless of which one decides
/// the outcome; precedence for the outcome itself is fixed: no findings,
/// then past-due KEV (when the policy fails on it), then threshold, then
/// below-threshold.
#[must_use]
pub fn decide(
    mut findings: Vec<EnrichedFinding>,
    policy: &AuditPolicy,
    today: NaiveDate,
) -> AuditVerdict {
    let any_unknown_epss = findings.iter().any(|f| f.epss_percent.is_unknown());
    let any_past_due_kev = findings.iter().any(|f| f.is_past_due(today));

    // The threshold comparison runs at 5-decimal precision on the raw
    // probability, not the 3-decimal display value. Findings without a
    // score cannot exceed the threshold.
    let threshold = round_dp(policy.threshold, 5);
    let any_above_threshold = findings
        .iter()
        .any(|f| f.epss_probability.is_some_and(|p| round_dp(p, 5) > threshold));

    let outcome = if findings.is_empty() {
        AuditOutcome::Clean
    } else if any_past_due_kev && policy.fail_on_past_due_kev {
        AuditOutcome::PastDueKev
    } else if any_above_threshold {
        AuditOutcome::ThresholdExceeded
    } else {
        AuditOutcome::AdvisoriesBelowThreshold
    };

    // Stable sort: ties (and unknown-vs-unknown pairs) keep report order.
    findings.sort_by(|a, b| a.epss_percent.cmp_desc(&b.epss_percent));

    AuditVerdict {
        findings,
        any_unknown_epss,
        any_past_due_kev,
        any_above_threshold,
        outcome,
    }
}
