//! Report rendering over the audit verdict.
//!
//! A rendering concern layered on top of the enriched finding list: the
//! compact table is the default, the verbose per-advisory view replaces
//! it under `--verbose`. Neither feeds back into the verdict.

mod table;
mod verbose;

pub use table::TableReporter;
pub use verbose::VerboseReporter;

use crate::audit::round_dp;
use crate::model::{AuditOutcome, AuditPolicy, AuditVerdict};

/// Apply ANSI color formatting if colored output is enabled.
pub(crate) fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Closing lines after the findings: policy result and data-quality
/// warnings.
#[must_use]
pub fn render_outcome(verdict: &AuditVerdict, policy: &AuditPolicy, colored: bool) -> String {
    let mut lines = Vec::new();

    if verdict.any_unknown_epss {
        lines.push(ansi_color(
            "Warning: could not find an EPSS score for at least one CVE",
            "yellow",
            colored,
        ));
    }

    match verdict.outcome {
        AuditOutcome::Clean => {
            lines.push(ansi_color("No vulnerabilities found", "green", colored));
        }
        AuditOutcome::AdvisoriesBelowThreshold => {
            lines.push(format!(
                "{} findings, none above EPSS threshold {}",
                verdict.findings.len(),
                round_dp(policy.threshold, 5)
            ));
        }
        AuditOutcome::ThresholdExceeded => {
            if policy.threshold > 0.0 {
                lines.push(ansi_color(
                    &format!(
                        "At least one CVE with EPSS score above threshold {}",
                        round_dp(policy.threshold, 5)
                    ),
                    "red",
                    colored,
                ));
            } else {
                lines.push(ansi_color(
                    "At least one CVE with a known EPSS score",
                    "red",
                    colored,
                ));
            }
        }
        AuditOutcome::PastDueKev => {
            lines.push(ansi_color(
                "At least one finding is past its KEV remediation due date",
                "red",
                colored,
            ));
        }
    }

    lines.join("\n")
}
