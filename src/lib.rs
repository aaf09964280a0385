//! **Exploitation-aware dependency auditing for npm projects.**
//!
//! `epss-audit` submits a project's locked dependency tree to the npm
//! quick-audit endpoint, then enriches every advisory with two
//! independently-sourced exploitation signals:
//!
//! - **EPSS**: the published probability (0–1) that the vulnerability
//!   will be exploited in practice, from the daily FIRST.org score table.
//! - **KEV**: presence in CISA's Known Exploited Vulnerabilities catalog,
//!   including the federal remediation due date.
//!
//! The interesting part is the join-and-decide core in [`audit`]: a pure
//! enrichment join over the advisory report, the [`epss::ScoreStore`] and
//! the [`kev::KevCatalog`], folded into a structured
//! [`model::AuditVerdict`] under a configurable policy (EPSS threshold,
//! fail-on-past-due-KEV). Everything else (fetching, gzip, caching,
//! rendering) is replaceable plumbing around that core.
//!
//! ## Library usage
//!
//! ```no_run
//! use epss_audit::audit::{decide, enrich};
//! use epss_audit::epss::ScoreStore;
//! use epss_audit::kev::KevCatalog;
//! use epss_audit::model::AuditPolicy;
//!
//! let scores = ScoreStore::parse("#generated\ncve,epss,percentile\n");
//! let kev = KevCatalog::default();
//! let findings = enrich(&[], &scores, &kev);
//! let verdict = decide(
//!     findings,
//!     &AuditPolicy::default(),
//!     chrono::Utc::now().date_naive(),
//! );
//! assert!(verdict.findings.is_empty());
//! ```
//!
//! ## Exit codes
//!
//! The CLI maps the verdict to exit codes for CI gating: `0` for clean
//! or below-threshold results, `1` for operational errors, `2` for
//! policy violations.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Float casts in rounding helpers are bounded in practice
    clippy::cast_precision_loss,
    // # Errors / # Panics doc sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod advisory;
pub mod audit;
pub mod cache;
pub mod cli;
pub mod epss;
pub mod error;
pub mod kev;
pub mod model;
pub mod reports;

// Re-export main types for convenience
pub use audit::{decide, enrich};
pub use cache::DataCache;
pub use cli::{run_audit, AuditConfig};
pub use epss::{EpssClient, EpssClientConfig, ScoreEntry, ScoreStore};
pub use error::{AuditError, Result};
pub use kev::{KevCatalog, KevClient, KevClientConfig, KevEntry};
pub use model::{
    Advisory, AdvisoryReport, AuditOutcome, AuditPolicy, AuditVerdict, EnrichedFinding,
    EpssPercent, Severity,
};
