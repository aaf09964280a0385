//! Core data model: the advisory report consumed from the registry and
//! the enriched records derived from it.

mod advisory;
mod finding;

pub use advisory::{
    Advisory, AdvisoryFinding, AdvisoryReport, Cvss, ReportMetadata, Severity,
    VulnerabilityCounts,
};
pub use finding::{AuditOutcome, AuditPolicy, AuditVerdict, EnrichedFinding, EpssPercent};
