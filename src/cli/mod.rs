//! Audit command handler.
//!
//! Orchestrates load project → sync datasets → fetch report → join →
//! decide → render. The structured verdict is mapped to a process exit
//! code here, once, at the outer boundary.

use crate::advisory::{self, RegistryClient, RegistryClientConfig};
use crate::audit;
use crate::cache::DataCache;
use crate::epss::{EpssClient, EpssClientConfig};
use crate::kev::{KevClient, KevClientConfig};
use crate::model::{AuditOutcome, AuditPolicy};
use crate::reports::{self, TableReporter, VerboseReporter};
use anyhow::Result;
use chrono::Utc;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

/// Exit codes for CI/CD integration.
pub mod exit_codes {
    /// Clean result or findings below every policy gate.
    pub const SUCCESS: i32 = 0;
    /// Operational failure: missing project files, upstream errors.
    pub const OPERATIONAL_ERROR: i32 = 1;
    /// Policy violation: threshold exceeded or past-due KEV finding.
    pub const POLICY_VIOLATION: i32 = 2;
}

/// Fully-resolved configuration for one audit run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Directory holding `package.json` and `package-lock.json`.
    pub project_dir: PathBuf,
    /// Dataset cache directory.
    pub cache_dir: PathBuf,
    /// Verdict policy.
    pub policy: AuditPolicy,
    /// Per-advisory detail blocks instead of the table.
    pub verbose: bool,
    /// Re-download cached datasets.
    pub refresh: bool,
    /// Disable colored output.
    pub no_color: bool,
    /// HTTP timeout for all upstream requests.
    pub timeout: Duration,
}

/// Map an audit outcome to its process exit code.
#[must_use]
pub const fn exit_code_for(outcome: AuditOutcome) -> i32 {
    if outcome.is_violation() {
        exit_codes::POLICY_VIOLATION
    } else {
        exit_codes::SUCCESS
    }
}

/// Whether to colorize output, honoring `--no-color`, `NO_COLOR` and TTY
/// detection.
#[must_use]
pub fn should_use_color(no_color_flag: bool) -> bool {
    !no_color_flag
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal()
}

/// Run the audit command.
pub fn run_audit(config: &AuditConfig) -> Result<i32> {
    // Project files are checked before any enrichment work.
    let request = advisory::load_project(&config.project_dir)?;
    println!("Auditing {} v{}\n", request.name, request.version);

    let cache = DataCache::open(&config.cache_dir)?;

    let scores = EpssClient::new(EpssClientConfig {
        timeout: config.timeout,
        refresh: config.refresh,
        ..Default::default()
    })?
    .sync(&cache)?;

    let kev = KevClient::new(KevClientConfig {
        timeout: config.timeout,
        refresh: config.refresh,
        ..Default::default()
    })?
    .sync(&cache)?;

    let report = RegistryClient::new(RegistryClientConfig {
        timeout: config.timeout,
        ..Default::default()
    })?
    .fetch_report(&request)?;

    let advisories = report.advisories();
    let findings = audit::enrich(&advisories, &scores, &kev);
    let verdict = audit::decide(findings, &config.policy, Utc::now().date_naive());

    let colored = should_use_color(config.no_color);
    if config.verbose {
        let reporter = if colored {
            VerboseReporter::new()
        } else {
            VerboseReporter::new().no_color()
        };
        if let Some(counts) = report.metadata.as_ref().and_then(|m| m.vulnerabilities) {
            println!("{}", reporter.render_counts(&counts));
        }
        println!("{}", reporter.render(&advisories, &verdict));
    } else if !verdict.findings.is_empty() {
        let reporter = if colored {
            TableReporter::new()
        } else {
            TableReporter::new().no_color()
        };
        println!("{}\n", reporter.render(&verdict));
    }

    println!(
        "{}",
        reports::render_outcome(&verdict, &config.policy, colored)
    );

    Ok(exit_code_for(verdict.outcome))
}
