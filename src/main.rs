//! epss-audit: npm dependency audit with EPSS and KEV enrichment

use anyhow::Result;
use clap::Parser;
use epss_audit::{
    cache::default_cache_dir,
    cli::{self, AuditConfig},
    model::AuditPolicy,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "epss-audit")]
#[command(version)]
#[command(about = "Audit npm dependencies with EPSS and CISA KEV enrichment", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  No vulnerabilities, or none above policy gates
    1  Operational error (missing project files, upstream failure)
    2  Policy violation (EPSS threshold exceeded or past-due KEV)

EXAMPLES:
    # Audit the current directory
    epss-audit

    # CI gate: fail on any finding with EPSS probability above 0.1
    epss-audit --threshold 0.1

    # Also fail on KEV entries past their remediation due date
    epss-audit --fail-on-kev

    # Force re-download of the EPSS table and KEV catalog
    epss-audit --refresh")]
struct Cli {
    /// Project directory containing package.json and package-lock.json
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Verbose output: per-advisory detail blocks instead of the table
    #[arg(short, long)]
    verbose: bool,

    /// Refresh cached EPSS scores and KEV catalog
    #[arg(short, long)]
    refresh: bool,

    /// EPSS probability threshold to fail the audit (compared at
    /// 5-decimal precision)
    #[arg(short, long, default_value = "0.0")]
    threshold: f64,

    /// Fail when a finding is past its KEV remediation due date
    #[arg(long)]
    fail_on_kev: bool,

    /// Cache directory for the EPSS table and KEV catalog
    #[arg(long, env = "EPSS_AUDIT_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// API timeout in seconds
    #[arg(long, default_value = "30")]
    api_timeout: u64,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if cli.threshold < 0.0 {
        anyhow::bail!("--threshold must be >= 0.0 (got {})", cli.threshold);
    }

    let config = AuditConfig {
        project_dir: cli.dir,
        cache_dir: cli.cache_dir.unwrap_or_else(default_cache_dir),
        policy: AuditPolicy {
            threshold: cli.threshold,
            fail_on_past_due_kev: cli.fail_on_kev,
        },
        verbose: cli.verbose,
        refresh: cli.refresh,
        no_color: cli.no_color,
        timeout: Duration::from_secs(cli.api_timeout),
    };

    // Operational errors propagate as anyhow failures (exit code 1);
    // policy violations come back as a code from the verdict.
    let exit_code = cli::run_audit(&config)?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
