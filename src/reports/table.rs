//! Tabular report for shell output.

use super::ansi_color;
use crate::model::{AuditVerdict, EnrichedFinding, EpssPercent, Severity};

const HEADERS: [&str; 5] = ["Module", "Severity", "CVE ID", "CVSS", "EPSS Score (%)"];

/// Compact findings table, one row per enriched finding, in verdict
/// order (descending EPSS percent, unknown scores last).
pub struct TableReporter {
    colored: bool,
}

impl TableReporter {
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

    /// Render the verdict's findings as a table.
    #[must_use]
    pub fn render(&self, verdict: &AuditVerdict) -> String {
        if verdict.findings.is_empty() {
            return String::new();
        }

        let rows: Vec<[String; 5]> = verdict.findings.iter().map(row_cells).collect();

        let mut widths: [usize; 5] = [0; 5];
        for (i, header) in HEADERS.iter().enumerate() {
            widths[i] = header.len();
        }
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(self.color(&format_row(&HEADERS.map(String::from), &widths), "bold"));
        lines.push(self.color(
            &widths
                .iter()
                .map(|w| "─".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
            "dim",
        ));

        for (row, finding) in rows.iter().zip(&verdict.findings) {
            lines.push(self.render_row(row, &widths, finding));
        }

        lines.join("\n")
    }

    fn render_row(&self, row: &[String; 5], widths: &[usize; 5], finding: &EnrichedFinding) -> String {
        let plain = format_row(row, widths);
        match finding.severity {
            Severity::Critical | Severity::High => self.color(&plain, "red"),
            Severity::Moderate => self.color(&plain, "yellow"),
            Severity::Low | Severity::Info => plain,
        }
    }
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn row_cells(finding: &EnrichedFinding) -> [String; 5] {
    let epss = match finding.epss_percent {
        EpssPercent::Known(pct) => pct.to_string(),
        EpssPercent::Unknown => "UNKNOWN".to_string(),
    };
    [
        finding.module.clone(),
        finding.severity.to_string(),
        finding.cve.clone(),
        finding.cvss_score.to_string(),
        epss,
    ]
}

fn format_row(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}
