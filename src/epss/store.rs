//! In-memory EPSS score store.

use std::collections::HashMap;

/// One row of the score table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub cve: String,
    /// Exploitation probability in [0, 1].
    pub epss: f64,
    /// Percentile rank in [0, 1].
    pub percentile: f64,
}

/// Immutable CVE → score lookup built from the published table.
#[derive(Debug, Clone, Default)]
pub struct ScoreStore {
    entries: HashMap<String, ScoreEntry>,
    /// Line 1 of the table, a generation-timestamp comment. Surfaced to
    /// the user after a refresh.
    metadata_line: Option<String>,
}

impl ScoreStore {
    /// Parse the decompressed score table.
    ///
    /// Line 1 is a generation-timestamp comment and line 2 the column
    /// header; neither is data. Malformed rows (wrong field count,
    /// unparseable floats) are skipped, never fatal: the table is still
    /// usable without them.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut entries = HashMap::new();
        let mut metadata_line = None;
        let mut skipped = 0usize;

        for (idx, line) in raw.lines().enumerate() {
            if idx == 0 {
                metadata_line = Some(line.to_string());
                continue;
            }
            if idx == 1 || line.is_empty() {
                continue;
            }

            let mut fields = line.split(',');
            let row = (fields.next(), fields.next(), fields.next(), fields.next());
            let (Some(cve), Some(epss), Some(percentile), None) = row else {
                skipped += 1;
                continue;
            };
            let (Ok(epss), Ok(percentile)) = (epss.parse::<f64>(), percentile.parse::<f64>())
            else {
                skipped += 1;
                continue;
            };

            let cve = normalize_cve_id(cve);
            entries.insert(
                cve.clone(),
                ScoreEntry {
                    cve,
                    epss,
                    percentile,
                },
            );
        }

        if skipped > 0 {
            tracing::debug!("Skipped {skipped} malformed score table rows");
        }
        tracing::debug!("Loaded {} EPSS scores", entries.len());

        Self {
            entries,
            metadata_line,
        }
    }

    /// Look up the score for a CVE. Absence is expected (very new CVEs
    /// have no score yet) and maps to the unknown sentinel downstream.
    #[must_use]
    pub fn lookup(&self, cve: &str) -> Option<&ScoreEntry> {
        self.entries.get(&normalize_cve_id(cve))
    }

    /// The generation-timestamp comment from line 1, if present.
    #[must_use]
    pub fn metadata_line(&self) -> Option<&str> {
        self.metadata_line.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize CVE IDs for consistent lookup.
fn normalize_cve_id(cve_id: &str) -> String {
    cve_id.trim().to_uppercase()
}
