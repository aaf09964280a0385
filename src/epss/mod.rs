//! EPSS score table: download, decompression, and the in-memory store.
//!
//! EPSS publishes a daily gzipped CSV of exploit-prediction probabilities
//! keyed by CVE. The store is built once per run and read-only afterward.

mod client;
mod store;

pub use client::{EpssClient, EpssClientConfig, EPSS_SCORES_URL};
pub use store::{ScoreEntry, ScoreStore};
