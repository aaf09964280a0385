//! CISA Known Exploited Vulnerabilities catalog: feed decoding, file
//! caching, and the in-memory lookup.
//!
//! Presence in the catalog means a vulnerability is confirmed to be
//! exploited in the wild and carries a remediation due date; absence is
//! the common, normal case.

mod catalog;
mod client;

pub use catalog::{KevCatalog, KevEntry, KevFeed, KevRecord};
pub use client::{KevClient, KevClientConfig, KEV_CATALOG_URL};
