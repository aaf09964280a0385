//! Advisory source: project manifest/lockfile reading and the registry
//! quick-audit client.
//!
//! This is the external collaborator that supplies the raw advisory
//! report; the core join logic never performs I/O itself.

mod client;
mod project;

pub use client::{RegistryClient, RegistryClientConfig, QUICK_AUDIT_URL};
pub use project::{load_project, AuditRequest};
