//! Project file reading and audit request construction.

use crate::error::{AuditError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The manifest fields consumed from `package.json`.
#[derive(Debug, Clone, Default, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    dependencies: IndexMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: IndexMap<String, String>,
    #[serde(default, rename = "peerDependencies")]
    peer_dependencies: IndexMap<String, String>,
    #[serde(default, rename = "optionalDependencies")]
    optional_dependencies: IndexMap<String, String>,
}

/// The lockfile fields consumed from `package-lock.json`.
///
/// The dependency tree is passed through to the registry opaquely; this
/// tool does not resolve it.
#[derive(Debug, Clone, Default, Deserialize)]
struct PackageLock {
    #[serde(default)]
    dependencies: serde_json::Value,
}

/// Request body for the quick-audit endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRequest {
    pub name: String,
    pub version: String,
    /// Direct requirements, merged from all dependency groups.
    pub requires: IndexMap<String, String>,
    /// Locked dependency tree, passed through verbatim.
    pub dependencies: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npm_version: Option<String>,
}

/// Read `package.json` and `package-lock.json` from `dir` and build the
/// audit request.
///
/// Both files are required; a missing one is fatal before any enrichment
/// work starts.
pub fn load_project(dir: &Path) -> Result<AuditRequest> {
    let manifest: PackageManifest = read_json(dir, "package.json")?;
    let lock: PackageLock = read_json(dir, "package-lock.json")?;

    // Merge order matches npm's own precedence: regular dependencies win
    // over dev, peer and optional entries for the same name.
    let mut requires = IndexMap::new();
    requires.extend(manifest.dev_dependencies);
    requires.extend(manifest.peer_dependencies);
    requires.extend(manifest.optional_dependencies);
    requires.extend(manifest.dependencies);

    Ok(AuditRequest {
        name: manifest.name,
        version: manifest.version,
        requires,
        dependencies: lock.dependencies,
        node_version: std::env::var("NODE_VERSION").ok(),
        npm_version: std::env::var("npm_version").ok(),
    })
}

fn read_json<T: serde::de::DeserializeOwned>(dir: &Path, name: &'static str) -> Result<T> {
    let path = dir.join(name);
    if !path.exists() {
        return Err(AuditError::MissingProjectFile {
            name,
            dir: dir.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(&path).map_err(|e| AuditError::io(&path, e))?;
    serde_json::from_str(&raw).map_err(|e| AuditError::ProjectParse {
        path,
        message: e.to_string(),
    })
}
