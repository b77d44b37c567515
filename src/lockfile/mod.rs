// src/lockfile/mod.rs

//! Resolution snapshot (`package-lock.json`) access
//!
//! Only the `packages` section (lockfile v2/v3) is understood. It maps install
//! paths such as `node_modules/a/node_modules/b` to the package record that
//! npm placed there. The root project lives under the empty path.

pub mod diff;

pub use diff::{
    diff_lockfiles, extract_package_name, filter_diffs_by_package, has_changes_for_package,
    ChangeKind, DiffEntry,
};

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Lockfile name inside a project directory
pub const LOCKFILE_FILE: &str = "package-lock.json";

/// Prefix npm uses for every installed package path segment
pub const INSTALL_ROOT: &str = "node_modules";

/// A parsed `package-lock.json`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lockfile {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    /// Absent in some hand-written fixtures; npm always writes it
    #[serde(default)]
    pub lockfile_version: u64,

    /// Install path -> package record
    pub packages: BTreeMap<String, LockedPackage>,
}

/// One installed package record
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LockedPackage {
    /// Link entries and some root records carry no version
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub resolved: Option<String>,

    #[serde(default)]
    pub integrity: Option<String>,

    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// Everything else npm records (`dev`, `license`, `engines`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Lockfile {
    /// Parse lockfile content; `path` is only used for error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let malformed = |reason: String| Error::LockfileMalformed {
            path: path.to_path_buf(),
            reason,
        };

        let raw: Value =
            serde_json::from_str(content).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

        match raw.get("packages") {
            Some(Value::Object(_)) => {}
            Some(_) => return Err(malformed("'packages' is not an object".to_string())),
            None => return Err(malformed("missing 'packages' field".to_string())),
        }

        serde_json::from_value(raw).map_err(|e| malformed(e.to_string()))
    }
}

/// Read and parse `package-lock.json` from a project directory
pub fn read_lockfile(dir: &Path) -> Result<Lockfile> {
    let path = dir.join(LOCKFILE_FILE);
    let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::LockfileNotFound(path.clone()),
        _ => Error::Io(e),
    })?;
    Lockfile::parse(&content, &path)
}

/// Check whether an install path holds the package `name`
///
/// Matches top-level installs (`node_modules/name`) as well as nested
/// duplicates (`.../node_modules/name`), including scoped names.
pub fn path_matches(install_path: &str, name: &str) -> bool {
    let Some(rest) = install_path.strip_suffix(name) else {
        return false;
    };
    let Some(rest) = rest.strip_suffix('/') else {
        return false;
    };
    let Some(rest) = rest.strip_suffix(INSTALL_ROOT) else {
        return false;
    };
    rest.is_empty() || rest.ends_with('/')
}

/// All distinct versions of `name` anywhere in the tree, in path order
pub fn resolved_versions(lockfile: &Lockfile, name: &str) -> Vec<String> {
    let mut versions: Vec<String> = Vec::new();

    for (install_path, package) in &lockfile.packages {
        if !path_matches(install_path, name) {
            continue;
        }
        if let Some(version) = &package.version
            && !versions.contains(version)
        {
            versions.push(version.clone());
        }
    }

    versions
}
