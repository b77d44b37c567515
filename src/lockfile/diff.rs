// src/lockfile/diff.rs

//! Path-level differences between two lockfiles

use super::{Lockfile, INSTALL_ROOT};
use serde::Serialize;
use std::collections::BTreeSet;

/// How an install path changed between two lockfiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
            Self::Changed => write!(f, "changed"),
        }
    }
}

/// One install path whose resolved version differs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    pub package_path: String,
    pub package_name: String,
    pub before_version: Option<String>,
    pub after_version: Option<String>,
    pub change: ChangeKind,
}

/// Compare two lockfiles path by path
///
/// Unchanged paths and the root project entry are left out.
pub fn diff_lockfiles(before: &Lockfile, after: &Lockfile) -> Vec<DiffEntry> {
    let all_paths: BTreeSet<&String> = before.packages.keys().chain(after.packages.keys()).collect();

    all_paths
        .into_iter()
        .filter(|path| !path.is_empty())
        .filter_map(|path| {
            let before_version = before.packages.get(path).and_then(|p| p.version.clone());
            let after_version = after.packages.get(path).and_then(|p| p.version.clone());

            let change = match (&before_version, &after_version) {
                (None, Some(_)) => ChangeKind::Added,
                (Some(_), None) => ChangeKind::Removed,
                (Some(b), Some(a)) if b != a => ChangeKind::Changed,
                _ => return None,
            };

            Some(DiffEntry {
                package_path: path.clone(),
                package_name: extract_package_name(path).to_string(),
                before_version,
                after_version,
                change,
            })
        })
        .collect()
}

/// Package name installed at a lockfile path
///
/// `node_modules/a/node_modules/b` yields `b`, `node_modules/@scope/pkg`
/// yields `@scope/pkg`. Paths without an install root are returned as-is.
pub fn extract_package_name(package_path: &str) -> &str {
    let marker = format!("{}/", INSTALL_ROOT);
    let Some(start) = package_path.find(&marker) else {
        return package_path;
    };

    let tail = &package_path[start + marker.len()..];
    if tail.is_empty() {
        return package_path;
    }

    let nested = format!("/{}/", INSTALL_ROOT);
    let last = tail.rsplit(nested.as_str()).next().unwrap_or(tail);

    let segment_end = |from: usize| last[from..].find('/').map_or(last.len(), |i| from + i);

    if last.starts_with('@') {
        let scope_end = segment_end(0);
        if scope_end < last.len() {
            return &last[..segment_end(scope_end + 1)];
        }
        return last;
    }

    &last[..segment_end(0)]
}

/// Diffs that concern one package name
pub fn filter_diffs_by_package<'a>(diffs: &'a [DiffEntry], package_name: &str) -> Vec<&'a DiffEntry> {
    diffs
        .iter()
        .filter(|diff| diff.package_name == package_name)
        .collect()
}

/// Check whether any diff concerns the given package
pub fn has_changes_for_package(diffs: &[DiffEntry], package_name: &str) -> bool {
    diffs.iter().any(|diff| diff.package_name == package_name)
}
