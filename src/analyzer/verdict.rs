// src/analyzer/verdict.rs

//! Verdict for a single override
//!
//! The override is removed in a trial workspace, npm re-resolves the tree,
//! and the versions of the overridden package before and after are compared:
//!
//! 1. Install fails without the override -> required
//! 2. Package absent both times -> redundant
//! 3. Some version after is older than the minimum before -> required
//! 4. Same version set -> redundant
//! 5. Versions moved, none backwards -> redundant
//!
//! Only regressions keep an override; a version that merely changes (forward)
//! does not.

use super::types::{OverrideResult, Verdict};
use crate::error::Result;
use crate::lockfile::{
    self, diff_lockfiles, filter_diffs_by_package, has_changes_for_package, read_lockfile, Lockfile,
};
use crate::manifest::{read_manifest, remove_override, write_manifest};
use crate::resolver::{InstallOptions, Resolver};
use crate::version::{find_min, older_versions_than, would_introduce_older_versions};
use crate::workspace::TrialWorkspace;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Decide whether one override is still needed
///
/// `cwd` must contain `package.json` and `package-lock.json`. The project
/// itself is only read; all changes happen in a trial workspace that is
/// removed before returning, on every path.
pub fn analyze_single_override(
    cwd: &Path,
    override_key: &str,
    override_value: &str,
    resolver: &dyn Resolver,
    install: &InstallOptions,
) -> Result<OverrideResult> {
    debug!("Analyzing override: {} -> {}", override_key, override_value);

    let baseline = read_lockfile(cwd)?;
    let before = lockfile::resolved_versions(&baseline, override_key);
    debug!(
        "Current versions of {}: {}",
        override_key,
        list_or_none(&before)
    );

    let workspace = TrialWorkspace::create(cwd)?;
    let result = run_trial(
        &workspace,
        &baseline,
        &before,
        override_key,
        override_value,
        resolver,
        install,
    );
    workspace.cleanup();
    result
}

fn run_trial(
    workspace: &TrialWorkspace,
    baseline: &Lockfile,
    before: &[String],
    override_key: &str,
    override_value: &str,
    resolver: &dyn Resolver,
    install: &InstallOptions,
) -> Result<OverrideResult> {
    let manifest = read_manifest(workspace.path())?;
    write_manifest(workspace.path(), &remove_override(&manifest, override_key))?;

    let outcome = resolver.install(workspace.path(), install)?;
    if !outcome.success {
        debug!(
            "{} failed without override {} (exit {:?}, timed out: {})",
            outcome.command, override_key, outcome.exit_code, outcome.timed_out
        );
        return Ok(install_failed(override_key, override_value, before));
    }

    let trial = read_lockfile(workspace.path())?;
    let after = lockfile::resolved_versions(&trial, override_key);
    debug!(
        "Versions of {} without override: {}",
        override_key,
        list_or_none(&after)
    );

    let diffs = diff_lockfiles(baseline, &trial);
    if !has_changes_for_package(&diffs, override_key) {
        debug!("No lockfile changes for {} without override", override_key);
    }
    for diff in filter_diffs_by_package(&diffs, override_key) {
        debug!(
            "  {} {}: {} -> {}",
            diff.change,
            diff.package_path,
            diff.before_version.as_deref().unwrap_or("none"),
            diff.after_version.as_deref().unwrap_or("none")
        );
    }

    Ok(classify(override_key, override_value, before, &after))
}

/// Verdict when npm cannot resolve the tree without the override
pub fn install_failed(override_key: &str, override_value: &str, before: &[String]) -> OverrideResult {
    OverrideResult {
        name: override_key.to_string(),
        override_value: override_value.to_string(),
        before: find_min(before).map(str::to_string),
        after: None,
        verdict: Verdict::Required,
        reason: "npm install fails without this override".to_string(),
    }
}

/// Classify an override from the version sets with and without it
pub fn classify(
    override_key: &str,
    override_value: &str,
    before: &[String],
    after: &[String],
) -> OverrideResult {
    let before_min = find_min(before);
    let after_min = find_min(after);

    let result = |verdict: Verdict, reason: String| OverrideResult {
        name: override_key.to_string(),
        override_value: override_value.to_string(),
        before: before_min.map(str::to_string),
        after: after_min.map(str::to_string),
        verdict,
        reason,
    };

    if before.is_empty() && after.is_empty() {
        return result(
            Verdict::Redundant,
            "package not found in dependency tree".to_string(),
        );
    }

    if would_introduce_older_versions(before, after) {
        let floor = before_min.unwrap_or("0.0.0");
        let older = older_versions_than(after, floor);
        return result(
            Verdict::Required,
            format!(
                "would introduce older version(s): {} (currently all at {} or newer)",
                older.join(", "),
                floor
            ),
        );
    }

    let before_set: BTreeSet<&str> = before.iter().map(String::as_str).collect();
    let after_set: BTreeSet<&str> = after.iter().map(String::as_str).collect();
    if before_set == after_set {
        return result(
            Verdict::Redundant,
            "same version(s) resolve with and without override".to_string(),
        );
    }

    result(
        Verdict::Redundant,
        format!(
            "no older versions would be introduced (before: {}, after: {})",
            list_or_none(before),
            list_or_none(after)
        ),
    )
}

fn list_or_none(versions: &[String]) -> String {
    if versions.is_empty() {
        "none".to_string()
    } else {
        versions.join(", ")
    }
}
