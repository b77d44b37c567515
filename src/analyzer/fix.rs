// src/analyzer/fix.rs

//! Fix mode: remove redundant overrides from the real project

use super::types::{AnalysisReport, Verdict};
use crate::error::Result;
use crate::manifest::{read_manifest, remove_override, write_manifest};
use crate::progress::ProgressTracker;
use crate::resolver::{InstallOptions, Resolver};
use std::path::Path;
use tracing::info;

/// Remove every override the report marks redundant and regenerate the lockfile
///
/// Returns the removed override names in report order. With nothing to remove
/// the project is left untouched. A failing install after the manifest was
/// rewritten is an error; the manifest change is not rolled back.
pub fn apply_fixes(
    cwd: &Path,
    report: &AnalysisReport,
    resolver: &dyn Resolver,
    install: &InstallOptions,
    progress: &dyn ProgressTracker,
) -> Result<Vec<String>> {
    let redundant: Vec<String> = report
        .with_verdict(Verdict::Redundant)
        .map(|r| r.name.clone())
        .collect();
    if redundant.is_empty() {
        return Ok(redundant);
    }

    progress.info("Applying fixes...");

    let mut manifest = read_manifest(cwd)?;
    for name in &redundant {
        manifest = remove_override(&manifest, name);
        progress.info(&format!("Removed override: {}", name));
    }
    write_manifest(cwd, &manifest)?;

    progress.start("Regenerating package-lock.json...");
    let outcome = match resolver.install(cwd, install).and_then(|o| o.into_result()) {
        Ok(outcome) => outcome,
        Err(e) => {
            progress.finish_with_error("Lockfile regeneration failed");
            return Err(e);
        }
    };
    progress.finish_with_message("Lockfile regenerated");
    info!("{} succeeded", outcome.command);

    progress.info(&format!("Removed {} redundant override(s)", redundant.len()));
    Ok(redundant)
}
