// src/analyzer/mod.rs

//! Override analysis
//!
//! Runs the single-override verdict over every analyzable override in a
//! project, in declaration order, and aggregates the results.
//!
//! # Example
//!
//! ```ignore
//! use prune_overrides::analyzer::analyze_overrides;
//! use prune_overrides::config::AnalyzerOptions;
//! use prune_overrides::progress::SilentProgress;
//! use prune_overrides::resolver::NpmResolver;
//!
//! let options = AnalyzerOptions::new(".");
//! let report = analyze_overrides(&options, &NpmResolver::default(), &SilentProgress)?;
//! println!("{} of {} overrides are redundant", report.redundant, report.total);
//! ```

mod fix;
mod types;
mod verdict;

pub use fix::apply_fixes;
pub use types::{AnalysisReport, OverrideResult, Verdict};
pub use verdict::{analyze_single_override, classify};

use crate::config::AnalyzerOptions;
use crate::error::Result;
use crate::manifest::{override_keys, read_manifest, OverrideValue};
use crate::progress::ProgressTracker;
use crate::resolver::{InstallOptions, Resolver};
use std::time::Instant;
use tracing::{debug, info};

/// Analyze every selected override of the project in `options.cwd`
///
/// `include` is applied before `exclude`. Nested (object-valued) overrides are
/// skipped with a warning and do not appear in the report. An error from the
/// resolver itself (npm cannot be run) aborts the whole run.
pub fn analyze_overrides(
    options: &AnalyzerOptions,
    resolver: &dyn Resolver,
    progress: &dyn ProgressTracker,
) -> Result<AnalysisReport> {
    let started = Instant::now();
    options.validate()?;

    let manifest = read_manifest(&options.cwd)?;
    let keys = override_keys(&manifest);
    if keys.is_empty() {
        info!("No overrides found in package.json");
        progress.info("No overrides found in package.json");
        return Ok(AnalysisReport::from_results(Vec::new(), started.elapsed()));
    }

    let selected = select_overrides(keys, &options.include, &options.exclude);
    info!("Found {} override(s) to analyze", selected.len());

    let install = InstallOptions::default().with_timeout(options.timeout);
    let mut results = Vec::with_capacity(selected.len());

    for key in &selected {
        let value = match manifest.override_value(key) {
            Some(OverrideValue::Version(value)) => value,
            Some(OverrideValue::Nested(_)) => {
                progress.warn(&format!(
                    "Skipping complex override: {} (nested overrides not yet supported)",
                    key
                ));
                continue;
            }
            None => continue,
        };

        progress.start(&format!("Analyzing: {}", key));
        let result = match analyze_single_override(&options.cwd, key, value, resolver, &install) {
            Ok(result) => result,
            Err(e) => {
                progress.finish_with_error(&format!("{}: {}", key, e));
                return Err(e);
            }
        };
        progress.finish_with_message(&format!(
            "{}: {} - {}",
            key,
            result.verdict.as_str().to_uppercase(),
            result.reason
        ));
        results.push(result);
    }

    let report = AnalysisReport::from_results(results, started.elapsed());
    debug!(
        "Analysis finished: {} redundant, {} required in {:?}",
        report.redundant, report.required, report.duration
    );
    Ok(report)
}

/// Apply the include whitelist, then the exclude blacklist
///
/// Declaration order is preserved.
pub fn select_overrides(keys: Vec<String>, include: &[String], exclude: &[String]) -> Vec<String> {
    for name in include {
        if !keys.contains(name) {
            debug!("--include names unknown override: {}", name);
        }
    }

    keys.into_iter()
        .filter(|key| include.is_empty() || include.contains(key))
        .filter(|key| !exclude.contains(key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_all_by_default() {
        let keys = names(&["lodash", "axios", "zod"]);
        assert_eq!(select_overrides(keys.clone(), &[], &[]), keys);
    }

    #[test]
    fn test_select_include_keeps_declaration_order() {
        let keys = names(&["lodash", "axios", "zod"]);
        assert_eq!(
            select_overrides(keys, &names(&["zod", "lodash"]), &[]),
            names(&["lodash", "zod"])
        );
    }

    #[test]
    fn test_select_exclude_after_include() {
        let keys = names(&["lodash", "axios", "zod"]);
        assert_eq!(
            select_overrides(keys, &names(&["lodash", "axios"]), &names(&["axios"])),
            names(&["lodash"])
        );
    }

    #[test]
    fn test_select_unknown_include_selects_nothing() {
        let keys = names(&["lodash"]);
        assert!(select_overrides(keys, &names(&["react"]), &[]).is_empty());
    }
}
