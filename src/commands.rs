// src/commands.rs
//! Command handler for the prune-overrides CLI

use crate::cli::Cli;
use anyhow::{Context, Result};
use prune_overrides::analyzer::{analyze_overrides, apply_fixes};
use prune_overrides::config::{split_names, AnalyzerOptions, ExitCode};
use prune_overrides::manifest::read_manifest;
use prune_overrides::progress::ProgressTracker;
use prune_overrides::report::{render_json, write_console};
use prune_overrides::resolver::{InstallOptions, Resolver};
use prune_overrides::share::share_url;
use std::io::Write;
use std::time::Duration;
use tracing::info;

/// Analyze, report, optionally share and fix
///
/// Reports go to `out`; status goes through `progress`.
pub fn run<W: Write>(
    cli: &Cli,
    resolver: &dyn Resolver,
    progress: &dyn ProgressTracker,
    out: &mut W,
) -> Result<ExitCode> {
    let timeout = Duration::from_secs(cli.timeout);
    let options = AnalyzerOptions::new(&cli.cwd)
        .with_include(split_names(&cli.include))
        .with_exclude(split_names(&cli.exclude))
        .with_timeout(timeout);

    progress.info("Analyzing npm overrides...");
    let report = analyze_overrides(&options, resolver, progress)?;

    if cli.json {
        let json = render_json(&report).context("Failed to serialize report")?;
        writeln!(out, "{}", json)?;
    } else {
        write_console(out, &report)?;
    }

    if cli.share {
        let manifest = read_manifest(&cli.cwd)?;
        let url = share_url(&cli.share_base, &report, manifest.name())?;
        progress.info("Share this result:");
        writeln!(out, "{}", url)?;
    }

    if cli.fix && report.redundant > 0 {
        let install = InstallOptions::default().with_timeout(timeout);
        let removed = apply_fixes(&cli.cwd, &report, resolver, &install, progress)?;
        info!("Removed overrides: {}", removed.join(", "));
    }

    if report.redundant > 0 && !cli.fix {
        Ok(ExitCode::RedundantFound)
    } else {
        Ok(ExitCode::Success)
    }
}
