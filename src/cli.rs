// src/cli.rs
//! CLI definitions for prune-overrides
//!
//! The actual command implementation is in the `commands` module.

use clap::Parser;
use prune_overrides::config::{DEFAULT_NPM_PROGRAM, DEFAULT_NPM_TIMEOUT, DEFAULT_SHARE_BASE_URL};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "prune-overrides")]
#[command(author, version)]
#[command(about = "Find and remove redundant npm overrides", long_about = None)]
pub struct Cli {
    /// Remove redundant overrides and regenerate package-lock.json
    #[arg(long)]
    pub fix: bool,

    /// Print the report as JSON (suppresses progress output)
    #[arg(long)]
    pub json: bool,

    /// Only analyze these overrides (comma or space separated)
    #[arg(long, value_name = "NAMES", num_args = 1..)]
    pub include: Vec<String>,

    /// Skip these overrides (comma or space separated)
    #[arg(long, value_name = "NAMES", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Project directory containing package.json
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub cwd: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print a shareable link to the result
    #[arg(long)]
    pub share: bool,

    /// Viewer URL the share token is appended to
    #[arg(long, value_name = "URL", default_value = DEFAULT_SHARE_BASE_URL)]
    pub share_base: String,

    /// Timeout for each npm invocation, in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_NPM_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// npm executable to run
    #[arg(long, value_name = "PATH", env = "PRUNE_OVERRIDES_NPM", default_value = DEFAULT_NPM_PROGRAM)]
    pub npm: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["prune-overrides"]);
        assert!(!cli.fix);
        assert!(!cli.json);
        assert_eq!(cli.cwd, PathBuf::from("."));
        assert_eq!(cli.timeout, 120);
        assert_eq!(cli.share_base, DEFAULT_SHARE_BASE_URL);
        assert!(cli.include.is_empty());
    }

    #[test]
    fn test_filters_accept_several_values() {
        let cli = Cli::parse_from([
            "prune-overrides",
            "--include",
            "lodash",
            "axios,zod",
            "--exclude",
            "react",
            "--json",
        ]);
        assert_eq!(cli.include, vec!["lodash", "axios,zod"]);
        assert_eq!(cli.exclude, vec!["react"]);
        assert!(cli.json);
    }
}
