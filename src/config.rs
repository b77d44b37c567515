// src/config.rs

//! Run configuration and shared constants

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for a single npm invocation (2 minutes)
pub const DEFAULT_NPM_TIMEOUT: Duration = Duration::from_secs(120);

/// Prefix for trial workspace directory names
pub const TEMP_DIR_PREFIX: &str = "prune-overrides-";

/// Default npm executable
pub const DEFAULT_NPM_PROGRAM: &str = "npm";

/// Viewer that decodes share tokens
pub const DEFAULT_SHARE_BASE_URL: &str = "https://pkief.github.io/prune-overrides/";

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// No redundant overrides (or they were fixed)
    Success = 0,
    /// Redundant overrides were found and left in place
    RedundantFound = 1,
    /// The run could not complete
    Error = 2,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Options for a batch analysis run
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Project directory containing package.json
    pub cwd: PathBuf,
    /// Only analyze these overrides (empty = all)
    pub include: Vec<String>,
    /// Skip these overrides
    pub exclude: Vec<String>,
    /// Upper bound for each npm invocation
    pub timeout: Duration,
}

impl AnalyzerOptions {
    /// Options for a project with no filters and the default timeout
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            include: Vec::new(),
            exclude: Vec::new(),
            timeout: DEFAULT_NPM_TIMEOUT,
        }
    }

    pub fn with_include(mut self, include: Vec<String>) -> Self {
        self.include = include;
        self
    }

    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reject option combinations that cannot mean anything useful
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }

        for name in self.include.iter().chain(&self.exclude) {
            if name.trim().is_empty() {
                return Err(Error::Config("empty package name in --include/--exclude".to_string()));
            }
        }

        Ok(())
    }
}

/// Split `--include`/`--exclude` values on commas and whitespace
pub fn split_names<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| {
            value
                .as_ref()
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}
