// src/lib.rs

//! prune-overrides
//!
//! Finds `overrides` entries in a project's `package.json` that no longer do
//! anything. Each override is removed in a throwaway copy of the project, npm
//! re-resolves the lockfile there, and the resolved versions of the package
//! with and without the override are compared.
//!
//! # Architecture
//!
//! - Trial isolation: the real project is only written by fix mode
//! - Regression-only rule: an override is required only if dropping it lets an
//!   older version into the tree, or breaks the install
//! - Sequential trials: one npm invocation at a time
//! - Pluggable resolver: the analyzer talks to npm through the `Resolver` trait

pub mod analyzer;
pub mod config;
mod error;
pub mod lockfile;
pub mod manifest;
pub mod progress;
pub mod report;
pub mod resolver;
pub mod share;
pub mod version;
pub mod workspace;

pub use analyzer::{
    analyze_overrides, analyze_single_override, apply_fixes, AnalysisReport, OverrideResult,
    Verdict,
};
pub use config::{AnalyzerOptions, ExitCode};
pub use error::{Error, Result};
pub use manifest::{read_manifest, remove_override, write_manifest, Manifest, OverrideValue};
pub use progress::{
    CallbackProgress, CliProgress, LogProgress, ProgressEvent, ProgressTracker, SilentProgress,
};
pub use resolver::{InstallOptions, InstallOutcome, NpmResolver, Resolver};
pub use share::{decode_report, encode_report, DecodedReport};
