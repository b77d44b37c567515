// src/error.rs

//! Error types for override analysis
//!
//! Every variant carries a stable machine-readable code (see [`Error::code`])
//! that is printed alongside the human message in JSON mode.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the analyzer and its collaborators
#[derive(Error, Debug)]
pub enum Error {
    #[error("package.json not found at {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Invalid JSON in package.json at {}: {source}", .path.display())]
    ManifestMalformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write package.json at {}: {reason}", .path.display())]
    ManifestWrite { path: PathBuf, reason: String },

    #[error("package-lock.json not found at {}. Run 'npm install' first.", .0.display())]
    LockfileNotFound(PathBuf),

    #[error("Invalid package-lock.json at {}: {reason}", .path.display())]
    LockfileMalformed { path: PathBuf, reason: String },

    #[error("{command} failed: {stderr}")]
    Oracle { command: String, stderr: String },

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("Failed to decompress encoded report: {0}")]
    DecodeCorrupt(String),

    #[error("Invalid payload structure: {0}")]
    DecodeShape(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable code for machine consumers
    pub fn code(&self) -> &'static str {
        match self {
            Self::ManifestNotFound(_) | Self::ManifestMalformed { .. } | Self::ManifestWrite { .. } => {
                "PACKAGE_JSON_ERROR"
            }
            Self::LockfileNotFound(_) | Self::LockfileMalformed { .. } => "LOCKFILE_ERROR",
            Self::Oracle { .. } => "NPM_ERROR",
            Self::Workspace(_) => "WORKSPACE_ERROR",
            Self::DecodeCorrupt(_) | Self::DecodeShape(_) => "DECODE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

/// Result type for override analysis
pub type Result<T> = std::result::Result<T, Error>;
