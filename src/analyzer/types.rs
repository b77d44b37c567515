// src/analyzer/types.rs

//! Result types produced by the analyzer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Whether an override can go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Removing it leaves no older version in the tree
    Redundant,
    /// Removing it introduces an older version or breaks install
    Required,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Redundant => "redundant",
            Self::Required => "required",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for a single override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideResult {
    /// Override key (package name)
    pub name: String,
    /// Override value (version constraint)
    pub override_value: String,
    /// Minimum resolved version with the override
    pub before: Option<String>,
    /// Minimum resolved version without the override
    pub after: Option<String>,
    pub verdict: Verdict,
    pub reason: String,
}

impl OverrideResult {
    pub fn is_redundant(&self) -> bool {
        self.verdict == Verdict::Redundant
    }
}

/// Aggregate result of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    pub total: usize,
    pub redundant: usize,
    pub required: usize,
    /// In override declaration order
    pub results: Vec<OverrideResult>,
    pub duration: Duration,
}

impl AnalysisReport {
    /// Build a report, deriving the counts from `results`
    pub fn from_results(results: Vec<OverrideResult>, duration: Duration) -> Self {
        let redundant = results.iter().filter(|r| r.is_redundant()).count();
        Self {
            total: results.len(),
            redundant,
            required: results.len() - redundant,
            results,
            duration,
        }
    }

    /// Results with the given verdict, in order
    pub fn with_verdict(&self, verdict: Verdict) -> impl Iterator<Item = &OverrideResult> {
        self.results.iter().filter(move |r| r.verdict == verdict)
    }
}
