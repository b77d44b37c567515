// src/report/json.rs

//! Machine-readable report

use crate::analyzer::{AnalysisReport, Verdict};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSummary {
    pub total: usize,
    pub redundant: usize,
    pub required: usize,
    pub duration_ms: u128,
}

#[derive(Debug, Serialize)]
pub struct JsonOverride<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub verdict: Verdict,
    pub before: Option<&'a str>,
    pub after: Option<&'a str>,
    pub reason: &'a str,
}

/// `{ "summary": {...}, "overrides": [...] }`
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub summary: JsonSummary,
    pub overrides: Vec<JsonOverride<'a>>,
}

impl<'a> From<&'a AnalysisReport> for JsonReport<'a> {
    fn from(report: &'a AnalysisReport) -> Self {
        Self {
            summary: JsonSummary {
                total: report.total,
                redundant: report.redundant,
                required: report.required,
                duration_ms: report.duration.as_millis(),
            },
            overrides: report
                .results
                .iter()
                .map(|r| JsonOverride {
                    name: &r.name,
                    value: &r.override_value,
                    verdict: r.verdict,
                    before: r.before.as_deref(),
                    after: r.after.as_deref(),
                    reason: &r.reason,
                })
                .collect(),
        }
    }
}

/// Pretty-printed JSON report
pub fn render_json(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::from(report))
}
