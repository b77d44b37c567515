// src/share/legacy.rs

//! Adapters for older share payloads
//!
//! Both shapes predate the names-only format and carried per-override detail.
//! Each adapter is self-contained; dropping support for a shape means deleting
//! its type here and its variant in `Payload`.

use super::DecodedReport;
use crate::analyzer::{AnalysisReport, OverrideResult, Verdict};
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

/// Reasons the coded format could reference by number
const CODE_TO_REASON: &[(u64, &str)] = &[
    (0, "Package not found in dependency tree"),
    (1, "Override matches resolved version"),
    (2, "Override is still required"),
    (3, "Override prevents older version"),
    (4, "Override changes resolved version"),
];

fn verdict_from_code(code: u64) -> Result<Verdict> {
    match code {
        0 => Ok(Verdict::Redundant),
        1 => Ok(Verdict::Required),
        other => Err(Error::DecodeShape(format!("unknown verdict code {}", other))),
    }
}

/// `[customReasons | null, [[name, value, verdict, reasonCode, before?, after?], ...]]`
#[derive(Debug)]
pub(super) struct CodedPayload {
    custom_reasons: HashMap<String, String>,
    entries: Vec<Vec<Value>>,
}

impl CodedPayload {
    pub(super) fn from_items(items: Vec<Value>) -> Result<Self> {
        let mut items = items.into_iter();
        let custom_reasons = match items.next() {
            Some(Value::Object(map)) => reasons(map)?,
            Some(Value::Null) | None => HashMap::new(),
            Some(_) => return Err(shape("custom reasons must be an object or null")),
        };
        let entries = match items.next() {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| shape(&format!("results must be arrays: {}", e)))?,
            None => return Err(shape("missing results")),
        };
        Ok(Self {
            custom_reasons,
            entries,
        })
    }

    fn reason(&self, code: u64) -> String {
        CODE_TO_REASON
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, reason)| reason.to_string())
            .or_else(|| self.custom_reasons.get(&code.to_string()).cloned())
            .unwrap_or_else(|| format!("Unknown reason ({})", code))
    }

    fn entry(&self, entry: &[Value]) -> Result<OverrideResult> {
        let text = |index: usize| entry.get(index).and_then(Value::as_str);
        let number = |index: usize| entry.get(index).and_then(Value::as_u64);

        let name = text(0).ok_or_else(|| shape("result without a name"))?;
        let verdict = number(2)
            .ok_or_else(|| shape("result without a verdict"))
            .and_then(verdict_from_code)?;
        let code = number(3).ok_or_else(|| shape("result without a reason code"))?;

        Ok(OverrideResult {
            name: name.to_string(),
            override_value: text(1).unwrap_or_default().to_string(),
            before: text(4).map(str::to_string),
            after: text(5).map(str::to_string),
            verdict,
            reason: self.reason(code),
        })
    }

    pub(super) fn into_decoded(self) -> Result<DecodedReport> {
        let results = self
            .entries
            .iter()
            .map(|entry| self.entry(entry))
            .collect::<Result<Vec<_>>>()?;
        Ok(DecodedReport {
            project_name: String::new(),
            report: AnalysisReport::from_results(results, Duration::ZERO),
        })
    }
}

fn reasons(map: Map<String, Value>) -> Result<HashMap<String, String>> {
    map.into_iter()
        .map(|(code, reason)| match reason {
            Value::String(reason) => Ok((code, reason)),
            _ => Err(shape("custom reasons must be strings")),
        })
        .collect()
}

/// `{ t, x, q, s: [{ n, o, b?, a?, v, r }], d }`
///
/// The counts are taken as stored, not recomputed.
#[derive(Debug, Deserialize)]
pub(super) struct ObjectPayload {
    t: usize,
    x: usize,
    q: usize,
    s: Vec<ObjectEntry>,
    #[serde(default)]
    d: u64,
}

#[derive(Debug, Deserialize)]
struct ObjectEntry {
    n: String,
    #[serde(default)]
    o: String,
    b: Option<String>,
    a: Option<String>,
    v: u64,
    #[serde(default)]
    r: String,
}

impl ObjectPayload {
    pub(super) fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| shape(&format!("invalid report object: {}", e)))
    }

    pub(super) fn into_decoded(self) -> Result<DecodedReport> {
        let results = self
            .s
            .into_iter()
            .map(|entry| {
                Ok(OverrideResult {
                    name: entry.n,
                    override_value: entry.o,
                    before: entry.b,
                    after: entry.a,
                    verdict: verdict_from_code(entry.v)?,
                    reason: entry.r,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DecodedReport {
            project_name: String::new(),
            report: AnalysisReport {
                total: self.t,
                redundant: self.x,
                required: self.q,
                results,
                duration: Duration::from_millis(self.d),
            },
        })
    }
}

fn shape(message: &str) -> Error {
    Error::DecodeShape(message.to_string())
}
