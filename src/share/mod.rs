// src/share/mod.rs

//! Compact share tokens for analysis reports
//!
//! A token carries only the project name and the override names grouped by
//! verdict: `["my-app", ["lodash"], ["undici"]]`. Reasons and versions are
//! dropped. The JSON is compressed with lz-string into its URI-safe alphabet,
//! the format the web viewer reads from the `d` query parameter.
//!
//! Decoding also accepts the older payload shapes still found in shared
//! links (see [`legacy`]). The shape is detected first, then converted by
//! its own adapter.

mod legacy;

use crate::analyzer::{AnalysisReport, OverrideResult, Verdict};
use crate::error::{Error, Result};
use serde_json::Value;
use std::time::Duration;

/// Placeholder reason for decoded redundant entries
pub const REDUNDANT_PLACEHOLDER: &str = "can be safely removed";

/// Placeholder reason for decoded required entries
pub const REQUIRED_PLACEHOLDER: &str = "still required";

/// Report restored from a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedReport {
    /// Empty when the token carried no name
    pub project_name: String,
    pub report: AnalysisReport,
}

/// Encode a report into a URL-safe token
pub fn encode_report(report: &AnalysisReport, project_name: Option<&str>) -> Result<String> {
    let redundant: Vec<&str> = report
        .with_verdict(Verdict::Redundant)
        .map(|r| r.name.as_str())
        .collect();
    let required: Vec<&str> = report
        .with_verdict(Verdict::Required)
        .map(|r| r.name.as_str())
        .collect();

    let json = serde_json::to_string(&(project_name.unwrap_or(""), redundant, required))
        .map_err(|e| Error::Io(e.into()))?;
    Ok(pack(&json))
}

/// Decode a token produced by [`encode_report`] or an older encoder
pub fn decode_report(token: &str) -> Result<DecodedReport> {
    let json = unpack(token)?;
    let value: Value = serde_json::from_str(&json).map_err(|e| {
        Error::DecodeCorrupt(format!("decompressed data is not valid JSON: {}", e))
    })?;
    Payload::detect(value)?.into_decoded()
}

/// Full share URL for a report
pub fn share_url(base_url: &str, report: &AnalysisReport, project_name: Option<&str>) -> Result<String> {
    let token = encode_report(report, project_name)?;
    let separator = if base_url.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}d={}", base_url, separator, token))
}

fn pack(json: &str) -> String {
    lz_str::compress_to_encoded_uri_component(json)
}

fn unpack(token: &str) -> Result<String> {
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::DecodeCorrupt("empty token".to_string()));
    }

    let wide = lz_str::decompress_from_encoded_uri_component(token)
        .ok_or_else(|| Error::DecodeCorrupt("invalid data".to_string()))?;
    if wide.is_empty() {
        return Err(Error::DecodeCorrupt("invalid data".to_string()));
    }

    String::from_utf16(&wide).map_err(|e| Error::DecodeCorrupt(e.to_string()))
}

/// Every payload shape the decoder understands
#[derive(Debug)]
enum Payload {
    /// `[projectName, redundant[], required[]]`
    Current {
        project_name: String,
        redundant: Vec<String>,
        required: Vec<String>,
    },
    /// `[redundant[], required[]]`
    NamesOnly {
        redundant: Vec<String>,
        required: Vec<String>,
    },
    /// `[customReasons | null, [[name, value, verdict, code, before?, after?], ...]]`
    Coded(legacy::CodedPayload),
    /// `{ t, x, q, s: [{ n, o, b?, a?, v, r }], d }`
    Object(legacy::ObjectPayload),
}

impl Payload {
    fn detect(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Self::detect_array(items),
            Value::Object(map) if map.contains_key("t") && map.contains_key("s") => {
                legacy::ObjectPayload::from_value(Value::Object(map)).map(Self::Object)
            }
            _ => Err(Error::DecodeShape("unknown data format".to_string())),
        }
    }

    fn detect_array(items: Vec<Value>) -> Result<Self> {
        match items.as_slice() {
            [Value::String(_), Value::Array(_), Value::Array(_)] => {
                let [name, redundant, required] = <[Value; 3]>::try_from(items)
                    .map_err(|_| Error::DecodeShape("expected 3 elements".to_string()))?;
                Ok(Self::Current {
                    project_name: name.as_str().unwrap_or_default().to_string(),
                    redundant: names(redundant)?,
                    required: names(required)?,
                })
            }
            [Value::Array(first), Value::Array(second)]
                if starts_with_string(first) && starts_with_string(second) =>
            {
                let [redundant, required] = <[Value; 2]>::try_from(items)
                    .map_err(|_| Error::DecodeShape("expected 2 elements".to_string()))?;
                Ok(Self::NamesOnly {
                    redundant: names(redundant)?,
                    required: names(required)?,
                })
            }
            [Value::Null | Value::Object(_), Value::Array(_)] => {
                legacy::CodedPayload::from_items(items).map(Self::Coded)
            }
            _ => Err(Error::DecodeShape("unknown data format".to_string())),
        }
    }

    fn into_decoded(self) -> Result<DecodedReport> {
        match self {
            Self::Current {
                project_name,
                redundant,
                required,
            } => Ok(from_names(project_name, redundant, required)),
            Self::NamesOnly {
                redundant,
                required,
            } => Ok(from_names(String::new(), redundant, required)),
            Self::Coded(payload) => payload.into_decoded(),
            Self::Object(payload) => payload.into_decoded(),
        }
    }
}

fn starts_with_string(items: &[Value]) -> bool {
    items.first().is_none_or(Value::is_string)
}

fn names(value: Value) -> Result<Vec<String>> {
    serde_json::from_value(value)
        .map_err(|e| Error::DecodeShape(format!("expected a list of names: {}", e)))
}

/// Rebuild a report from names grouped by verdict
fn from_names(project_name: String, redundant: Vec<String>, required: Vec<String>) -> DecodedReport {
    let placeholder = |name: String, verdict: Verdict, reason: &str| OverrideResult {
        name,
        override_value: String::new(),
        before: None,
        after: None,
        verdict,
        reason: reason.to_string(),
    };

    let results = redundant
        .into_iter()
        .map(|name| placeholder(name, Verdict::Redundant, REDUNDANT_PLACEHOLDER))
        .chain(
            required
                .into_iter()
                .map(|name| placeholder(name, Verdict::Required, REQUIRED_PLACEHOLDER)),
        )
        .collect();

    DecodedReport {
        project_name,
        report: AnalysisReport::from_results(results, Duration::ZERO),
    }
}
