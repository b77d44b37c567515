// src/manifest/mod.rs

//! Project manifest (`package.json`) access
//!
//! The manifest is kept as an ordered JSON object so that every field we do
//! not care about survives a read/modify/write cycle verbatim, in its original
//! position. Only the `overrides` section is ever modified.

use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Manifest file name inside a project directory
pub const MANIFEST_FILE: &str = "package.json";

/// Indentation used when the existing file gives no hint
const DEFAULT_INDENT: &str = "  ";

/// Whitespace in front of the first quoted key on an indented line
static INDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\n([ \t]+)""#).expect("static regex"));

/// A parsed `package.json`
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
}

/// The value side of one `overrides` entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverrideValue<'a> {
    /// Plain version string, e.g. `"lodash": "4.17.21"`
    Version(&'a str),
    /// Nested or conditional override object (not analyzed)
    Nested(&'a Value),
}

impl Manifest {
    /// Parse manifest content; `path` is only used for error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let fields: Map<String, Value> =
            serde_json::from_str(content).map_err(|source| Error::ManifestMalformed {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { fields })
    }

    /// Build a manifest from an already parsed JSON object
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// The `name` field, if present
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    /// The `overrides` section, if present and an object
    pub fn overrides(&self) -> Option<&Map<String, Value>> {
        self.fields.get("overrides").and_then(Value::as_object)
    }

    /// Look up a single override entry
    pub fn override_value(&self, key: &str) -> Option<OverrideValue<'_>> {
        self.overrides()?.get(key).map(|value| match value {
            Value::String(version) => OverrideValue::Version(version),
            other => OverrideValue::Nested(other),
        })
    }

    /// Read-only access to every top-level field
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Serialize with the given indentation, newline-terminated
    pub fn to_json_string(&self, indent: &str) -> std::result::Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.fields.serialize(&mut ser)?;
        buf.push(b'\n');
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Read and parse `package.json` from a project directory
pub fn read_manifest(dir: &Path) -> Result<Manifest> {
    let path = dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::ManifestNotFound(path.clone()),
        _ => Error::Io(e),
    })?;
    Manifest::parse(&content, &path)
}

/// Top-level override keys in declaration order
pub fn override_keys(manifest: &Manifest) -> Vec<String> {
    manifest
        .overrides()
        .map(|overrides| overrides.keys().cloned().collect())
        .unwrap_or_default()
}

/// Return a copy of the manifest with one override removed
///
/// The `overrides` section is dropped entirely once it would be empty.
pub fn remove_override(manifest: &Manifest, key: &str) -> Manifest {
    let mut fields = manifest.fields.clone();

    let now_empty = match fields.get_mut("overrides").and_then(Value::as_object_mut) {
        Some(overrides) => {
            overrides.shift_remove(key);
            overrides.is_empty()
        }
        None => return manifest.clone(),
    };

    if now_empty {
        fields.shift_remove("overrides");
    }

    Manifest { fields }
}

/// Detect the indentation unit of an existing JSON document
pub fn detect_indent(content: &str) -> Option<&str> {
    INDENT_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Write `package.json` into a directory, keeping the existing indentation
pub fn write_manifest(dir: &Path, manifest: &Manifest) -> Result<()> {
    let path = dir.join(MANIFEST_FILE);

    let existing = fs::read_to_string(&path).ok();
    let indent = existing
        .as_deref()
        .and_then(detect_indent)
        .unwrap_or(DEFAULT_INDENT)
        .to_string();
    debug!("Writing {} with indent {:?}", path.display(), indent);

    let content = manifest
        .to_json_string(&indent)
        .map_err(|e| Error::ManifestWrite {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    fs::write(&path, content).map_err(|e| Error::ManifestWrite {
        path,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manifest(json: &str) -> Manifest {
        Manifest::parse(json, Path::new("package.json")).unwrap()
    }

    #[test]
    fn test_override_keys_in_declaration_order() {
        let m = manifest(r#"{"name":"app","overrides":{"zod":"3.0.0","axios":"1.6.0","lodash":"4.17.21"}}"#);
        assert_eq!(override_keys(&m), vec!["zod", "axios", "lodash"]);
    }

    #[test]
    fn test_override_keys_without_section() {
        let m = manifest(r#"{"name":"app"}"#);
        assert!(override_keys(&m).is_empty());
    }

    #[test]
    fn test_override_value_kinds() {
        let m = manifest(r#"{"overrides":{"a":"1.0.0","b":{"c":"2.0.0"}}}"#);
        assert_eq!(m.override_value("a"), Some(OverrideValue::Version("1.0.0")));
        assert!(matches!(m.override_value("b"), Some(OverrideValue::Nested(_))));
        assert_eq!(m.override_value("missing"), None);
    }

    #[test]
    fn test_remove_override_keeps_others() {
        let m = manifest(r#"{"overrides":{"a":"1.0.0","b":"2.0.0"}}"#);
        let removed = remove_override(&m, "a");
        assert_eq!(override_keys(&removed), vec!["b"]);
        // Original is untouched
        assert_eq!(override_keys(&m), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_last_override_drops_section() {
        let m = manifest(r#"{"name":"app","overrides":{"lodash":"4.17.21"}}"#);
        let removed = remove_override(&m, "lodash");
        assert!(!removed.fields().contains_key("overrides"));
        assert_eq!(removed.name(), Some("app"));
    }

    #[test]
    fn test_remove_override_without_section_is_noop() {
        let m = manifest(r#"{"name":"app"}"#);
        assert_eq!(remove_override(&m, "lodash"), m);
    }

    #[test]
    fn test_detect_indent() {
        assert_eq!(detect_indent("{\n    \"name\": \"x\"\n}"), Some("    "));
        assert_eq!(detect_indent("{\n\t\"name\": \"x\"\n}"), Some("\t"));
        assert_eq!(detect_indent("{\"name\":\"x\"}"), None);
    }

    #[test]
    fn test_write_preserves_indent_and_field_order() {
        let dir = TempDir::new().unwrap();
        let original = "{\n    \"name\": \"app\",\n    \"version\": \"1.0.0\",\n    \"overrides\": {\n        \"a\": \"1.0.0\"\n    },\n    \"private\": true\n}\n";
        fs::write(dir.path().join(MANIFEST_FILE), original).unwrap();

        let m = read_manifest(dir.path()).unwrap();
        write_manifest(dir.path(), &remove_override(&m, "a")).unwrap();

        let written = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        assert_eq!(
            written,
            "{\n    \"name\": \"app\",\n    \"version\": \"1.0.0\",\n    \"private\": true\n}\n"
        );
    }

    #[test]
    fn test_write_new_file_uses_default_indent() {
        let dir = TempDir::new().unwrap();
        let m = manifest(r#"{"name":"app"}"#);
        write_manifest(dir.path(), &m).unwrap();

        let written = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        assert_eq!(written, "{\n  \"name\": \"app\"\n}\n");
    }

    #[test]
    fn test_read_missing_and_malformed() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_manifest(dir.path()),
            Err(Error::ManifestNotFound(_))
        ));

        fs::write(dir.path().join(MANIFEST_FILE), "{ not json").unwrap();
        assert!(matches!(
            read_manifest(dir.path()),
            Err(Error::ManifestMalformed { .. })
        ));
    }
}
