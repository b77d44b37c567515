// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use prune_overrides::manifest::{read_manifest, Manifest};
use prune_overrides::resolver::{InstallOptions, InstallOutcome, Resolver};
use prune_overrides::{Error, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a project directory with the given package.json and lockfile.
///
/// Keep the TempDir alive to prevent cleanup.
pub fn setup_project(manifest: &Value, lockfile: Option<&Value>) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("package.json"),
        serde_json::to_string_pretty(manifest).unwrap() + "\n",
    )
    .unwrap();
    if let Some(lockfile) = lockfile {
        fs::write(
            dir.path().join("package-lock.json"),
            serde_json::to_string_pretty(lockfile).unwrap(),
        )
        .unwrap();
    }
    dir
}

/// package.json with the given overrides.
pub fn manifest_with_overrides(overrides: Value) -> Value {
    json!({
        "name": "my-app",
        "version": "1.0.0",
        "dependencies": { "some-lib": "^2.0.0" },
        "overrides": overrides
    })
}

/// package-lock.json with one entry per `(install path, version)`.
pub fn lockfile(entries: &[(&str, &str)]) -> Value {
    let mut packages = serde_json::Map::new();
    packages.insert(
        String::new(),
        json!({ "name": "my-app", "version": "1.0.0" }),
    );
    for (path, version) in entries {
        packages.insert(path.to_string(), json!({ "version": version }));
    }
    json!({
        "name": "my-app",
        "version": "1.0.0",
        "lockfileVersion": 3,
        "requires": true,
        "packages": packages
    })
}

/// Resolver that computes a lockfile from the manifest it finds.
///
/// The script returns the lockfile to write, or `None` to simulate an install
/// that cannot resolve. Every directory it runs in is recorded.
pub struct ScriptedResolver<F>
where
    F: Fn(&Manifest) -> Option<Value>,
{
    script: F,
    calls: Mutex<Vec<PathBuf>>,
}

impl<F> ScriptedResolver<F>
where
    F: Fn(&Manifest) -> Option<Value>,
{
    pub fn new(script: F) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl<F> Resolver for ScriptedResolver<F>
where
    F: Fn(&Manifest) -> Option<Value>,
{
    fn install(&self, dir: &Path, _options: &InstallOptions) -> Result<InstallOutcome> {
        self.calls.lock().unwrap().push(dir.to_path_buf());
        let manifest = read_manifest(dir)?;
        match (self.script)(&manifest) {
            Some(lockfile) => {
                fs::write(
                    dir.join("package-lock.json"),
                    serde_json::to_string_pretty(&lockfile).unwrap(),
                )?;
                Ok(InstallOutcome::succeeded("npm install --package-lock-only"))
            }
            None => Ok(InstallOutcome::failed(
                "npm install --package-lock-only",
                "npm ERR! code ERESOLVE",
            )),
        }
    }
}

/// Resolver that reports success but leaves no lockfile behind.
#[derive(Default)]
pub struct LockfileDroppingResolver {
    calls: Mutex<Vec<PathBuf>>,
}

impl LockfileDroppingResolver {
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl Resolver for LockfileDroppingResolver {
    fn install(&self, dir: &Path, _options: &InstallOptions) -> Result<InstallOutcome> {
        self.calls.lock().unwrap().push(dir.to_path_buf());
        let lockfile = dir.join("package-lock.json");
        if lockfile.exists() {
            fs::remove_file(lockfile)?;
        }
        Ok(InstallOutcome::succeeded("npm install --package-lock-only"))
    }
}

/// Resolver that cannot run at all (npm missing).
pub struct BrokenResolver;

impl Resolver for BrokenResolver {
    fn install(&self, _dir: &Path, _options: &InstallOptions) -> Result<InstallOutcome> {
        Err(Error::Oracle {
            command: "npm install --package-lock-only --ignore-scripts".to_string(),
            stderr: "failed to spawn: No such file or directory".to_string(),
        })
    }
}

/// Whether the manifest still declares an override for `name`.
pub fn has_override(manifest: &Manifest, name: &str) -> bool {
    manifest.override_value(name).is_some()
}
