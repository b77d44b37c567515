// src/workspace/mod.rs

//! Disposable trial workspaces
//!
//! A trial workspace is a fresh temporary directory holding copies of the
//! project's `package.json` and (if present) `package-lock.json`. Overrides are
//! removed and npm is run there, so the real project is never touched.
//!
//! The directory is removed when the workspace is dropped or explicitly
//! cleaned up; removal failures are logged and otherwise ignored.

use crate::config::TEMP_DIR_PREFIX;
use crate::error::{Error, Result};
use crate::lockfile::LOCKFILE_FILE;
use crate::manifest::MANIFEST_FILE;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tempfile::TempDir;
use tracing::debug;

/// A temporary copy of a project used for one hypothetical re-resolution
#[derive(Debug)]
pub struct TrialWorkspace {
    dir: TempDir,
}

impl TrialWorkspace {
    /// Create a workspace under the system temp directory
    pub fn create(source_dir: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir()
            .map_err(|e| Error::Workspace(format!("Failed to create temp workspace: {}", e)))?;
        Self::populate(dir, source_dir)
    }

    /// Create a workspace under a specific parent directory
    pub fn create_in(source_dir: &Path, parent: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| Error::Workspace(format!("Failed to create temp workspace: {}", e)))?;
        Self::populate(dir, source_dir)
    }

    /// Copy the manifest and optional lockfile into `dir`
    ///
    /// On failure `dir` is dropped here, which removes it again.
    fn populate(dir: TempDir, source_dir: &Path) -> Result<Self> {
        fs::copy(source_dir.join(MANIFEST_FILE), dir.path().join(MANIFEST_FILE)).map_err(|e| {
            Error::Workspace(format!(
                "Failed to create temp workspace: cannot copy {}: {}",
                MANIFEST_FILE, e
            ))
        })?;

        match fs::copy(source_dir.join(LOCKFILE_FILE), dir.path().join(LOCKFILE_FILE)) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No {} in {}, continuing without it", LOCKFILE_FILE, source_dir.display());
            }
            Err(e) => {
                return Err(Error::Workspace(format!(
                    "Failed to create temp workspace: cannot copy {}: {}",
                    LOCKFILE_FILE, e
                )));
            }
        }

        debug!("Created trial workspace at {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Path of the workspace directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the workspace now; never fails
    pub fn cleanup(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            debug!("Failed to remove trial workspace {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(with_lockfile: bool) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), r#"{"name":"app"}"#).unwrap();
        if with_lockfile {
            fs::write(dir.path().join(LOCKFILE_FILE), r#"{"packages":{}}"#).unwrap();
        }
        fs::write(dir.path().join("index.js"), "module.exports = 1;").unwrap();
        dir
    }

    #[test]
    fn test_copies_manifest_and_lockfile_only() {
        let source = project(true);
        let parent = TempDir::new().unwrap();

        let ws = TrialWorkspace::create_in(source.path(), parent.path()).unwrap();
        assert!(ws.path().join(MANIFEST_FILE).exists());
        assert!(ws.path().join(LOCKFILE_FILE).exists());
        assert!(!ws.path().join("index.js").exists());
        assert!(
            ws.path()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(TEMP_DIR_PREFIX)
        );

        let path = ws.path().to_path_buf();
        ws.cleanup();
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_lockfile_is_not_an_error() {
        let source = project(false);
        let ws = TrialWorkspace::create(source.path()).unwrap();
        assert!(ws.path().join(MANIFEST_FILE).exists());
        assert!(!ws.path().join(LOCKFILE_FILE).exists());
    }

    #[test]
    fn test_drop_removes_directory() {
        let source = project(true);
        let path = {
            let ws = TrialWorkspace::create(source.path()).unwrap();
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_manifest_leaves_nothing_behind() {
        let source = TempDir::new().unwrap();
        let parent = TempDir::new().unwrap();

        let err = TrialWorkspace::create_in(source.path(), parent.path()).unwrap_err();
        assert_eq!(err.code(), "WORKSPACE_ERROR");
        assert_eq!(fs::read_dir(parent.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_workspaces_are_unique() {
        let source = project(true);
        let a = TrialWorkspace::create(source.path()).unwrap();
        let b = TrialWorkspace::create(source.path()).unwrap();
        assert_ne!(a.path(), b.path());
    }
}
