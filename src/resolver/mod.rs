// src/resolver/mod.rs

//! Dependency re-resolution through npm
//!
//! The analyzer never resolves dependencies itself. It asks a [`Resolver`] to
//! regenerate `package-lock.json` for a directory and then reads the result.
//! [`NpmResolver`] runs `npm install --package-lock-only --ignore-scripts`
//! with:
//!
//! - Timeout protection (the process is killed and the run counts as failed)
//! - stdin nullification to prevent hangs on prompts
//! - stdout/stderr captured for diagnostics
//!
//! A non-zero exit or a timeout is reported as an unsuccessful
//! [`InstallOutcome`]; only a broken invocation (npm missing, spawn failure)
//! is an [`Error::Oracle`].

use crate::config::{DEFAULT_NPM_PROGRAM, DEFAULT_NPM_TIMEOUT};
use crate::error::{Error, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// How an install should be performed
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Only update the lockfile, don't populate node_modules
    pub package_lock_only: bool,
    /// Skip lifecycle scripts
    pub ignore_scripts: bool,
    /// Kill the install after this long
    pub timeout: Duration,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            package_lock_only: true,
            ignore_scripts: true,
            timeout: DEFAULT_NPM_TIMEOUT,
        }
    }
}

impl InstallOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Result of one resolver invocation that actually ran
#[derive(Debug, Clone, Default)]
pub struct InstallOutcome {
    /// Command line, for messages
    pub command: String,
    pub success: bool,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
}

impl InstallOutcome {
    /// Successful outcome without captured output
    pub fn succeeded(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            success: true,
            exit_code: Some(0),
            ..Default::default()
        }
    }

    /// Failed outcome with the given stderr
    pub fn failed(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            success: false,
            exit_code: Some(1),
            stderr: stderr.into(),
            ..Default::default()
        }
    }

    /// Turn an unsuccessful outcome into an [`Error::Oracle`]
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        let stderr = if self.timed_out {
            "timed out".to_string()
        } else {
            self.stderr.trim().to_string()
        };
        Err(Error::Oracle {
            command: self.command,
            stderr,
        })
    }
}

/// Something that can regenerate a lockfile for a project directory
pub trait Resolver {
    /// Re-resolve dependencies in `dir`, rewriting its `package-lock.json`
    fn install(&self, dir: &Path, options: &InstallOptions) -> Result<InstallOutcome>;
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn install(&self, dir: &Path, options: &InstallOptions) -> Result<InstallOutcome> {
        (**self).install(dir, options)
    }
}

/// Resolver backed by the npm CLI
#[derive(Debug, Clone)]
pub struct NpmResolver {
    program: PathBuf,
}

impl Default for NpmResolver {
    fn default() -> Self {
        Self::new(DEFAULT_NPM_PROGRAM)
    }
}

impl NpmResolver {
    /// Use a specific npm executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command_line(&self, args: &[&str]) -> String {
        let mut line = self.program.display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Installed npm version (`npm --version`)
    pub fn version(&self) -> Result<String> {
        let args = ["--version"];
        let outcome = self.run(&args, None, DEFAULT_NPM_TIMEOUT)?.into_result()?;
        Ok(outcome.stdout.trim().to_string())
    }

    /// Check if npm can be run at all
    pub fn check_available(&self) -> bool {
        self.version().is_ok()
    }

    /// Spawn npm and wait for it, bounded by `timeout`
    fn run(&self, args: &[&str], cwd: Option<&Path>, timeout: Duration) -> Result<InstallOutcome> {
        let command = self.command_line(args);
        match cwd {
            Some(dir) => debug!("Running: {} in {}", command, dir.display()),
            None => debug!("Running: {}", command),
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|e| Error::Oracle {
            command: command.clone(),
            stderr: format!("failed to spawn: {}", e),
        })?;

        // Drain pipes on their own threads so a chatty npm cannot block on a
        // full pipe while we wait for it
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = wait_bounded(&mut child, timeout).map_err(|e| Error::Oracle {
            command: command.clone(),
            stderr: format!("failed to wait: {}", e),
        })?;

        let stdout = join(stdout);
        let stderr = join(stderr);

        let outcome = match status {
            Some(status) => InstallOutcome {
                command,
                success: status.success(),
                exit_code: status.code(),
                timed_out: false,
                stdout,
                stderr,
            },
            None => {
                warn!("{} timed out after {} seconds", command, timeout.as_secs());
                InstallOutcome {
                    command,
                    success: false,
                    exit_code: None,
                    timed_out: true,
                    stdout,
                    stderr,
                }
            }
        };

        if !outcome.success {
            for line in outcome.stderr.lines() {
                debug!("[npm] {}", line);
            }
        }

        Ok(outcome)
    }
}

impl Resolver for NpmResolver {
    fn install(&self, dir: &Path, options: &InstallOptions) -> Result<InstallOutcome> {
        let mut args = vec!["install"];
        if options.package_lock_only {
            args.push("--package-lock-only");
        }
        if options.ignore_scripts {
            args.push("--ignore-scripts");
        }
        self.run(&args, Some(dir), options.timeout)
    }
}

/// Wait for the child; on timeout kill it and return `None`
fn wait_bounded(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    match child.wait_timeout(timeout)? {
        Some(status) => Ok(Some(status)),
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Ok(None)
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
