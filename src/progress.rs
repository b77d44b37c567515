// src/progress.rs

//! Status reporting for analysis runs
//!
//! Components never print on their own. They receive a `&dyn ProgressTracker`
//! and report through it, so the caller decides per run whether status goes
//! to a terminal spinner, to the log, to a callback, or nowhere.
//!
//! # Design
//!
//! The `ProgressTracker` trait defines the core interface. Implementations
//! include:
//! - `CliProgress`: Spinner per step using indicatif
//! - `LogProgress`: Logs status to tracing
//! - `SilentProgress`: No-op for `--json` and scripted use
//! - `CallbackProgress`: Emits `ProgressEvent`s to a closure
//!
//! # Example
//!
//! ```ignore
//! use prune_overrides::progress::{CliProgress, ProgressTracker};
//!
//! let progress = CliProgress::new();
//! progress.start("Analyzing: lodash");
//! // ... do work ...
//! progress.finish_with_message("lodash: REDUNDANT");
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};

/// Core trait for status reporting
///
/// A tracker handles one step at a time: `start` opens a step, one of the
/// `finish_*` methods closes it. `info`/`warn` may be called at any point.
pub trait ProgressTracker: Send + Sync {
    /// Begin a new step
    fn start(&self, message: &str);

    /// Close the current step successfully
    fn finish_with_message(&self, message: &str);

    /// Close the current step as failed
    fn finish_with_error(&self, message: &str);

    /// Informational line outside of any step
    fn info(&self, message: &str);

    /// Warning that does not stop the run
    fn warn(&self, message: &str);
}

/// Silent progress tracker (no-op)
#[derive(Debug, Default)]
pub struct SilentProgress;

impl SilentProgress {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressTracker for SilentProgress {
    fn start(&self, _message: &str) {}
    fn finish_with_message(&self, _message: &str) {}
    fn finish_with_error(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
}

/// Logging progress tracker
///
/// Forwards everything to tracing. Useful for non-interactive environments
/// (CI logs) where a spinner would only produce noise.
#[derive(Debug)]
pub struct LogProgress {
    name: String,
}

impl LogProgress {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ProgressTracker for LogProgress {
    fn start(&self, message: &str) {
        info!("{}: {}", self.name, message);
    }

    fn finish_with_message(&self, message: &str) {
        info!("{}: {}", self.name, message);
    }

    fn finish_with_error(&self, message: &str) {
        warn!("{}: ERROR - {}", self.name, message);
    }

    fn info(&self, message: &str) {
        info!("{}: {}", self.name, message);
    }

    fn warn(&self, message: &str) {
        warn!("{}: {}", self.name, message);
    }
}

/// Events emitted by [`CallbackProgress`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started(String),
    Finished(String),
    Error(String),
    Info(String),
    Warning(String),
}

/// Callback-based progress tracker
///
/// Calls a user-provided function for every status change. Useful for
/// embedding the analyzer or for asserting on status output in tests.
pub struct CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressTracker for CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn start(&self, message: &str) {
        (self.callback)(ProgressEvent::Started(message.to_string()));
    }

    fn finish_with_message(&self, message: &str) {
        (self.callback)(ProgressEvent::Finished(message.to_string()));
    }

    fn finish_with_error(&self, message: &str) {
        (self.callback)(ProgressEvent::Error(message.to_string()));
    }

    fn info(&self, message: &str) {
        (self.callback)(ProgressEvent::Info(message.to_string()));
    }

    fn warn(&self, message: &str) {
        (self.callback)(ProgressEvent::Warning(message.to_string()));
    }
}

/// Terminal spinner tracker
///
/// Draws to stderr, so stdout stays clean for reports.
#[derive(Default)]
pub struct CliProgress {
    current: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn take(&self) -> Option<ProgressBar> {
        self.current.lock().ok().and_then(|mut guard| guard.take())
    }

    fn finish(&self, symbol: &str, message: &str) {
        match self.take() {
            Some(pb) => {
                pb.set_style(Self::style(&format!("{} {{msg}}", symbol)));
                pb.finish_with_message(message.to_string());
            }
            None => eprintln!("{} {}", symbol, message),
        }
    }

    fn style(template: &str) -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Print a line without tearing an active spinner
    fn println(&self, line: String) {
        let active = self.current.lock().ok().and_then(|guard| guard.clone());
        match active {
            Some(pb) => pb.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }
}

impl ProgressTracker for CliProgress {
    fn start(&self, message: &str) {
        // A step left open is closed silently
        if let Some(previous) = self.take() {
            previous.finish_and_clear();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::style("{spinner:.cyan} {msg}"));
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.current.lock() {
            *guard = Some(pb);
        }
    }

    fn finish_with_message(&self, message: &str) {
        self.finish("✔", message);
    }

    fn finish_with_error(&self, message: &str) {
        self.finish("✖", message);
    }

    fn info(&self, message: &str) {
        self.println(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.println(format!("⚠ {}", message));
    }
}
