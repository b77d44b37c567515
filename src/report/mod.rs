// src/report/mod.rs

//! Rendering analysis reports for humans and machines

mod console;
mod json;

pub use console::{format_duration, write_console};
pub use json::{render_json, JsonOverride, JsonReport, JsonSummary};
