// src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use prune_overrides::config::ExitCode;
use prune_overrides::progress::{CliProgress, LogProgress, ProgressTracker, SilentProgress};
use prune_overrides::resolver::NpmResolver;
use prune_overrides::Error;
use std::io::{self, IsTerminal};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let progress: Box<dyn ProgressTracker> = if cli.json {
        Box::new(SilentProgress::new())
    } else if io::stderr().is_terminal() {
        Box::new(CliProgress::new())
    } else {
        Box::new(LogProgress::new("prune-overrides"))
    };

    let resolver = NpmResolver::new(&cli.npm);
    let result = resolver
        .version()
        .map_err(anyhow::Error::from)
        .and_then(|version| {
            debug!("Using npm {}", version);
            let stdout = io::stdout();
            commands::run(&cli, &resolver, progress.as_ref(), &mut stdout.lock())
        });

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            report_error(&e, cli.json);
            ExitCode::Error
        }
    };
    std::process::exit(code.code());
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn report_error(error: &anyhow::Error, json: bool) {
    match error.downcast_ref::<Error>() {
        Some(e) if json => println!("{}", serde_json::json!({ "error": e.to_string(), "code": e.code() })),
        Some(e) => eprintln!("Error: {}", e),
        None if json => println!(
            "{}",
            serde_json::json!({ "error": format!("{:#}", error), "code": "UNKNOWN_ERROR" })
        ),
        None => eprintln!("Unexpected error: {:#}", error),
    }
}
