// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("prune-overrides")
        .version(env!("CARGO_PKG_VERSION"))
        .author("prune-overrides contributors")
        .about("Find and remove redundant npm overrides")
        .arg(
            Arg::new("fix")
                .long("fix")
                .action(ArgAction::SetTrue)
                .help("Remove redundant overrides and regenerate package-lock.json"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the report as JSON (suppresses progress output)"),
        )
        .arg(
            Arg::new("include")
                .long("include")
                .value_name("NAMES")
                .num_args(1..)
                .help("Only analyze these overrides (comma or space separated)"),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .value_name("NAMES")
                .num_args(1..)
                .help("Skip these overrides (comma or space separated)"),
        )
        .arg(
            Arg::new("cwd")
                .long("cwd")
                .value_name("PATH")
                .default_value(".")
                .help("Project directory containing package.json"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .arg(
            Arg::new("share")
                .long("share")
                .action(ArgAction::SetTrue)
                .help("Print a shareable link to the result"),
        )
        .arg(
            Arg::new("share_base")
                .long("share-base")
                .value_name("URL")
                .default_value("https://pkief.github.io/prune-overrides/")
                .help("Viewer URL the share token is appended to"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .default_value("120")
                .help("Timeout for each npm invocation, in seconds"),
        )
        .arg(
            Arg::new("npm")
                .long("npm")
                .value_name("PATH")
                .env("PRUNE_OVERRIDES_NPM")
                .default_value("npm")
                .help("npm executable to run"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Man page lands in <crate>/man
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("prune-overrides.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
