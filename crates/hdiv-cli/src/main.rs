//! # schema_lint entry point
//!
//! Parses command-line arguments, initializes tracing, and dispatches to
//! the lint command. Fatal errors are printed once and exit with status 2.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hdiv_cli::lint::{run_lint, LintArgs};
use hdiv_schema::EXIT_FATAL;

/// Validate historical division YAML files for basic consistency.
///
/// Checks that ids are unique, parent references resolve, was/became
/// lineage is symmetric, and validity windows are ordered and nested.
/// Every violation is reported in a single run.
#[derive(Parser, Debug)]
#[command(name = "schema_lint", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    lint: LintArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG applies unless verbosity was raised on the command line.
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    tracing::debug!(cwd = %cwd.display(), "schema_lint starting");

    match run_lint(&cli.lint, &cwd) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}
