//! tripmap CLI - Command-line interface
//!
//! Finds country folders, runs the trip pipeline and reports what was written.

mod cli;
mod commands;
mod config_loader;
mod discovery;
mod dry_run;
mod errors;
mod interactive;
mod output;
mod output_types;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Logs go to stderr so `--json` keeps stdout parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let json = cli.json;

    // Execute the command
    match commands::execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let error = errors::from_anyhow(error);
            if json {
                error.display_json();
            } else {
                error.display();
            }
            ExitCode::FAILURE
        }
    }
}
