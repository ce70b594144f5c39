//! Command-line interface for `validate-invariants`.

pub mod commands;
pub mod types;

use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::CommandFactory;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

pub use types::Cli;

/// Load configuration from `--config` if given, otherwise from the default
/// file and environment.
pub fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Map a clap parse failure to an exit code.
///
/// Help and version requests succeed; any other argument error prints the
/// error followed by the full usage to stderr and fails.
pub fn handle_parse_error(err: &clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            // Writes to stdout for these kinds
            let _ = err.print();
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("{}", err.render());
            eprintln!("{}", Cli::command().render_help());
            ExitCode::FAILURE
        }
    }
}

/// Report a fatal error and produce the failing exit code.
pub fn handle_error(err: &anyhow::Error) -> ExitCode {
    tracing::error!(error = %format!("{err:#}"), "Validation failed");
    eprintln!("Error: {err:#}");
    ExitCode::FAILURE
}
