//! `validate-invariants` entry point.

use std::process::ExitCode;

use clap::Parser;

use invariant_validator::cli::{self, commands, Cli};
use invariant_validator::infrastructure::logging::{LogConfig, LoggerImpl};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return cli::handle_parse_error(&err),
    };

    let config = match cli::load_config(&cli) {
        Ok(config) => config,
        Err(err) => return cli::handle_error(&err),
    };

    let _logger = match LogConfig::try_from(&config.logging)
        .map_err(anyhow::Error::from)
        .and_then(|log_config| LoggerImpl::init(&log_config))
    {
        Ok(logger) => logger,
        Err(err) => return cli::handle_error(&err),
    };

    match commands::validate::execute(&cli, &config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => cli::handle_error(&err),
    }
}
