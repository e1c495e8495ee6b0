//! CLI module for secret-santa
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Flag validation
//! - Run execution

pub mod executor;
pub mod parser;
pub mod validation;

pub use executor::{execute_command, run_pipeline};
pub use parser::{Cli, LogFormat, LogLevel};

use crate::logger::init_logger;

/// Initialize the logger from the parsed command line
///
/// # Errors
/// Returns error if the log file cannot be opened or a logger is already set
pub fn init_logger_from_cli(cli: &Cli) -> anyhow::Result<()> {
    init_logger(cli.logger_config())
}
