use std::process::ExitCode;

use clap::Parser;
use secret_santa::cli::{Cli, execute_command, init_logger_from_cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logger_from_cli(&cli) {
        eprintln!("Logger initialization error: {e:#}");
        return ExitCode::FAILURE;
    }

    tracing::debug!(version = secret_santa::pkg_version(), "Starting");

    match execute_command(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Run failed");
            eprintln!("An error occurred:");
            eprintln!("{:#}", anyhow::Error::from(e));
            ExitCode::FAILURE
        }
    }
}
