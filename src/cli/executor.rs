//! Command executor
//!
//! Resolves the configuration and drives one run through the pipeline:
//! summary, confirmation gate, notifier, results sink.

use std::io::{self, Write};
use std::path::Path;

use super::parser::Cli;
use crate::config::{ConfigLoader, RunConfig};
use crate::error::AppResult;
use crate::services::confirmation::write_summary;
use crate::services::{ConfirmationGate, Notifier, ResultsSink, RunOrchestrator, SecretSantaNotifier};

/// Execute one run for the parsed command line
///
/// # Errors
/// Configuration errors before anything is printed, the notifier's failure,
/// or the aggregate of failed deliveries after the report.
pub async fn execute_command(cli: &Cli) -> AppResult<()> {
    let loader = ConfigLoader::from_process()?;
    let config = loader.load(cli.config_fragment(), tokio::io::stdin()).await?;
    let notifier = SecretSantaNotifier::twilio(&config);

    run_pipeline(
        &config,
        &notifier,
        loader.cwd(),
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .await
}

/// Run a resolved configuration through the gate, the notifier and the sink
///
/// `dir` receives the results file; `out` gets the report and `diag` every
/// operator-facing line.
pub async fn run_pipeline<O, D>(
    config: &RunConfig,
    notifier: &dyn Notifier,
    dir: &Path,
    out: &mut O,
    diag: &mut D,
) -> AppResult<()>
where
    O: Write,
    D: Write,
{
    write_summary(config, diag)?;

    let gate = ConfirmationGate::for_config(config);
    tracing::debug!(state = ?gate.state(), "Confirmation gate");
    gate.pass(diag).await?;

    let results = RunOrchestrator::new(notifier).run(config).await?;

    ResultsSink::new(config.dry, dir)
        .finish(&results, out, diag)
        .await
}
