//! Confirmation gate
//!
//! A real run waits `wait` seconds before anything is sent so the operator can
//! read the summary and interrupt the process. There is no in-process
//! cancellation: killing the process during the wait is the cancel button.

use std::io::{self, Write};
use std::time::Duration;

use crate::config::RunConfig;
use crate::utils::phone::format_number;

/// State of the gate for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Not a dry run and a positive wait: sleep before proceeding
    Armed(Duration),
    /// Dry run, or no wait: proceed immediately
    Bypassed,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfirmationGate {
    state: GateState,
}

impl ConfirmationGate {
    pub fn new(dry: bool, wait_secs: f64) -> Self {
        let state = if dry || wait_secs.is_nan() || wait_secs <= 0.0 {
            GateState::Bypassed
        } else {
            Duration::try_from_secs_f64(wait_secs)
                .map(GateState::Armed)
                .unwrap_or(GateState::Bypassed)
        };
        Self { state }
    }

    pub fn for_config(config: &RunConfig) -> Self {
        Self::new(config.dry, config.wait)
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Announce the pending run and hold it for the configured wait
    pub async fn pass<W: Write>(&self, diag: &mut W) -> io::Result<()> {
        match self.state {
            GateState::Bypassed => {
                tracing::debug!("Confirmation gate bypassed");
            }
            GateState::Armed(wait) => {
                writeln!(
                    diag,
                    "Doing the real thing in {} seconds, Ctrl-C to cancel...",
                    wait.as_secs_f64()
                )?;
                diag.flush()?;
                tracing::info!(wait_secs = wait.as_secs_f64(), "Confirmation gate armed");
                tokio::time::sleep(wait).await;
            }
        }
        Ok(())
    }
}

/// The dry-run flag and one line per participant, as shown before gating
///
/// `format` renders phone numbers for display.
pub fn participant_summary<F>(config: &RunConfig, format: F) -> String
where
    F: Fn(&str) -> String,
{
    let participants = if config.participants.is_empty() {
        "None".to_string()
    } else {
        config
            .participants
            .iter()
            .map(|p| {
                format!("-- {} {} {}", p.name, format(&p.number), p.skip.join(","))
                    .trim()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!("Dry run: {}\nParticipants:\n{participants}", config.dry)
}

/// Write the participant summary to the diagnostic stream
pub fn write_summary<W: Write>(config: &RunConfig, diag: &mut W) -> io::Result<()> {
    writeln!(diag, "{}", participant_summary(config, format_number))
}
