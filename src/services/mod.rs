//! The run pipeline after configuration is resolved.
//!
//! [`confirmation`] holds a real run for the cancellation window,
//! [`orchestrator`] calls the notifier once, and [`results`] saves, prints
//! and judges what came back.

pub mod confirmation;
pub mod notifications;
pub mod orchestrator;
pub mod results;

pub use confirmation::{ConfirmationGate, GateState};
pub use notifications::{Notifier, ResultItem, SecretSantaNotifier};
pub use orchestrator::RunOrchestrator;
pub use results::ResultsSink;
