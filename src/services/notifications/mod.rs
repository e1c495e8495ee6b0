//! Matching and notification with pluggable transports.
//!
//! The pipeline talks to a [`Notifier`]. The bundled [`SecretSantaNotifier`]
//! draws matches and delivers messages through a [`MessageTransport`], with
//! Twilio SMS as the production transport.

pub mod matcher;
mod provider;
pub mod secret_santa;
pub mod twilio_provider;

pub use provider::{DeliveryStatus, Notifier, ResultItem};
pub use secret_santa::SecretSantaNotifier;
pub use twilio_provider::{MessageTransport, TwilioTransport};
