use crate::config::error::ConfigError;
use crate::services::notifications::ResultItem;
use thiserror::Error;

/// Advisory printed ahead of the failed items when some messages could not be sent.
pub const DELIVERY_FAILURE_ADVISORY: &str = "There was an error sending some of the messages which could be \
caused by some incorrect phone numbers. You can try resending all the messages \
or check the output/logs for which messages failed to send and try to send them \
again manually, which means you'll probably know the recipient for the \
messages needing to be resent. Sorry!";

/// Application-wide error type that represents all possible errors in the system.
///
/// Configuration errors abort before the confirmation gate. Notifier errors abort
/// after the gate but before any report is printed. Delivery failures are only
/// raised once the report has been printed and the results file written.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be read, parsed or resolved
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The notifier capability itself failed
    #[error("Notifier '{notifier}' failed")]
    Notifier {
        notifier: &'static str,
        #[source]
        source: Box<AppError>,
    },

    /// One or more result items reported `status: "error"`
    #[error("{}", describe_failures(.failed))]
    DeliveryFailure { failed: Vec<ResultItem> },

    /// A single message could not be handed to the transport
    #[error("Transport error ({}): {message}", describe_status(.status))]
    Transport { status: Option<u16>, message: String },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "no response".to_string(),
    }
}

fn describe_failures(failed: &[ResultItem]) -> String {
    let mut message = String::from(DELIVERY_FAILURE_ADVISORY);
    for item in failed {
        message.push('\n');
        message.push_str(&item.to_string());
    }
    message
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
