//! Configuration error types

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Where a configuration fragment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSource {
    /// Built-in defaults
    Defaults,
    /// Credential defaults taken from environment variables
    Environment,
    /// Command-line flags
    Flags,
    /// The JSON file named by `--config`
    File,
    /// A JSON payload piped on standard input
    Stdin,
    /// The JSON-encoded `participants` flag
    ParticipantsString,
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::Defaults => "defaults",
            ConfigSource::Environment => "environment",
            ConfigSource::Flags => "command-line flags",
            ConfigSource::File => "config file",
            ConfigSource::Stdin => "stdin",
            ConfigSource::ParticipantsString => "participants string",
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read at all
    #[error("Reading {origin} '{}': {cause}", .path.display())]
    Read {
        origin: ConfigSource,
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    /// A source was read but is not valid JSON
    #[error("Parsing {origin}: {cause}")]
    Parse {
        origin: ConfigSource,
        #[source]
        cause: serde_json::Error,
    },

    /// A source parsed to JSON that is not an object
    #[error("Parsing {origin}: expected a JSON object, found {found}")]
    NotAnObject {
        origin: ConfigSource,
        found: &'static str,
    },

    /// The merged configuration does not have the expected shape
    #[error("Invalid configuration: {0}")]
    Invalid(#[source] serde_json::Error),

    /// Validation error with field and message
    #[error("Validation error: {field} - {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// The validation error message
        message: String,
    },
}

impl ConfigError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The source that caused this error, when there is one
    pub fn origin(&self) -> Option<ConfigSource> {
        match self {
            ConfigError::Read { origin, .. }
            | ConfigError::Parse { origin, .. }
            | ConfigError::NotAnObject { origin, .. } => Some(*origin),
            ConfigError::Invalid(_) | ConfigError::ValidationError { .. } => None,
        }
    }
}
