//! CLI argument parsing with clap
//!
//! This module defines the command-line interface using clap and turns the
//! parsed flags into the command-line configuration fragment.

use clap::{Parser, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;

use crate::config::Fragment;
use crate::logger::{self, ConsoleConfig, FileConfig, LoggerConfig};

/// Draw Secret Santa matches and text every participant their assignment
#[derive(Parser, Debug)]
#[command(name = "secret-santa")]
#[command(about = "Draw Secret Santa matches and text every participant their assignment")]
#[command(long_about = "
Secret Santa draws a giver -> recipient match for every participant and sends
each giver a text message naming their recipient.

Options are read from, lowest to highest precedence: built-in defaults, the
TWILIO_SID/TWILIO_TOKEN environment variables, command-line flags, the JSON
file given with --config, and a JSON object piped on stdin.

EXAMPLES:
    # Preview the draw without sending anything
    secret-santa --dry --config people.json

    # Send for real, skipping the five second confirmation wait
    secret-santa --config people.json --wait 0

    # Pipe the whole configuration
    cat people.json | secret-santa --dry

    # Resend an earlier message to a new number
    secret-santa --sid SM123 --to '+15550100'

A copy of the results is saved as secret-santa-<timestamp>.json in the
current directory after every real run.
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Preview the run without sending any message
    #[arg(long)]
    pub dry: bool,

    /// Seconds to wait before sending, giving time to cancel
    ///
    /// Zero or a negative number skips the wait. Default: 5
    #[arg(long, value_name = "SECONDS", value_parser = super::validation::validate_wait)]
    pub wait: Option<f64>,

    /// JSON configuration file, relative to the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Participants as a JSON array of {name, number, skip}
    #[arg(long, value_name = "JSON")]
    pub participants: Option<String>,

    /// Twilio account SID (default: $TWILIO_SID)
    #[arg(long = "accountSid", alias = "account-sid", value_name = "SID")]
    pub account_sid: Option<String>,

    /// Twilio auth token (default: $TWILIO_TOKEN)
    #[arg(long = "accountToken", alias = "account-token", value_name = "TOKEN")]
    pub account_token: Option<String>,

    /// Number messages are sent from
    #[arg(long, value_name = "NUMBER")]
    pub from: Option<String>,

    /// Message template; {name} is the giver and {match} the recipient
    #[arg(long, value_name = "TEMPLATE")]
    pub message: Option<String>,

    /// Resend the message with this SID instead of drawing
    #[arg(long, value_name = "SID")]
    pub sid: Option<String>,

    /// Recipient of a resent message
    #[arg(long, value_name = "NUMBER")]
    pub to: Option<String>,

    /// Enable verbose logging
    ///
    /// Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    ///
    /// Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level override
    ///
    /// Takes precedence over --verbose and --quiet.
    #[arg(long, value_enum, env = "SECRET_SANTA_LOG")]
    pub log_level: Option<LogLevel>,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", env = "SECRET_SANTA_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Format of the log file
    #[arg(long, value_enum, default_value_t = LogFormat::Full)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

/// Log file format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Full,
    Compact,
    Json,
}

impl Cli {
    /// The command-line configuration fragment
    ///
    /// Only flags that were given appear. Every option except `wait` and
    /// `dry` stays a string so numbers and SIDs are never reinterpreted, and
    /// `dry` appears only when set.
    pub fn config_fragment(&self) -> Fragment {
        let mut fragment = Fragment::new();

        if self.dry {
            fragment.insert("dry".to_string(), Value::Bool(true));
        }
        if let Some(wait) = self.wait {
            fragment.insert("wait".to_string(), Value::from(wait));
        }

        let strings = [
            ("config", &self.config),
            ("participants", &self.participants),
            ("accountSid", &self.account_sid),
            ("accountToken", &self.account_token),
            ("from", &self.from),
            ("message", &self.message),
            ("sid", &self.sid),
            ("to", &self.to),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                fragment.insert(key.to_string(), Value::String(value.clone()));
            }
        }

        fragment
    }

    /// Effective log level: --log-level, then --verbose/--quiet, then the default
    pub fn log_level(&self) -> String {
        match (self.log_level, self.verbose, self.quiet) {
            (Some(level), _, _) => level.into(),
            (None, true, _) => "debug".to_string(),
            (None, false, true) => "error".to_string(),
            (None, false, false) => logger::DEFAULT_LEVEL.to_string(),
        }
    }

    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            console: ConsoleConfig::default(),
            file: match &self.log_file {
                Some(path) => FileConfig::at(path, self.log_format.into()),
                None => FileConfig::default(),
            },
            level: self.log_level(),
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<LogFormat> for logger::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Full => logger::LogFormat::Full,
            LogFormat::Compact => logger::LogFormat::Compact,
            LogFormat::Json => logger::LogFormat::Json,
        }
    }
}
