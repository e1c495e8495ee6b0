//! Readers for the individual configuration fragments
//!
//! Each reader produces a [`Fragment`] without knowing anything about
//! precedence. Ordering is the merger's job.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::error::{ConfigError, ConfigSource};

/// A partial configuration object from one source
pub type Fragment = Map<String, Value>;

/// Default cancellation window in seconds
pub const DEFAULT_WAIT_SECS: f64 = 5.0;

/// How standard input is attached to the process
///
/// Decided once at startup so the stdin reader never probes the terminal itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Stdin is a terminal; nothing is read from it
    Interactive,
    /// Stdin is a pipe or file; it is read to end of stream
    Piped,
}

impl InputMode {
    /// Detect the mode of the current process' stdin
    pub fn detect() -> Self {
        if std::io::stdin().is_terminal() {
            InputMode::Interactive
        } else {
            InputMode::Piped
        }
    }
}

/// Built-in defaults, the lowest precedence fragment
pub fn defaults_fragment() -> Fragment {
    let mut fragment = Fragment::new();
    fragment.insert("dry".to_string(), json!(false));
    fragment.insert("wait".to_string(), json!(DEFAULT_WAIT_SECS));
    fragment
}

/// Parse JSON text of any kind, tagging failures with `origin`
pub fn parse_fragment_value(origin: ConfigSource, text: &str) -> Result<Value, ConfigError> {
    serde_json::from_str(text).map_err(|cause| ConfigError::Parse { origin, cause })
}

/// Parse JSON text into a fragment, tagging failures with `origin`
pub fn parse_fragment(origin: ConfigSource, text: &str) -> Result<Fragment, ConfigError> {
    match parse_fragment_value(origin, text)? {
        Value::Object(fragment) => Ok(fragment),
        other => Err(ConfigError::NotAnObject {
            origin,
            found: json_kind(&other),
        }),
    }
}

/// Read the JSON file at `path`, resolved against `cwd`
pub async fn read_file_fragment(cwd: &Path, path: &Path) -> Result<Fragment, ConfigError> {
    let resolved: PathBuf = cwd.join(path);
    tracing::debug!(path = %resolved.display(), "Reading config file");

    let text = tokio::fs::read_to_string(&resolved)
        .await
        .map_err(|cause| ConfigError::Read {
            origin: ConfigSource::File,
            path: resolved.clone(),
            cause,
        })?;

    parse_fragment(ConfigSource::File, &text)
}

/// Read a fragment from `stdin` when the input is piped
///
/// Blocks until end of stream. Empty input yields no fragment.
pub async fn read_stdin_fragment<R>(
    mode: InputMode,
    mut stdin: R,
) -> Result<Option<Fragment>, ConfigError>
where
    R: AsyncRead + Unpin,
{
    if mode == InputMode::Interactive {
        return Ok(None);
    }

    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .await
        .map_err(|cause| ConfigError::Read {
            origin: ConfigSource::Stdin,
            path: PathBuf::from("-"),
            cause,
        })?;

    if text.is_empty() {
        tracing::debug!("Stdin was empty, no fragment produced");
        return Ok(None);
    }

    parse_fragment(ConfigSource::Stdin, &text).map(Some)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
