//! Configuration loader for secret-santa
//!
//! Reads every configuration source in precedence order and hands the layers
//! to [`ConfigurationMerger`]:
//! 1. built-in defaults
//! 2. credential defaults from `TWILIO_SID` / `TWILIO_TOKEN`
//! 3. command-line flags
//! 4. the JSON file named by `config`
//! 5. a JSON payload piped on stdin

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::io::AsyncRead;

use crate::config::environment::{environment_fragment, process_env};
use crate::config::error::{ConfigError, ConfigSource};
use crate::config::merger::ConfigurationMerger;
use crate::config::settings::{CONFIG_PATH_KEY, RunConfig};
use crate::config::sources::{
    Fragment, InputMode, defaults_fragment, read_file_fragment, read_stdin_fragment,
};

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Configuration loader that handles layered configuration loading
pub struct ConfigLoader {
    /// Directory relative config paths are resolved against
    cwd: PathBuf,
    /// Whether stdin should be read
    input_mode: InputMode,
    env_lookup: EnvLookup,
}

impl ConfigLoader {
    /// Create a loader reading the real process environment
    pub fn new(cwd: impl Into<PathBuf>, input_mode: InputMode) -> Self {
        Self {
            cwd: cwd.into(),
            input_mode,
            env_lookup: Box::new(process_env),
        }
    }

    /// Create a loader for the running process: its working directory and stdin mode
    pub fn from_process() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?, InputMode::detect()))
    }

    /// Replace the environment lookup
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env_lookup = Box::new(lookup);
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Read all sources and resolve the run configuration
    ///
    /// `flags` is the fragment built from the command line. Its `config`
    /// field, when present, names the config file.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending source if the config file cannot be
    /// read, any JSON source fails to parse, or the merged result has the wrong shape.
    pub async fn load<R>(&self, flags: Fragment, stdin: R) -> Result<RunConfig, ConfigError>
    where
        R: AsyncRead + Unpin,
    {
        let merger = self.collect_layers(flags, stdin).await?;
        let config = merger.resolve()?;

        tracing::info!(
            sources = ?merger.sources(),
            dry = config.dry,
            wait = config.wait,
            participants = config.participants.len(),
            "Configuration resolved"
        );

        Ok(config)
    }

    /// Read every source into a merger, lowest precedence first
    pub async fn collect_layers<R>(
        &self,
        flags: Fragment,
        stdin: R,
    ) -> Result<ConfigurationMerger, ConfigError>
    where
        R: AsyncRead + Unpin,
    {
        let config_path = Self::config_path(&flags)?;

        let mut merger = ConfigurationMerger::new();
        merger
            .push(ConfigSource::Defaults, defaults_fragment())
            .push(
                ConfigSource::Environment,
                environment_fragment(&self.env_lookup),
            )
            .push(ConfigSource::Flags, flags);

        if let Some(path) = config_path {
            let fragment = read_file_fragment(&self.cwd, &path).await?;
            merger.push(ConfigSource::File, fragment);
        }

        if let Some(fragment) = read_stdin_fragment(self.input_mode, stdin).await? {
            merger.push(ConfigSource::Stdin, fragment);
        }

        Ok(merger)
    }

    fn config_path(flags: &Fragment) -> Result<Option<PathBuf>, ConfigError> {
        match flags.get(CONFIG_PATH_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(path)) if path.is_empty() => Ok(None),
            Some(Value::String(path)) => Ok(Some(PathBuf::from(path))),
            Some(_) => Err(ConfigError::validation(
                CONFIG_PATH_KEY,
                "must be a file path",
            )),
        }
    }
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("cwd", &self.cwd)
            .field("input_mode", &self.input_mode)
            .finish_non_exhaustive()
    }
}
