//! Configuration resolution for secret-santa
//!
//! Fragments from defaults, environment, flags, a config file and stdin are
//! folded into a single [`RunConfig`].

pub mod environment;
pub mod error;
pub mod loader;
pub mod merger;
pub mod settings;
pub mod sources;

pub use error::{ConfigError, ConfigSource};
pub use loader::ConfigLoader;
pub use merger::ConfigurationMerger;
pub use settings::{Participant, RunConfig};
pub use sources::{Fragment, InputMode};
