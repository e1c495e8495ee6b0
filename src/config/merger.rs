//! Shallow overlay of configuration fragments
//!
//! The merger keeps an ordered list of `(source, fragment)` layers and folds
//! them left to right. A field present in a later layer replaces the same
//! field from every earlier layer; fields a layer does not mention are left
//! alone. Nested objects are replaced whole, never merged.

use crate::config::error::{ConfigError, ConfigSource};
use crate::config::settings::RunConfig;
use crate::config::sources::Fragment;

/// Configuration merger folding fragments in the order they were pushed
#[derive(Debug, Default, Clone)]
pub struct ConfigurationMerger {
    layers: Vec<(ConfigSource, Fragment)>,
}

impl ConfigurationMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer; it overrides everything pushed before it
    pub fn push(&mut self, source: ConfigSource, fragment: Fragment) -> &mut Self {
        tracing::debug!(
            source = %source,
            fields = fragment.len(),
            "Configuration layer added"
        );
        self.layers.push((source, fragment));
        self
    }

    /// Builder-style variant of [`push`](Self::push)
    pub fn with_layer(mut self, source: ConfigSource, fragment: Fragment) -> Self {
        self.push(source, fragment);
        self
    }

    /// Sources in the order they will be applied
    pub fn sources(&self) -> Vec<ConfigSource> {
        self.layers.iter().map(|(source, _)| *source).collect()
    }

    /// Fold all layers into one fragment
    pub fn merge(&self) -> Fragment {
        self.layers
            .iter()
            .fold(Fragment::new(), |mut merged, (_, fragment)| {
                for (field, value) in fragment {
                    merged.insert(field.clone(), value.clone());
                }
                merged
            })
    }

    /// Merge and resolve into a typed configuration
    pub fn resolve(&self) -> Result<RunConfig, ConfigError> {
        RunConfig::from_merged(self.merge())
    }
}
