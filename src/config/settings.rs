//! Resolved run configuration
//!
//! [`RunConfig`] is the typed view of the merged fragments. Fields the
//! pipeline does not know about are carried in `extra` and handed to the
//! notifier untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::config::error::{ConfigError, ConfigSource};
use crate::config::sources::{DEFAULT_WAIT_SECS, Fragment, parse_fragment_value};

/// Key of the config file path; consumed during resolution
pub const CONFIG_PATH_KEY: &str = "config";

/// Key of the participants list
pub const PARTICIPANTS_KEY: &str = "participants";

/// One person taking part in the draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    #[serde(deserialize_with = "opaque_string")]
    pub number: String,
    /// Names this participant must not be matched with
    #[serde(default)]
    pub skip: Vec<String>,
}

/// The resolved configuration for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(default)]
    pub dry: bool,
    #[serde(default = "default_wait")]
    pub wait: f64,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default, deserialize_with = "opaque_option", skip_serializing_if = "Option::is_none")]
    pub account_sid: Option<String>,
    #[serde(default, deserialize_with = "opaque_option", skip_serializing_if = "Option::is_none")]
    pub account_token: Option<String>,
    #[serde(default, deserialize_with = "opaque_option", skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "opaque_option", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "opaque_option", skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(default, deserialize_with = "opaque_option", skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Options the pipeline passes through without interpreting
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_wait() -> f64 {
    DEFAULT_WAIT_SECS
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dry: false,
            wait: DEFAULT_WAIT_SECS,
            participants: Vec::new(),
            account_sid: None,
            account_token: None,
            from: None,
            message: None,
            sid: None,
            to: None,
            extra: Map::new(),
        }
    }
}

impl RunConfig {
    /// Turn a merged fragment into a typed configuration
    ///
    /// Drops the `config` path, normalizes `participants` and then checks the
    /// shape of every known field.
    pub fn from_merged(mut merged: Fragment) -> Result<Self, ConfigError> {
        merged.remove(CONFIG_PATH_KEY);
        normalize_participants(&mut merged)?;

        let config: RunConfig =
            serde_json::from_value(Value::Object(merged)).map_err(ConfigError::Invalid)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the resolved configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.wait.is_finite() {
            return Err(ConfigError::validation(
                "wait",
                "must be a finite number of seconds",
            ));
        }
        Ok(())
    }
}

/// Parse `participants` when it is still a JSON-encoded string
///
/// A string only survives merging when it came from the command-line flag;
/// file and stdin fragments already carry structured JSON.
pub fn normalize_participants(merged: &mut Fragment) -> Result<(), ConfigError> {
    if let Some(Value::String(encoded)) = merged.get(PARTICIPANTS_KEY) {
        let parsed = parse_fragment_value(ConfigSource::ParticipantsString, encoded)?;
        merged.insert(PARTICIPANTS_KEY.to_string(), parsed);
    }
    Ok(())
}

/// Accept a string, or a number kept as its decimal text
fn opaque_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Opaque {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Opaque::deserialize(deserializer)? {
        Opaque::Text(text) => text,
        Opaque::Number(number) => number.to_string(),
    })
}

fn opaque_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "opaque_string")] String);

    Option::<Wrapper>::deserialize(deserializer).map(|wrapped| wrapped.map(|Wrapper(text)| text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(value: Value) -> Fragment {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fragment must be an object"),
        }
    }

    #[test]
    fn test_participants_string_is_normalized() {
        let merged = fragment(json!({
            "participants": r#"[{"name":"A","number":"+15550100"}]"#
        }));

        let config = RunConfig::from_merged(merged).unwrap();

        assert_eq!(
            config.participants,
            vec![Participant {
                name: "A".to_string(),
                number: "+15550100".to_string(),
                skip: vec![],
            }]
        );
    }

    #[test]
    fn test_structured_participants_pass_through() {
        let mut merged = fragment(json!({
            "participants": [{"name": "A", "number": "1", "skip": ["B"]}]
        }));
        let before = merged.clone();

        normalize_participants(&mut merged).unwrap();
        assert_eq!(merged, before);
    }

    #[test]
    fn test_invalid_participants_string_names_source() {
        let merged = fragment(json!({ "participants": "[{name: A}]" }));

        let error = RunConfig::from_merged(merged).unwrap_err();
        assert_eq!(error.origin(), Some(ConfigSource::ParticipantsString));
        assert!(error.to_string().starts_with("Parsing participants string"));
    }

    #[test]
    fn test_config_path_is_consumed() {
        let merged = fragment(json!({ "config": "santa.json", "dry": true }));

        let config = RunConfig::from_merged(merged).unwrap();
        assert!(config.dry);
        assert!(!config.extra.contains_key("config"));
    }

    #[test]
    fn test_unknown_fields_are_kept() {
        let merged = fragment(json!({ "region": "us1", "from": "+15550000" }));

        let config = RunConfig::from_merged(merged).unwrap();
        assert_eq!(config.extra.get("region"), Some(&json!("us1")));
        assert_eq!(config.from.as_deref(), Some("+15550000"));
    }

    #[test]
    fn test_numeric_opaque_fields_keep_their_text() {
        let merged = fragment(json!({
            "from": 15550000,
            "participants": [{"name": "A", "number": 15550100}]
        }));

        let config = RunConfig::from_merged(merged).unwrap();
        assert_eq!(config.from.as_deref(), Some("15550000"));
        assert_eq!(config.participants[0].number, "15550100");
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let merged = fragment(json!({ "dry": "yes" }));
        assert!(matches!(
            RunConfig::from_merged(merged),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_defaults_when_fields_absent() {
        let config = RunConfig::from_merged(Fragment::new()).unwrap();
        assert_eq!(config, RunConfig::default());
    }
}
