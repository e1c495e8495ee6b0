//! Core notifier trait and result types.
//!
//! The run pipeline only knows about [`Notifier`]: it hands over the resolved
//! configuration and gets back one [`ResultItem`] per attempted message.

use crate::config::RunConfig;
use crate::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Outcome of one message attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Ok,
    Error,
}

/// One entry of the notifier's result list
///
/// Only `status` has meaning to the pipeline; everything else is passed
/// through to the report and the results file as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub status: DeliveryStatus,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ResultItem {
    pub fn ok() -> Self {
        Self {
            status: DeliveryStatus::Ok,
            fields: Map::new(),
            body: None,
        }
    }

    /// A failed attempt carrying the reason in its `error` field
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Error,
            fields: Map::new(),
            body: None,
        }
        .with_field("error", reason.into())
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn is_failed(&self) -> bool {
        self.status == DeliveryStatus::Error
    }
}

impl fmt::Display for ResultItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{self:?}"),
        }
    }
}

/// Trait for the matching and notification capability
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// Implementations must return a representative result list for dry runs as
/// well, without causing any side effect.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Perform the run described by `config`
    ///
    /// # Returns
    /// One result per attempted (or, for dry runs, planned) message
    async fn run(&self, config: &RunConfig) -> AppResult<Vec<ResultItem>>;

    /// Returns the notifier name for logging/debugging
    fn name(&self) -> &'static str;
}
