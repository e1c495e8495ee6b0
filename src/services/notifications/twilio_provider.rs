//! Twilio SMS transport implementation.
//!
//! Sends and looks up messages through the Twilio REST API using the global
//! `HTTP_CLIENT`.
//!
//! Twilio API Reference: https://www.twilio.com/docs/messaging/api/message-resource

use crate::config::RunConfig;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use reqwest::{Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Instant;

/// Production Twilio API endpoint
pub const TWILIO_API_BASE: &str = "https://api.twilio.com";

const API_VERSION: &str = "2010-04-01";

/// Twilio's acknowledgement of a queued message
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeliveryReceipt {
    pub sid: String,
    pub status: String,
}

/// A message previously sent from the account
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SentMessage {
    pub sid: String,
    pub to: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    message: Option<String>,
}

/// Trait for anything that can deliver a text message
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Sends `body` to the phone number `to`
    async fn send(&self, to: &str, body: &str) -> AppResult<DeliveryReceipt>;

    /// Looks up a previously sent message by its id
    async fn fetch(&self, sid: &str) -> AppResult<SentMessage>;

    /// Returns the transport name for logging/debugging
    fn name(&self) -> &'static str;

    /// Validates transport configuration (optional, default no-op)
    ///
    /// Called before the first real send so a misconfigured run fails
    /// without sending anything.
    async fn validate_config(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Twilio transport
///
/// Credentials and the sender number are optional at construction time so a
/// dry run never needs them; [`validate_config`](MessageTransport::validate_config)
/// enforces them before a real run.
#[derive(Debug, Clone)]
pub struct TwilioTransport {
    account_sid: Option<String>,
    account_token: Option<String>,
    from: Option<String>,
    base_url: String,
}

impl TwilioTransport {
    pub fn new(
        account_sid: Option<String>,
        account_token: Option<String>,
        from: Option<String>,
    ) -> Self {
        Self {
            account_sid,
            account_token,
            from,
            base_url: TWILIO_API_BASE.to_string(),
        }
    }

    /// Creates a transport from the `accountSid`, `accountToken` and `from` options
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            config.account_sid.clone(),
            config.account_token.clone(),
            config.from.clone(),
        )
    }

    /// Point the transport at another API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn credentials(&self) -> AppResult<(&str, &str)> {
        let sid = required(self.account_sid.as_deref(), "accountSid")?;
        let token = required(self.account_token.as_deref(), "accountToken")?;
        Ok((sid, token))
    }

    fn messages_url(&self, account_sid: &str) -> String {
        format!(
            "{}/{API_VERSION}/Accounts/{account_sid}/Messages.json",
            self.base_url.trim_end_matches('/')
        )
    }

    fn message_url(&self, account_sid: &str, message_sid: &str) -> String {
        format!(
            "{}/{API_VERSION}/Accounts/{account_sid}/Messages/{message_sid}.json",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Decodes a Twilio response, turning non-2xx replies into transport errors
    async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(AppError::from);
        }

        let text = response.text().await.unwrap_or_default();
        Err(AppError::Transport {
            status: Some(status.as_u16()),
            message: error_message(&text, status.canonical_reason()),
        })
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> AppResult<&'a str> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::validation(
            field,
            format!("'{field}' is required to send messages"),
        )),
    }
}

/// Best description of a failed Twilio call
fn error_message(body: &str, reason: Option<&str>) -> String {
    serde_json::from_str::<TwilioErrorBody>(body)
        .ok()
        .and_then(|error| error.message)
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .or_else(|| reason.map(str::to_string))
        .unwrap_or_else(|| "unknown error".to_string())
}

fn network_error(error: reqwest::Error) -> AppError {
    AppError::Transport {
        status: error.status().map(|status| status.as_u16()),
        message: error.to_string(),
    }
}

#[async_trait]
impl MessageTransport for TwilioTransport {
    async fn send(&self, to: &str, body: &str) -> AppResult<DeliveryReceipt> {
        let (account_sid, account_token) = self.credentials()?;
        let from = required(self.from.as_deref(), "from")?;
        let start = Instant::now();

        let response = HTTP_CLIENT
            .post(self.messages_url(account_sid))
            .basic_auth(account_sid, Some(account_token))
            .form(&[("To", to), ("From", from), ("Body", body)])
            .send()
            .await
            .map_err(network_error)?;

        let receipt: DeliveryReceipt = Self::decode(response).await?;
        tracing::debug!(
            sid = %receipt.sid,
            status = %receipt.status,
            duration_ms = start.elapsed().as_millis() as u64,
            "Message accepted by Twilio"
        );
        Ok(receipt)
    }

    async fn fetch(&self, sid: &str) -> AppResult<SentMessage> {
        let (account_sid, account_token) = self.credentials()?;

        let response = HTTP_CLIENT
            .get(self.message_url(account_sid, sid))
            .basic_auth(account_sid, Some(account_token))
            .send()
            .await
            .map_err(network_error)?;

        Self::decode(response).await
    }

    fn name(&self) -> &'static str {
        "twilio"
    }

    /// Validates Twilio configuration
    ///
    /// Checks that:
    /// - `accountSid`, `accountToken` and `from` are present
    /// - the API base URL is a valid http(s) URL
    async fn validate_config(&self) -> AppResult<()> {
        self.credentials()?;
        required(self.from.as_deref(), "from")?;

        let url = Url::parse(&self.base_url).map_err(|_| AppError::Validation {
            field: "base_url".to_string(),
            reason: "Invalid URL format".to_string(),
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(AppError::Validation {
                field: "base_url".to_string(),
                reason: "URL must use http or https protocol".to_string(),
            });
        }

        Ok(())
    }
}
