//! Secret Santa notifier: draws matches and texts every giver.

use super::matcher::{Assignment, assign};
use super::provider::{Notifier, ResultItem};
use super::twilio_provider::{MessageTransport, TwilioTransport};
use crate::config::RunConfig;
use crate::error::AppResult;
use crate::utils::phone::to_e164;
use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Instant;

/// Message used when no `message` option is configured
pub const DEFAULT_MESSAGE: &str = "Hi {name}! You are the Secret Santa for {match}.";

/// Notifier that draws matches and sends one message per giver
///
/// With `sid` set it resends that earlier message instead of drawing.
pub struct SecretSantaNotifier<T> {
    transport: T,
    seed: Option<u64>,
}

impl SecretSantaNotifier<TwilioTransport> {
    /// Notifier sending through Twilio with the credentials in `config`
    pub fn twilio(config: &RunConfig) -> Self {
        Self::new(TwilioTransport::from_config(config))
    }
}

impl<T: MessageTransport> SecretSantaNotifier<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            seed: None,
        }
    }

    /// Make the draw reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn draw<'a>(&self, config: &'a RunConfig) -> AppResult<Vec<Assignment<'a>>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        assign(&config.participants, &mut rng)
    }

    async fn draw_and_notify(&self, config: &RunConfig) -> AppResult<Vec<ResultItem>> {
        let assignments = self.draw(config)?;
        let template = config.message.as_deref().unwrap_or(DEFAULT_MESSAGE);
        let mut results = Vec::with_capacity(assignments.len());

        for Assignment { giver, recipient } in assignments {
            let body = render_message(template, &giver.name, &recipient.name);
            let number = to_e164(&giver.number);
            let item = ResultItem::ok()
                .with_field("name", giver.name.as_str())
                .with_field("to", number.as_deref().unwrap_or(&giver.number));

            if config.dry {
                results.push(item.with_field("dry", true).with_body(body));
                continue;
            }

            let Some(to) = number else {
                tracing::warn!(name = %giver.name, "Skipping participant with an unrecognized phone number");
                results.push(
                    ResultItem::error(format!("unrecognized phone number '{}'", giver.number))
                        .with_field("name", giver.name.as_str())
                        .with_field("to", giver.number.as_str())
                        .with_body(body),
                );
                continue;
            };

            results.push(self.deliver(item, &to, body).await);
        }

        Ok(results)
    }

    async fn resend(&self, config: &RunConfig, sid: &str) -> AppResult<ResultItem> {
        if config.dry {
            let mut item = ResultItem::ok()
                .with_field("resend", sid)
                .with_field("dry", true);
            if let Some(to) = &config.to {
                item = item.with_field("to", to.as_str());
            }
            return Ok(item);
        }

        let original = self.transport.fetch(sid).await?;
        let to = config
            .to
            .as_deref()
            .map(|to| to_e164(to).unwrap_or_else(|| to.to_string()))
            .unwrap_or(original.to);

        let item = ResultItem::ok()
            .with_field("resend", original.sid.as_str())
            .with_field("to", to.as_str());
        Ok(self.deliver(item, &to, original.body).await)
    }

    /// Sends one message, recording a failure in the item instead of failing the run
    async fn deliver(&self, item: ResultItem, to: &str, body: String) -> ResultItem {
        let start = Instant::now();
        match self.transport.send(to, &body).await {
            Ok(receipt) => item.with_field("sid", receipt.sid).with_body(body),
            Err(error) => {
                tracing::warn!(
                    transport = self.transport.name(),
                    to = %to,
                    error = %error,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Message could not be sent"
                );
                let mut failed = ResultItem::error(error.to_string()).with_body(body);
                failed.fields.extend(item.fields);
                failed
            }
        }
    }
}

#[async_trait]
impl<T: MessageTransport> Notifier for SecretSantaNotifier<T> {
    async fn run(&self, config: &RunConfig) -> AppResult<Vec<ResultItem>> {
        if !config.dry {
            self.transport.validate_config().await?;
        }

        match config.sid.as_deref() {
            Some(sid) => Ok(vec![self.resend(config, sid).await?]),
            None => self.draw_and_notify(config).await,
        }
    }

    fn name(&self) -> &'static str {
        "secret-santa"
    }
}

/// Fill `{name}` with the giver and `{match}` with the recipient
pub fn render_message(template: &str, giver: &str, recipient: &str) -> String {
    template.replace("{name}", giver).replace("{match}", recipient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Participant;
    use crate::error::AppError;
    use crate::services::notifications::DeliveryStatus;
    use crate::services::notifications::twilio_provider::{DeliveryReceipt, SentMessage};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, String)>>,
        fail_for: Option<String>,
    }

    #[async_trait]
    impl MessageTransport for RecordingTransport {
        async fn send(&self, to: &str, body: &str) -> AppResult<DeliveryReceipt> {
            if self.fail_for.as_deref() == Some(to) {
                return Err(AppError::Transport {
                    status: Some(400),
                    message: "invalid 'To' number".to_string(),
                });
            }
            let mut sent = self.sent.lock().unwrap();
            sent.push((to.to_string(), body.to_string()));
            Ok(DeliveryReceipt {
                sid: format!("SM{}", sent.len()),
                status: "queued".to_string(),
            })
        }

        async fn fetch(&self, sid: &str) -> AppResult<SentMessage> {
            Ok(SentMessage {
                sid: sid.to_string(),
                to: "+15550101".to_string(),
                body: "original body".to_string(),
            })
        }

        fn name(&self) -> &'static str {
            "recording"
        }

        async fn validate_config(&self) -> AppResult<()> {
            Ok(())
        }
    }

    fn participants() -> Vec<Participant> {
        vec![
            Participant {
                name: "Ann".to_string(),
                number: "5550100001".to_string(),
                skip: vec![],
            },
            Participant {
                name: "Bob".to_string(),
                number: "5550100002".to_string(),
                skip: vec![],
            },
        ]
    }

    fn config(dry: bool) -> RunConfig {
        RunConfig {
            dry,
            participants: participants(),
            message: Some("{name} -> {match}".to_string()),
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_render_message() {
        assert_eq!(
            render_message(DEFAULT_MESSAGE, "Ann", "Bob"),
            "Hi Ann! You are the Secret Santa for Bob."
        );
    }

    #[tokio::test]
    async fn test_dry_run_sends_nothing_but_reports_every_message() {
        let notifier = SecretSantaNotifier::new(RecordingTransport::default()).with_seed(3);

        let results = notifier.run(&config(true)).await.unwrap();

        assert!(notifier.transport.sent.lock().unwrap().is_empty());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].body.as_deref(), Some("Ann -> Bob"));
        assert_eq!(results[0].fields["to"], json!("+15550100001"));
        assert_eq!(results[0].fields["dry"], json!(true));
        assert!(results.iter().all(|r| r.status == DeliveryStatus::Ok));
    }

    #[tokio::test]
    async fn test_real_run_sends_one_message_per_giver() {
        let notifier = SecretSantaNotifier::new(RecordingTransport::default()).with_seed(3);

        let results = notifier.run(&config(false)).await.unwrap();

        let sent = notifier.transport.sent.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![
                ("+15550100001".to_string(), "Ann -> Bob".to_string()),
                ("+15550100002".to_string(), "Bob -> Ann".to_string()),
            ]
        );
        assert_eq!(results[1].fields["sid"], json!("SM2"));
    }

    #[tokio::test]
    async fn test_failed_send_becomes_error_item() {
        let transport = RecordingTransport {
            fail_for: Some("+15550100002".to_string()),
            ..RecordingTransport::default()
        };
        let notifier = SecretSantaNotifier::new(transport).with_seed(3);

        let results = notifier.run(&config(false)).await.unwrap();

        assert_eq!(results[0].status, DeliveryStatus::Ok);
        assert_eq!(results[1].status, DeliveryStatus::Error);
        assert_eq!(results[1].fields["name"], json!("Bob"));
        assert!(
            results[1].fields["error"]
                .as_str()
                .unwrap()
                .contains("invalid 'To' number")
        );
    }

    #[tokio::test]
    async fn test_unrecognized_number_is_not_sent() {
        let mut config = config(false);
        config.participants[0].number = "ask Bob".to_string();
        let notifier = SecretSantaNotifier::new(RecordingTransport::default()).with_seed(3);

        let results = notifier.run(&config).await.unwrap();

        assert_eq!(notifier.transport.sent.lock().unwrap().len(), 1);
        assert!(results[0].is_failed());
    }

    #[tokio::test]
    async fn test_resend_uses_original_body() {
        let config = RunConfig {
            sid: Some("SM42".to_string()),
            to: Some("(555) 010-0009".to_string()),
            ..RunConfig::default()
        };
        let notifier = SecretSantaNotifier::new(RecordingTransport::default());

        let results = notifier.run(&config).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].fields["resend"], json!("SM42"));
        assert_eq!(
            notifier.transport.sent.lock().unwrap().clone(),
            vec![("+15550100009".to_string(), "original body".to_string())]
        );
    }

    #[tokio::test]
    async fn test_resend_falls_back_to_original_recipient() {
        let config = RunConfig {
            sid: Some("SM42".to_string()),
            ..RunConfig::default()
        };
        let notifier = SecretSantaNotifier::new(RecordingTransport::default());

        let results = notifier.run(&config).await.unwrap();
        assert_eq!(results[0].fields["to"], json!("+15550101"));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_sending() {
        let notifier = SecretSantaNotifier::twilio(&config(false));
        let error = notifier.run(&config(false)).await.unwrap_err();
        assert!(matches!(error, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_draw_errors_propagate() {
        let mut config = config(true);
        config.participants.truncate(1);
        let notifier = SecretSantaNotifier::new(RecordingTransport::default());

        assert!(notifier.run(&config).await.is_err());
    }
}
