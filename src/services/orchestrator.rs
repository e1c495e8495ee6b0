//! Run orchestration: one call into the notifier per process run.

use std::time::Instant;

use crate::config::RunConfig;
use crate::error::{AppError, AppResult};
use crate::services::notifications::{Notifier, ResultItem};

/// Invokes the notifier exactly once and collects its results
///
/// Retries, batching and parallelism are left to the notifier.
pub struct RunOrchestrator<'n> {
    notifier: &'n dyn Notifier,
}

impl<'n> RunOrchestrator<'n> {
    pub fn new(notifier: &'n dyn Notifier) -> Self {
        Self { notifier }
    }

    /// Run the notifier with the resolved configuration
    ///
    /// # Errors
    /// `AppError::Notifier` wrapping whatever the notifier failed with.
    pub async fn run(&self, config: &RunConfig) -> AppResult<Vec<ResultItem>> {
        let notifier = self.notifier.name();
        let start = Instant::now();
        tracing::info!(notifier, dry = config.dry, "Invoking notifier");

        let results = self
            .notifier
            .run(config)
            .await
            .map_err(|source| AppError::Notifier {
                notifier,
                source: Box::new(source),
            })?;

        tracing::info!(
            notifier,
            results = results.len(),
            failed = results.iter().filter(|item| item.is_failed()).count(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Notifier finished"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingNotifier {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn run(&self, config: &RunConfig) -> AppResult<Vec<ResultItem>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::validation("accountSid", "missing"));
            }
            Ok(vec![ResultItem::ok().with_field("dry", config.dry)])
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_notifier_called_once_with_config() {
        let notifier = CountingNotifier {
            calls: AtomicUsize::new(0),
            fail: false,
        };
        let config = RunConfig {
            dry: true,
            ..RunConfig::default()
        };

        let results = RunOrchestrator::new(&notifier).run(&config).await.unwrap();

        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(results[0].fields["dry"], serde_json::json!(true));
    }

    #[tokio::test]
    async fn test_notifier_failure_is_wrapped() {
        let notifier = CountingNotifier {
            calls: AtomicUsize::new(0),
            fail: true,
        };

        let error = RunOrchestrator::new(&notifier)
            .run(&RunConfig::default())
            .await
            .unwrap_err();

        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
        match error {
            AppError::Notifier { notifier, source } => {
                assert_eq!(notifier, "counting");
                assert!(matches!(*source, AppError::Validation { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
