//! Results sink: persistence, reporting and aggregate failure.

use std::io::Write;
use std::path::PathBuf;

use jiff::Timestamp;
use jiff::tz::TimeZone;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::services::notifications::ResultItem;

/// Replacement for every `body` field in a non-dry report
pub const REDACTED: &str = "[REDACTED]";

const REDACTED_FIELD: &str = "body";

/// Name of the results file for a run finishing at `at`
///
/// The ISO-8601 UTC time with millisecond precision, with `:` and `.` made
/// file-system friendly: `secret-santa-2024-12-01T18_04_05_123Z.json`.
pub fn results_file_name(at: Timestamp) -> String {
    let utc = at.to_zoned(TimeZone::UTC);
    let iso = format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        utc.year(),
        utc.month(),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second(),
        utc.millisecond()
    );
    format!("secret-santa-{}.json", iso.replace([':', '.'], "_"))
}

/// Replace every `body` field, at any depth, with [`REDACTED`]
pub fn redact(value: &mut Value) {
    match value {
        Value::Object(fields) => {
            for (key, field) in fields.iter_mut() {
                if key == REDACTED_FIELD {
                    *field = Value::String(REDACTED.to_string());
                } else {
                    redact(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

/// Where results go once the notifier is done
#[derive(Debug, Clone)]
pub struct ResultsSink {
    dry: bool,
    dir: PathBuf,
}

impl ResultsSink {
    /// `dir` receives the results file of a non-dry run
    pub fn new(dry: bool, dir: impl Into<PathBuf>) -> Self {
        Self {
            dry,
            dir: dir.into(),
        }
    }

    /// Write the unredacted results as JSON
    pub async fn persist(&self, results: &[ResultItem]) -> AppResult<PathBuf> {
        let path = self.dir.join(results_file_name(Timestamp::now()));
        let json = serde_json::to_vec(results)?;
        tokio::fs::write(&path, json).await?;
        Ok(path)
    }

    /// Print the results as pretty JSON, redacted unless this is a dry run
    pub fn report<W: Write>(&self, results: &[ResultItem], out: &mut W) -> AppResult<()> {
        let mut value = serde_json::to_value(results)?;
        if !self.dry {
            redact(&mut value);
        }
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        out.flush()?;
        Ok(())
    }

    /// Fail the run if any item reports `status: "error"`
    ///
    /// Failed items are redacted the same way as the report, at any depth.
    pub fn check(&self, results: &[ResultItem]) -> AppResult<()> {
        let mut failed = Vec::new();
        for item in results.iter().filter(|item| item.is_failed()) {
            if self.dry {
                failed.push(item.clone());
                continue;
            }
            let mut value = serde_json::to_value(item)?;
            redact(&mut value);
            failed.push(serde_json::from_value(value)?);
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(AppError::DeliveryFailure { failed })
        }
    }

    /// Persist (best effort), report, then surface any per-item failure
    pub async fn finish<O, D>(&self, results: &[ResultItem], out: &mut O, diag: &mut D) -> AppResult<()>
    where
        O: Write,
        D: Write,
    {
        if !self.dry {
            match self.persist(results).await {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "Results saved");
                    if let Err(error) =
                        writeln!(diag, "Saved a copy of the results at {}", path.display())
                    {
                        tracing::warn!(error = %error, "Could not announce the results file");
                    }
                }
                Err(error) => {
                    tracing::warn!(error = %error, dir = %self.dir.display(), "Could not save results file");
                }
            }
        }

        writeln!(diag, "Results:")?;
        self.report(results, out)?;
        self.check(results)
    }
}
