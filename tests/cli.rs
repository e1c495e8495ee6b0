//! Integration tests for the secret-santa binary
//!
//! Every run happens in its own temporary directory with a scrubbed
//! environment and an explicit stdin, so nothing leaks in from the host.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PARTICIPANTS: &str =
    r#"[{"name":"Ann","number":"5550100001"},{"name":"Bob","number":"5550100002"}]"#;

/// Helper to create a secret-santa Command in `dir`
fn santa(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("secret-santa");
    cmd.current_dir(dir.path())
        .env_remove("TWILIO_SID")
        .env_remove("TWILIO_TOKEN")
        .env_remove("SECRET_SANTA_LOG")
        .env_remove("SECRET_SANTA_LOG_FILE");
    cmd
}

fn results_files(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.unwrap().file_name().into_string().ok())
        .filter(|name| name.starts_with("secret-santa-") && name.ends_with(".json"))
        .collect()
}

mod cli_basics {
    use super::*;

    #[test]
    fn test_help() {
        let dir = TempDir::new().unwrap();
        santa(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--accountSid"));
    }

    #[test]
    fn test_version() {
        let dir = TempDir::new().unwrap();
        santa(&dir).arg("--version").assert().success();
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let dir = TempDir::new().unwrap();
        santa(&dir)
            .args(["--verbose", "--quiet"])
            .write_stdin("")
            .assert()
            .failure();
    }
}

mod dry_runs {
    use super::*;

    #[test]
    fn test_dry_run_prints_report_and_saves_nothing() {
        let dir = TempDir::new().unwrap();

        let output = santa(&dir)
            .args(["--dry", "--participants", PARTICIPANTS])
            .write_stdin("")
            .assert()
            .success()
            .stderr(predicate::str::contains("Dry run: true"))
            .stderr(predicate::str::contains("-- Ann +1 (555) 010-0001"))
            .stderr(predicate::str::contains("Results:"))
            .stderr(predicate::str::contains("Doing the real thing").not())
            .get_output()
            .stdout
            .clone();

        let report: Value = serde_json::from_slice(&output).unwrap();
        let items = report.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item["status"] == "ok" && item["dry"] == true));
        assert!(items.iter().any(|item| item["body"]
            == "Hi Ann! You are the Secret Santa for Bob."));
        assert!(results_files(dir.path()).is_empty());
    }

    #[test]
    fn test_stdin_payload_is_merged() {
        let dir = TempDir::new().unwrap();
        let payload = format!(r#"{{"dry": true, "participants": {PARTICIPANTS}}}"#);

        santa(&dir)
            .write_stdin(payload)
            .assert()
            .success()
            .stdout(predicate::str::contains("Secret Santa for"));
    }

    #[test]
    fn test_stdin_overrides_config_file_which_overrides_flags() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("santa.json"),
            format!(r#"{{"message": "file {{name}}", "participants": {PARTICIPANTS}}}"#),
        )
        .unwrap();

        santa(&dir)
            .args(["--dry", "--config", "santa.json", "--message", "flag {name}"])
            .write_stdin(r#"{"message": "stdin {name}"}"#)
            .assert()
            .success()
            .stdout(predicate::str::contains("stdin Ann"))
            .stdout(predicate::str::contains("file Ann").not())
            .stdout(predicate::str::contains("flag Ann").not());
    }
}

mod failures {
    use super::*;

    #[test]
    fn test_invalid_config_file_fails_before_anything_runs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        santa(&dir)
            .args(["--dry", "--config", "broken.json"])
            .write_stdin("")
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("An error occurred:"))
            .stderr(predicate::str::contains("config file"))
            .stderr(predicate::str::contains("Participants:").not());
    }

    #[test]
    fn test_invalid_stdin_names_stdin() {
        let dir = TempDir::new().unwrap();

        santa(&dir)
            .arg("--dry")
            .write_stdin("[1, 2")
            .assert()
            .failure()
            .stderr(predicate::str::contains("stdin"));
    }

    #[test]
    fn test_invalid_participants_string_is_named() {
        let dir = TempDir::new().unwrap();

        santa(&dir)
            .args(["--dry", "--participants", "[{"])
            .write_stdin("")
            .assert()
            .failure()
            .stderr(predicate::str::contains("participants string"));
    }

    #[test]
    fn test_missing_credentials_fail_without_saving() {
        let dir = TempDir::new().unwrap();

        santa(&dir)
            .args(["--wait", "0", "--participants", PARTICIPANTS])
            .write_stdin("")
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Notifier 'secret-santa' failed"))
            .stderr(predicate::str::contains("accountSid"))
            .stderr(predicate::str::contains("Results:").not());

        assert!(results_files(dir.path()).is_empty());
    }
}
