#![allow(deprecated)]

//! End-to-end checks of the `vitalpath` binary
//!
//! Each command runs with a throwaway data directory and the file token
//! store, so no real session or network access is involved.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

mod common;

/// Unroutable API address; connections are refused immediately.
const DEAD_API: &str = "http://127.0.0.1:9";

fn vitalpath(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vitalpath").unwrap();
    cmd.env("VITALPATH_DATA_DIR", data_dir.path())
        .env("VITALPATH_SESSION_STORE", "file")
        .env("VITALPATH_API_URL", DEAD_API)
        .env_remove("VITALPATH_TIMEOUT_SECONDS")
        .env_remove("VITALPATH_PASSWORD")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(data_dir.path().join("missing.yaml"));
    cmd
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("vitalpath").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("discovery"))
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("checkin"));
}

#[test]
fn test_goals_lists_catalog() {
    let data_dir = TempDir::new().unwrap();
    let mut cmd = vitalpath(&data_dir);
    cmd.arg("goals");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Longevity"))
        .stdout(predicate::str::contains("stress"));
}

#[test]
fn test_dashboard_without_session_points_to_login() {
    let data_dir = TempDir::new().unwrap();
    let mut cmd = vitalpath(&data_dir);
    cmd.arg("dashboard");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not signed in"))
        .stderr(predicate::str::contains("vitalpath login"));
}

#[test]
fn test_discovery_without_session_fails_before_prompting() {
    let data_dir = TempDir::new().unwrap();
    let (_answers_dir, answers) = common::temp_config_file("preferred_name: Alex\n");
    let mut cmd = vitalpath(&data_dir);
    cmd.arg("discovery").arg("--answers").arg(answers);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("vitalpath login"));
}

#[test]
fn test_status_reports_signed_out_and_unreachable() {
    let data_dir = TempDir::new().unwrap();
    let mut cmd = vitalpath(&data_dir);
    cmd.arg("status");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("unreachable"))
        .stdout(predicate::str::contains("Signed in:  no"));
}

#[test]
fn test_logout_without_session_succeeds() {
    let data_dir = TempDir::new().unwrap();
    let mut cmd = vitalpath(&data_dir);
    cmd.arg("logout");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Signed out."));
}

#[test]
fn test_checkin_rejects_out_of_range_score() {
    let data_dir = TempDir::new().unwrap();
    let mut cmd = vitalpath(&data_dir);
    cmd.arg("checkin").arg("--score").arg("energy=101");

    cmd.assert().failure();
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let (_temp_dir, config_path) =
        common::temp_config_file("api:\n  base_url: ftp://files.example\n");

    let mut cmd = Command::cargo_bin("vitalpath").unwrap();
    cmd.env_remove("VITALPATH_API_URL")
        .arg("--config")
        .arg(config_path)
        .arg("goals");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("http or https"));
}
