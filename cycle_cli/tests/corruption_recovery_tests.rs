//! Corruption recovery tests for cyclecast.
//!
//! These tests verify the CLI can handle:
//! - Corrupted profile files
//! - Stored profiles with impossible values
//! - Missing data directories

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cyclecast"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .arg("--data-dir")
        .arg(temp_dir.path());
    cmd
}

#[test]
fn test_corrupted_profile_file() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("profiles.json"), "{ invalid json }}}}")
        .expect("Failed to write corrupted profiles");

    cli(&temp_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No profiles saved yet"));
}

#[test]
fn test_corrupted_profile_file_is_replaced_on_save() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("profiles.json");
    fs::write(&path, "not json at all").unwrap();

    cli(&temp_dir)
        .args(["profile", "set-cycle", "--last-period", "2024-05-01"])
        .assert()
        .success();

    let contents = fs::read_to_string(&path).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(stored["cycle"]["last_period_start"], "2024-05-01");
}

#[test]
fn test_stored_profile_with_invalid_length_fails_projection() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("profiles.json"),
        r#"{"cycle":{"last_period_start":"2024-01-01","cycle_length_days":0,"period_duration_days":0}}"#,
    )
    .unwrap();

    cli(&temp_dir)
        .args(["cycle", "--today", "2024-02-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidProfile"));
}

#[test]
fn test_missing_data_dir_is_created_on_save() {
    let temp_dir = setup_test_dir();
    let nested = temp_dir.path().join("a/b/c");

    Command::new(assert_cmd::cargo::cargo_bin!("cyclecast"))
        .env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .arg("--data-dir")
        .arg(&nested)
        .args(["profile", "set-pregnancy", "--lmp", "2024-01-01"])
        .assert()
        .success();

    assert!(nested.join("profiles.json").exists());
}

#[test]
fn test_clear_without_file_is_noop() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["profile", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to clear"));
    assert!(!temp_dir.path().join("profiles.json").exists());
}
