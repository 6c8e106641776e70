//! Integration tests for the command-line interface.

use assert_cmd::cargo::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn command(config: &str, workdir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("lex-impute"));
    cmd.current_dir(workdir.path())
        .env_remove("RUST_LOG")
        .arg("-i")
        .arg(fixture("stocks.csv"))
        .arg("-c")
        .arg(fixture(config))
        .arg("-o")
        .arg(workdir.path().join("cleaned.csv"));
    cmd
}

#[test]
fn test_successful_run() {
    let workdir = TempDir::new().unwrap();

    command("stocks.ini", &workdir)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Data cleaning process completed successfully!",
        ));

    assert!(workdir.path().join("cleaned.csv").exists());

    // Default log file lands in the working directory
    let log = std::fs::read_to_string(workdir.path().join("data_cleaning.log")).unwrap();
    assert!(log.contains("Read config file"));
    assert!(log.contains("Open: cleaned using strategy linear"));
    assert!(log.contains("Close: cleaned using strategy cubic"));
    assert!(log.contains("Data cleaning process completed successfully and output saved as"));
}

#[test]
fn test_invalid_strategy_exit_code() {
    let workdir = TempDir::new().unwrap();

    command("invalid_strategy.ini", &workdir)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("etl task failed!!!"))
        .stderr(predicate::str::contains("INVALID_STRATEGY"));

    assert!(!workdir.path().join("cleaned.csv").exists());

    let log = std::fs::read_to_string(workdir.path().join("data_cleaning.log")).unwrap();
    assert!(log.contains("inputting missing data for Volume"));
    assert!(log.contains("Data cleaning process failed"));
    // Once from the engine, once from the pipeline
    assert_eq!(
        log.matches("invalid strategy 'average' for column 'Volume'")
            .count(),
        2
    );
}

#[test]
fn test_missing_config_exit_code() {
    let workdir = TempDir::new().unwrap();

    command("missing.ini", &workdir)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("CONFIG_READ"));
}

#[test]
fn test_custom_log_file_is_truncated() {
    let workdir = TempDir::new().unwrap();
    let log_path = workdir.path().join("run.log");
    std::fs::write(&log_path, "stale line from an earlier run\n").unwrap();

    command("stocks.ini", &workdir)
        .arg("--log-file")
        .arg(&log_path)
        .assert()
        .success();

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(!log.contains("stale line"));
    assert!(log.contains("cleaned using strategy"));
}

#[test]
fn test_inspect_prints_profile_and_writes_nothing() {
    let workdir = TempDir::new().unwrap();

    command("stocks.ini", &workdir)
        .arg("--inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("Volume"))
        .stdout(predicate::str::contains("Missing %"));

    assert!(!workdir.path().join("cleaned.csv").exists());
}

#[test]
fn test_json_summary() {
    let workdir = TempDir::new().unwrap();

    let output = command("stocks.ini", &workdir)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["columns"], 6);
    assert_eq!(summary["imputation"]["rows_before"], 6);
}

#[test]
fn test_no_parse_dates_conflicts_with_parse_dates() {
    let workdir = TempDir::new().unwrap();

    command("stocks.ini", &workdir)
        .arg("--no-parse-dates")
        .arg("--parse-dates")
        .arg("Date")
        .assert()
        .failure();
}
