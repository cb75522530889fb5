//! Integration tests for the filesift CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn filesift() -> Command {
    let mut cmd = Command::cargo_bin("filesift").unwrap();
    // keep the host environment out of the merged config
    for key in [
        "FILESIFT_EXCLUDE",
        "FILESIFT_FILTERS",
        "FILESIFT_MAX_FILE_SIZE",
        "FILESIFT_TIMEOUT_SECS",
        "FILESIFT_IGNORE_FILENAMES",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

fn fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join(".gitignore"), "*.secret\n").unwrap();
    fs::write(root.join("main.go"), "package main\n").unwrap();
    fs::write(root.join("config.secret"), "password\n").unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/utils.go"), "package src\n").unwrap();
    fs::write(root.join("src/api.secret"), "token\n").unwrap();
    temp_dir
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    filesift()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    filesift()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("filesift"));
}

#[test]
fn test_invalid_subcommand() {
    filesift()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_scan_prints_accepted_paths() {
    let temp_dir = fixture();
    filesift()
        .arg("-q")
        .arg("scan")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("main.go"))
        .stdout(predicate::str::contains("utils.go"))
        .stdout(predicate::str::contains(".secret").not());
}

#[test]
fn test_scan_defaults_to_current_directory() {
    let temp_dir = fixture();
    filesift()
        .current_dir(temp_dir.path())
        .args(["-q", "scan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("main.go"));
}

#[test]
fn test_directory_flag() {
    let temp_dir = fixture();
    filesift()
        .arg("-C")
        .arg(temp_dir.path())
        .args(["-q", "scan", "src"])
        .assert()
        .success()
        .stdout(predicate::str::contains("utils.go"))
        .stdout(predicate::str::contains("main.go").not());
}

#[test]
fn test_scan_exclude_flag() {
    let temp_dir = fixture();
    filesift()
        .current_dir(temp_dir.path())
        .args(["-q", "scan", "--exclude", "src, other"])
        .assert()
        .success()
        .stdout(predicate::str::contains("main.go"))
        .stdout(predicate::str::contains("utils.go").not());
}

#[test]
fn test_scan_rejects_empty_exclude() {
    let temp_dir = fixture();
    filesift()
        .current_dir(temp_dir.path())
        .args(["scan", "--exclude="])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--exclude=subdirectory"));
}

#[test]
fn test_scan_rejects_path_in_exclude() {
    let temp_dir = fixture();
    filesift()
        .current_dir(temp_dir.path())
        .args(["scan", "--exclude", "src/utils.go"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("paths are not allowed"));
}

#[test]
fn test_scan_missing_path_fails() {
    let temp_dir = TempDir::new().unwrap();
    filesift()
        .arg("scan")
        .arg(temp_dir.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no usable input paths"));
}

#[test]
fn test_scan_json_output() {
    let temp_dir = fixture();
    let output = filesift()
        .args(["-q", "scan", "--format", "json"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["files"].as_array().unwrap().len(), 3);
    assert_eq!(report["stats"]["files_excluded_by_rules"], 2);
    assert_eq!(report["state"], "closed");
    assert!(report["interrupted"].is_null());
}

#[test]
fn test_scan_uses_config_file() {
    let temp_dir = fixture();
    let config_path = temp_dir.path().join("custom.yaml");
    fs::write(&config_path, "exclude: [src]\n").unwrap();

    filesift()
        .current_dir(temp_dir.path())
        .arg("--config")
        .arg(&config_path)
        .args(["-q", "scan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("utils.go").not());
}

#[test]
fn test_summary_goes_to_stderr() {
    let temp_dir = fixture();
    filesift()
        .arg("scan")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("3 files accepted"));
}

#[test]
fn test_config_prints_merged_json() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("filesift.toml"), "max_file_size = 1234\n").unwrap();

    filesift()
        .current_dir(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"max_file_size\": 1234"))
        .stdout(predicate::str::contains("\".gitignore\""));
}

#[test]
fn test_env_overrides_config_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("filesift.toml"), "timeout_secs = 9\n").unwrap();

    filesift()
        .current_dir(temp_dir.path())
        .env("FILESIFT_TIMEOUT_SECS", "42")
        .args(["config", "--compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"timeout_secs\":42"));
}
