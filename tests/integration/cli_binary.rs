//! Integration tests running the pvelist binary.
//!
//! None of these reach a network: they cover the paths that must finish
//! before any connection is attempted.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary with a clean environment rooted in `temp_dir`.
fn run(temp_dir: &TempDir, args: &[&str]) -> Output {
    let home = temp_dir.path().join("home");
    let config_home = temp_dir.path().join("config");
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&config_home).unwrap();

    let bin = env!("CARGO_BIN_EXE_pvelist");
    Command::new(bin)
        .env_clear()
        .env("HOME", home.as_os_str())
        .env("XDG_CONFIG_HOME", config_home.as_os_str())
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_no_command_prints_usage_and_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&temp_dir, &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Usage:"));
    assert!(stdout(&output).contains("list [object type]"));
}

#[test]
fn test_help_for_list_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&temp_dir, &["help", "list"]);

    assert!(
        output.status.success(),
        "help list should succeed: stderr={:?}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("list storage"));
}

#[test]
fn test_help_for_unknown_command() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&temp_dir, &["help", "frobnicate"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "Unknown command: frobnicate\n");
}

#[test]
fn test_unknown_command_prints_usage() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&temp_dir, &["frobnicate"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage:"));
}

#[test]
fn test_unknown_object_type_shows_list_help() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&temp_dir, &["list", "pools"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("list vm"));
}

#[test]
fn test_list_cluster_is_fatal_without_connecting() {
    let temp_dir = TempDir::new().unwrap();
    // Unroutable address: reaching the network would hang until timeout
    let output = run(
        &temp_dir,
        &["--server", "https://192.0.2.1:8006/api2/json", "list", "cluster"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(
        stderr(&output).contains("Cluster operations are not yet supported"),
        "stderr={:?}",
        stderr(&output)
    );
}

#[test]
fn test_invalid_config_file_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("bad.toml");
    fs::write(&config, "[connection]\ntimeout_secs = 0\n").unwrap();

    let output = run(
        &temp_dir,
        &["--config", config.to_str().unwrap(), "list", "node"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Configuration validation failed"));
}

#[test]
fn test_log_file_receives_diagnostics() {
    let temp_dir = TempDir::new().unwrap();
    let log_file = temp_dir.path().join("logs").join("pvelist.log");

    let output = run(
        &temp_dir,
        &[
            "--log-level",
            "info",
            "--log-file",
            log_file.to_str().unwrap(),
            "help",
        ],
    );

    assert!(output.status.success());
    assert!(stderr(&output).is_empty());
    let content = fs::read_to_string(&log_file).unwrap();
    assert!(content.contains("pvelist starting"));
}

#[test]
fn test_fatal_error_is_reported_once() {
    let temp_dir = TempDir::new().unwrap();
    // Port 1 refuses connections, so login fails at once
    let output = run(
        &temp_dir,
        &["--server", "http://127.0.0.1:1/api2/json", "list", "node"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    let stderr = stderr(&output);
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines.len(), 1, "stderr={:?}", stderr);
    assert!(lines[0].starts_with("Failed to login: "), "stderr={:?}", stderr);
    assert!(!stderr.contains('\u{1b}'));
}

#[test]
fn test_single_dash_long_flags_are_accepted() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&temp_dir, &["-username", "ops", "-realm", "pve", "help"]);

    assert!(
        output.status.success(),
        "single-dash flags should parse: stderr={:?}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("Usage:"));
}

#[test]
fn test_zero_timeout_flag_is_rejected_before_connecting() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(
        &temp_dir,
        &["--server", "https://192.0.2.1:8006/api2/json", "--timeout", "0", "list", "node"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("Timeout must be at least one second"),
        "stderr={:?}",
        stderr(&output)
    );
}
