//! Integration tests for the rigger CLI surface: help, version, global flags.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn rigger() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rigger"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    rigger().assert().code(2).stderr(predicate::str::contains(
        "Turn a freshly booted remote machine into a container engine host",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    let assert = rigger().arg("--help").assert().success();
    let out = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for cmd in ["provision", "ssh", "hostname", "os-release", "engine-config", "version"] {
        assert!(out.contains(cmd), "help is missing {cmd}:\n{out}");
    }
}

#[test]
fn test_cli_version_flag_shows_version() {
    rigger()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rigger"));
}

#[test]
fn test_version_command_shows_version() {
    rigger()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rigger 0.1.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let assert = rigger().args(["--json", "version"]).assert().success();
    let v: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON");
    assert_eq!(v["version"], "0.1.0");
}

#[test]
fn test_provision_help_shows_password_options() {
    rigger()
        .args(["provision", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--ask-password"))
        .stdout(predicate::str::contains("--password-env"))
        .stdout(predicate::str::contains("after-key-install"));
}

// --- Global flags tests ---

#[test]
fn test_global_flags_accepted() {
    rigger().args(["--quiet", "version"]).assert().success();
    rigger().args(["--no-color", "version"]).assert().success();
    rigger().args(["--debug", "version"]).assert().success();
}

#[test]
fn test_debug_env_var_accepted() {
    rigger().env("DEBUG", "1").arg("version").assert().success();
}

// --- Error handling tests ---

#[test]
fn test_unknown_command_exits_with_error() {
    rigger()
        .arg("nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_provision_requires_machine() {
    rigger()
        .arg("provision")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<MACHINE>"));
}

#[test]
fn test_invalid_password_policy_rejected() {
    rigger()
        .args(["provision", "node1", "--password-policy", "sometimes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}
