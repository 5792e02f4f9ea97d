//! Integration tests for commands that resolve machines from the config file.
//!
//! Every test points `RIGGER_CONFIG` at a temp file; none reaches the network.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = "\
machines:
  pi:
    driver: aiyara
    host: 192.168.1.40
  box:
    host: 10.0.0.9
    port: 2222
engine:
  port: 2377
";

fn config_file(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, content).expect("write config");
    (dir, path)
}

fn rigger(config: &PathBuf) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rigger"));
    cmd.env("NO_COLOR", "1").env("RIGGER_CONFIG", config);
    cmd
}

#[test]
fn test_engine_config_renders_options_file() {
    let (_dir, path) = config_file(CONFIG);
    rigger(&path)
        .args(["engine-config", "pi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# /etc/default/docker"))
        .stdout(predicate::str::contains("export DOCKER_OPTS=\"--tlsverify"))
        .stdout(predicate::str::contains("--label=provider=aiyara"))
        .stdout(predicate::str::contains("--host=tcp://0.0.0.0:2377"))
        .stdout(predicate::str::contains("--label=architecture=arm"));
}

#[test]
fn test_engine_config_uses_generic_provider_by_default() {
    let (_dir, path) = config_file(CONFIG);
    rigger(&path)
        .args(["engine-config", "box"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--label=provider=generic"));
}

#[test]
fn test_engine_config_json() {
    let (_dir, path) = config_file(CONFIG);
    let assert = rigger(&path)
        .args(["--json", "engine-config", "pi"])
        .assert()
        .success();
    let v: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON");
    assert_eq!(v["engine_options_path"], "/etc/default/docker");
    assert!(
        v["engine_options"]
            .as_str()
            .expect("string")
            .starts_with("export DOCKER_OPTS=")
    );
}

#[test]
fn test_unknown_machine_lists_defined_ones() {
    let (_dir, path) = config_file(CONFIG);
    rigger(&path)
        .args(["engine-config", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Machine 'ghost' is not defined"))
        .stderr(predicate::str::contains("box, pi"));
}

#[test]
fn test_unknown_machine_without_config_file() {
    let dir = TempDir::new().expect("tempdir");
    rigger(&dir.path().join("absent.yaml"))
        .args(["provision", "pi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("(none)"));
}

#[test]
fn test_invalid_machine_name_rejected() {
    let (_dir, path) = config_file(CONFIG);
    rigger(&path)
        .args(["engine-config", "bad_name"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid machine name 'bad_name'"));
}

#[test]
fn test_json_errors_are_structured() {
    let (_dir, path) = config_file(CONFIG);
    let assert = rigger(&path)
        .args(["--json", "engine-config", "ghost"])
        .assert()
        .failure();
    let v: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stderr).expect("valid JSON");
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "CONFIG");
}

#[test]
fn test_malformed_config_names_file() {
    let (_dir, path) = config_file("machines: [1, 2]\n");
    rigger(&path)
        .args(["engine-config", "pi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot parse"));
}
