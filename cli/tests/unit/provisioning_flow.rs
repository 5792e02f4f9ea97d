//! End-to-end provisioning through the public API with a recording runner.
//!
//! Exercises `StaticDriver` → `DriverShell` → `provision()` with the real
//! collaborators; only process execution is mocked.

use std::path::Path;

use rigger_cli::application::services::provision::{
    ProvisionSettings, ProvisioningSession, provision,
};
use rigger_cli::domain::config::{
    EngineConfig, MachineSpec, PasswordClearPolicy, ReadinessConfig, RunConfig,
};
use rigger_cli::domain::error::{ProvisionError, ReadinessError};
use rigger_cli::domain::ssh::{AuthMode, SshCommandBuilder};
use rigger_cli::domain::StepOutcome;
use rigger_cli::infra::collaborators::{EngineOptionsAuth, SwarmJoiner};
use rigger_cli::infra::driver::StaticDriver;
use rigger_cli::infra::remote::DriverShell;
use rigger_common::{AuthOptions, DriverKind, OsRelease, SwarmOptions};

use crate::helpers::{CollectingReporter, MockCommandRunner};

const PUBKEY: &str = "ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAABAQC7 op@laptop";

fn write_key(dir: &Path) -> std::path::PathBuf {
    let key = dir.join("id_rsa");
    std::fs::write(dir.join("id_rsa.pub"), format!("{PUBKEY}\n")).expect("write pubkey");
    key
}

fn spec(kind: DriverKind, key: &Path) -> MachineSpec {
    MachineSpec {
        driver: kind,
        host: "192.168.1.40".to_string(),
        port: 22,
        user: "root".to_string(),
        key_path: Some(key.to_path_buf()),
    }
}

fn settings(policy: PasswordClearPolicy) -> ProvisionSettings {
    ProvisionSettings {
        engine: EngineConfig::default(),
        readiness: ReadinessConfig {
            max_attempts: 2,
            interval_secs: 0,
        },
        password_policy: policy,
    }
}

fn session(driver: &StaticDriver) -> ProvisioningSession<'_> {
    ProvisioningSession {
        driver,
        swarm: SwarmOptions::default(),
        auth: AuthOptions::default(),
        os_release: OsRelease::parse("ID=aiyara\nNAME=\"Aiyara\"\n").expect("os-release"),
    }
}

async fn run_provision(
    driver: &StaticDriver,
    runner: &MockCommandRunner,
    policy: PasswordClearPolicy,
) -> anyhow::Result<rigger_cli::domain::ProvisionReport> {
    // Wired like `rigger provision`: the sequence owns the password clear.
    let shell = DriverShell::new(
        driver,
        runner,
        SshCommandBuilder::new(RunConfig::default()),
        PasswordClearPolicy::Never,
    );
    provision(
        &session(driver),
        &shell,
        &EngineOptionsAuth,
        &SwarmJoiner::new(AuthOptions::default()),
        &CollectingReporter::default(),
        &settings(policy),
    )
    .await
}

// ── Scenario A: key-only machine ─────────────────────────────────────────────

#[tokio::test]
async fn key_only_machine_uses_identity_file_throughout() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let key = write_key(dir.path());
    let driver = StaticDriver::from_spec("node1", &spec(DriverKind::Generic, &key), None)
        .expect("driver");
    let runner = MockCommandRunner::new_ok();

    run_provision(&driver, &runner, PasswordClearPolicy::AfterKeyInstall)
        .await
        .expect("provision");

    let calls = runner.recorded_calls();
    assert!(calls.iter().all(|c| c.program == "ssh" && c.mode == AuthMode::Key));
    let first = &calls[0].args;
    let dest = first.iter().position(|a| a == "root@192.168.1.40").expect("destination");
    assert_eq!(&first[dest - 4..dest], ["-p", "22", "-i", key.to_str().expect("utf8")]);
    assert!(first.windows(2).any(|w| w == ["-o", "StrictHostKeyChecking=no"]));
}

// ── Scenario B: bootstrap password, then key ─────────────────────────────────

#[tokio::test]
async fn password_machine_switches_to_key_after_key_install() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let key = write_key(dir.path());
    let driver = StaticDriver::from_spec(
        "node1",
        &spec(DriverKind::Aiyara, &key),
        Some("s3cret".to_string()),
    )
    .expect("driver");
    let runner = MockCommandRunner::new_ok();

    run_provision(&driver, &runner, PasswordClearPolicy::AfterKeyInstall)
        .await
        .expect("provision");

    let calls = runner.recorded_calls();
    assert_eq!(calls[0].program, "sshpass");
    assert_eq!(calls[0].args[0], "-ps3cret");
    assert_eq!(calls[0].args[1], "ssh");
    assert!(calls[0].remote().starts_with("hostname 'node1' && "));
    assert!(calls[2].remote().contains("authorized_keys"));
    assert_eq!(calls[2].mode, AuthMode::Password);
    assert!(calls[3..].iter().all(|c| c.program == "ssh" && c.mode == AuthMode::Key));
}

#[tokio::test]
async fn key_is_authorized_with_the_password_under_every_clearing_policy() {
    for policy in [
        PasswordClearPolicy::AfterKeyInstall,
        PasswordClearPolicy::AfterFirstUse,
        PasswordClearPolicy::AfterProvision,
    ] {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let key = write_key(dir.path());
        let driver = StaticDriver::from_spec(
            "node1",
            &spec(DriverKind::Aiyara, &key),
            Some("s3cret".to_string()),
        )
        .expect("driver");
        let runner = MockCommandRunner::new_ok();

        run_provision(&driver, &runner, policy).await.expect("provision");

        let calls = runner.recorded_calls();
        let authorize = calls
            .iter()
            .find(|c| c.remote().contains("authorized_keys"))
            .expect("authorize-key");
        assert_eq!(authorize.mode, AuthMode::Password, "{policy:?}");
        assert_eq!(calls[1].mode, AuthMode::Password, "mkdir under {policy:?}");
        assert_eq!(calls.last().map(|c| c.mode), Some(match policy {
            PasswordClearPolicy::AfterProvision => AuthMode::Password,
            _ => AuthMode::Key,
        }));
    }
}

#[tokio::test]
async fn first_use_policy_switches_after_first_install_command() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let key = write_key(dir.path());
    let driver = StaticDriver::from_spec(
        "node1",
        &spec(DriverKind::Aiyara, &key),
        Some("s3cret".to_string()),
    )
    .expect("driver");
    let runner = MockCommandRunner::new_ok();

    run_provision(&driver, &runner, PasswordClearPolicy::AfterFirstUse)
        .await
        .expect("provision");

    let calls = runner.recorded_calls();
    assert_eq!(calls[3].remote(), "service docker stop");
    assert!(calls[..4].iter().all(|c| c.mode == AuthMode::Password));
    assert!(calls[4..].iter().all(|c| c.mode == AuthMode::Key));
}

// ── Scenario C: engine install ───────────────────────────────────────────────

#[tokio::test]
async fn engine_install_runs_six_commands_then_probes() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let key = write_key(dir.path());
    let driver = StaticDriver::from_spec("node1", &spec(DriverKind::Aiyara, &key), None)
        .expect("driver");
    let runner = MockCommandRunner::failing("service docker stop");

    let report = run_provision(&driver, &runner, PasswordClearPolicy::AfterKeyInstall)
        .await
        .expect("a failing stop is tolerated");

    let cmds = runner.remote_commands();
    assert_eq!(cmds[3], "service docker stop");
    assert!(cmds[4].starts_with("unlink /usr/bin/docker || mkdir -p /opt/docker"));
    assert!(cmds[5].contains("-O/opt/docker/docker.tar.xz"));
    assert!(cmds[6].contains("ln -s /opt/docker/docker /usr/bin/docker"));
    assert!(cmds[7].contains("-O/etc/init.d/docker"));
    assert_eq!(cmds[8], "service docker start");
    assert_eq!(cmds[9], "docker version");
    assert_eq!(cmds[10], "mkdir -p /etc/docker");
    assert!(cmds[11].contains("--label=provider=aiyara"));
    assert_eq!(cmds[12], "service docker restart");
    assert_eq!(cmds.len(), 13);
    assert!(matches!(
        report.outcome_of("stop-engine"),
        Some(StepOutcome::Ignored { .. })
    ));
}

#[tokio::test]
async fn critical_install_failure_stops_the_run() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let key = write_key(dir.path());
    let driver = StaticDriver::from_spec("node1", &spec(DriverKind::Generic, &key), None)
        .expect("driver");
    let runner = MockCommandRunner::failing("ln -s");

    let err = run_provision(&driver, &runner, PasswordClearPolicy::AfterKeyInstall)
        .await
        .expect_err("link failure is fatal");

    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::RemoteStep { step: "link-engine", .. })
    ));
    let cmds = runner.remote_commands();
    assert!(cmds.last().expect("commands").contains("ln -s"));
    assert!(!cmds.iter().any(|c| c.contains("init.d")));
}

#[tokio::test]
async fn engine_that_never_answers_times_out() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let key = write_key(dir.path());
    let driver = StaticDriver::from_spec("node1", &spec(DriverKind::Generic, &key), None)
        .expect("driver");
    let runner = MockCommandRunner::failing("docker version");

    let err = run_provision(&driver, &runner, PasswordClearPolicy::AfterKeyInstall)
        .await
        .expect_err("readiness fails");

    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::EngineNotReady(ReadinessError::TimedOut { attempts: 2 }))
    ));
    let probes = runner
        .remote_commands()
        .iter()
        .filter(|c| *c == "docker version")
        .count();
    assert_eq!(probes, 2);
}
