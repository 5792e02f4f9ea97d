//! Provisioning sequence: a machine reachable over SSH becomes a running,
//! cluster-ready container engine host.
//!
//! `SetHostname → InstallPublicKey → ClearEphemeralPassword → InstallEngine →
//! WaitEngineReady → ConfigureClusterAuth → ConfigureClusterJoin`
//!
//! The sequence is linear and stops at the first fatal error. Nothing is
//! rolled back; a failed run leaves the machine partially provisioned.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;
use rigger_common::{AuthCapability, AuthOptions, DriverError, MachineDriver, OsRelease, SwarmOptions};

use crate::application::ports::{AuthConfigurator, ClusterJoiner, ProgressReporter, RemoteShell};
use crate::application::services::readiness::wait_for;
use crate::domain::config::{
    EngineConfig, PasswordClearPolicy, ReadinessConfig, RiggerConfig,
};
use crate::domain::engine::{
    Criticality, ENGINE_VERSION_PROBE, EngineOptions, generate_engine_options, install_plan,
};
use crate::domain::error::ProvisionError;
use crate::domain::host::{
    COMPATIBLE_OS_IDS, ENSURE_SSH_DIR, authorize_key_command, compatible_with_host,
    set_hostname_command,
};
use crate::domain::provision::{ProvisionReport, Stage, StepOutcome};

/// Run-scoped state of one provisioning attempt.
pub struct ProvisioningSession<'a> {
    pub driver: &'a dyn MachineDriver,
    pub swarm: SwarmOptions,
    pub auth: AuthOptions,
    /// Identity detected on the machine before the run.
    pub os_release: OsRelease,
}

impl ProvisioningSession<'_> {
    /// Reject machines whose OS is outside the supported set.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::IncompatibleHost`] for unsupported OS ids.
    pub fn check_compatible(&self) -> Result<(), ProvisionError> {
        if compatible_with_host(&self.os_release.id) {
            return Ok(());
        }
        Err(ProvisionError::IncompatibleHost {
            os_id: self.os_release.id.clone(),
            supported: COMPATIBLE_OS_IDS.join(", "),
        })
    }

    /// Daemon options the auth collaborator renders onto the machine.
    #[must_use]
    pub fn engine_options(&self, engine: &EngineConfig) -> EngineOptions {
        generate_engine_options(
            &self.driver.driver_name(),
            engine.port,
            &engine.machine_class,
            &self.auth,
        )
    }
}

/// Knobs for the sequence, taken from [`RiggerConfig`].
#[derive(Debug, Clone)]
pub struct ProvisionSettings {
    pub engine: EngineConfig,
    pub readiness: ReadinessConfig,
    pub password_policy: PasswordClearPolicy,
}

impl ProvisionSettings {
    #[must_use]
    pub fn from_config(config: &RiggerConfig) -> Self {
        Self {
            engine: config.engine.clone(),
            readiness: config.readiness,
            password_policy: config.password_policy,
        }
    }
}

/// Provision the session's machine.
///
/// # Errors
///
/// Returns the first fatal error: an incompatible host, a driver metadata
/// error, a missing public key, a failed critical remote step, a readiness
/// timeout, or a collaborator error (the last two kinds unchanged).
pub async fn provision(
    session: &ProvisioningSession<'_>,
    shell: &impl RemoteShell,
    auth: &impl AuthConfigurator,
    cluster: &impl ClusterJoiner,
    reporter: &impl ProgressReporter,
    settings: &ProvisionSettings,
) -> Result<ProvisionReport> {
    session.check_compatible()?;

    let driver = session.driver;
    let machine = driver.machine_name();
    let mut report = ProvisionReport::new(&machine);
    tracing::debug!(machine = %machine, os = %session.os_release.id, "provisioning");

    reporter.step(&format!("setting hostname to {machine}..."));
    set_hostname(shell, &machine, &mut report).await?;

    reporter.step("installing public key...");
    install_public_key(shell, reporter, &driver.ssh_key_path(), &mut report).await?;

    // Every clearing policy waits for the key: until it is authorized the
    // password is the only way in.
    let mut clear_after_next = None;
    match settings.password_policy {
        PasswordClearPolicy::AfterKeyInstall => {
            let outcome = clear_ephemeral_password(driver);
            report.record(Stage::ClearEphemeralPassword, "clear-password", outcome);
        }
        PasswordClearPolicy::AfterFirstUse => clear_after_next = Some(driver),
        PasswordClearPolicy::AfterProvision | PasswordClearPolicy::Never => {
            report.record(
                Stage::ClearEphemeralPassword,
                "clear-password",
                StepOutcome::Skipped {
                    reason: "password clear policy".to_string(),
                },
            );
        }
    }

    reporter.step("installing container engine...");
    install_engine(shell, reporter, &settings.engine, clear_after_next, &mut report).await?;

    reporter.step("waiting for container engine...");
    wait_for(&settings.readiness, || engine_responding(shell))
        .await
        .map_err(ProvisionError::EngineNotReady)?;
    report.record(Stage::WaitEngineReady, "engine-ready", StepOutcome::Succeeded);

    reporter.step("configuring engine access...");
    let engine = session.engine_options(&settings.engine);
    auth.configure_auth(shell, &engine, &session.auth).await?;
    report.record(Stage::ConfigureClusterAuth, "configure-auth", StepOutcome::Succeeded);

    reporter.step("configuring cluster membership...");
    let engine_url = format!("tcp://{}:{}", driver.ssh_hostname()?, settings.engine.port);
    cluster
        .configure_cluster_join(shell, &session.swarm, &engine_url)
        .await?;
    report.record(Stage::ConfigureClusterJoin, "configure-cluster", StepOutcome::Succeeded);

    if settings.password_policy == PasswordClearPolicy::AfterProvision {
        let outcome = clear_ephemeral_password(driver);
        report.record(Stage::ClearEphemeralPassword, "clear-password", outcome);
    }

    reporter.success(&format!("{machine} provisioned"));
    Ok(report.finish())
}

// ── Stages ───────────────────────────────────────────────────────────────────

async fn set_hostname(
    shell: &impl RemoteShell,
    hostname: &str,
    report: &mut ProvisionReport,
) -> Result<()> {
    run_critical(
        shell,
        report,
        Stage::SetHostname,
        "set-hostname",
        &set_hostname_command(hostname),
    )
    .await
}

async fn install_public_key(
    shell: &impl RemoteShell,
    reporter: &impl ProgressReporter,
    key_path: &Path,
    report: &mut ProvisionReport,
) -> Result<()> {
    let mkdir = shell.run(ENSURE_SSH_DIR).await;
    ignore_outcome(report, reporter, Stage::InstallPublicKey, "ensure-ssh-dir", mkdir)?;

    let path = public_key_path(key_path);
    let public_key = std::fs::read_to_string(&path)
        .map_err(|source| ProvisionError::PublicKey { path, source })?;

    run_critical(
        shell,
        report,
        Stage::InstallPublicKey,
        "authorize-key",
        &authorize_key_command(&public_key),
    )
    .await
}

/// Drop the bootstrap password so every later command authenticates with the key.
fn clear_ephemeral_password(driver: &dyn MachineDriver) -> StepOutcome {
    match driver.auth_capability() {
        AuthCapability::Password(password) => {
            password.clear();
            tracing::debug!("bootstrap password cleared");
            StepOutcome::Succeeded
        }
        AuthCapability::NoPassword => StepOutcome::Skipped {
            reason: "driver has no password".to_string(),
        },
    }
}

/// Runs the install plan. With `clear_after_first` set, the password goes
/// once the first step has used it.
async fn install_engine(
    shell: &impl RemoteShell,
    reporter: &impl ProgressReporter,
    engine: &EngineConfig,
    mut clear_after_first: Option<&dyn MachineDriver>,
    report: &mut ProvisionReport,
) -> Result<()> {
    for step in install_plan(engine) {
        match step.criticality {
            Criticality::Critical => {
                run_critical(shell, report, Stage::InstallEngine, step.name, &step.command).await?;
            }
            Criticality::BestEffort => {
                let result = shell.run(&step.command).await;
                ignore_outcome(report, reporter, Stage::InstallEngine, step.name, result)?;
            }
        }
        if let Some(driver) = clear_after_first.take() {
            let outcome = clear_ephemeral_password(driver);
            report.record(Stage::ClearEphemeralPassword, "clear-password", outcome);
        }
    }
    Ok(())
}

async fn engine_responding(shell: &impl RemoteShell) -> bool {
    match shell.run(ENGINE_VERSION_PROBE).await {
        Ok(output) => output.status.success(),
        Err(err) => {
            tracing::debug!(error = %format!("{err:#}"), "engine probe could not run");
            false
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

async fn run_critical(
    shell: &impl RemoteShell,
    report: &mut ProvisionReport,
    stage: Stage,
    step: &'static str,
    command: &str,
) -> Result<()> {
    let output = shell.run(command).await?;
    if !output.status.success() {
        return Err(ProvisionError::RemoteStep {
            step,
            status: output.status.to_string(),
        }
        .into());
    }
    report.record(stage, step, StepOutcome::Succeeded);
    Ok(())
}

/// The one place best-effort failures are discarded. The outcome lands in
/// the report and is surfaced as a warning; driver metadata errors stay fatal.
fn ignore_outcome(
    report: &mut ProvisionReport,
    reporter: &impl ProgressReporter,
    stage: Stage,
    step: &'static str,
    result: Result<Output>,
) -> Result<()> {
    let reason = match result {
        Ok(output) if output.status.success() => {
            report.record(stage, step, StepOutcome::Succeeded);
            return Ok(());
        }
        Ok(output) => output.status.to_string(),
        Err(err) if err.downcast_ref::<DriverError>().is_some() => return Err(err),
        Err(err) => format!("{err:#}"),
    };
    tracing::debug!(step, reason = %reason, "ignoring best-effort step failure");
    reporter.warn(&format!("{step} failed and was ignored ({reason})"));
    report.record(stage, step, StepOutcome::Ignored { reason });
    Ok(())
}

fn public_key_path(key_path: &Path) -> PathBuf {
    let mut path = OsString::from(key_path.as_os_str());
    path.push(".pub");
    PathBuf::from(path)
}
