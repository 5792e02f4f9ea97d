//! `RemoteShell` over SSH, resolving the machine's credentials per command.

use std::process::Output;

use anyhow::{Context, Result};
use rigger_common::{AuthCapability, MachineDriver};

use crate::application::ports::{CommandRunner, RemoteShell};
use crate::application::services::credentials::resolve_invocation;
use crate::domain::config::PasswordClearPolicy;
use crate::domain::ssh::{AuthMode, RemoteInvocation, SshCommandBuilder};

/// Runs remote commands on one machine through a [`CommandRunner`].
pub struct DriverShell<'a, R: CommandRunner> {
    driver: &'a dyn MachineDriver,
    runner: &'a R,
    builder: SshCommandBuilder,
    policy: PasswordClearPolicy,
}

impl<'a, R: CommandRunner> DriverShell<'a, R> {
    pub fn new(
        driver: &'a dyn MachineDriver,
        runner: &'a R,
        builder: SshCommandBuilder,
        policy: PasswordClearPolicy,
    ) -> Self {
        Self {
            driver,
            runner,
            builder,
            policy,
        }
    }

    /// Invocation for `command`, or an interactive shell when empty.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if its address or port is unknown.
    pub fn invocation(&self, command: &[String]) -> Result<RemoteInvocation> {
        resolve_invocation(self.driver, &self.builder, command)
    }

    /// Open an interactive session, or run `command` attached to the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the invocation cannot be built or spawned.
    pub async fn interactive(&self, command: &[String]) -> Result<std::process::ExitStatus> {
        let invocation = self.invocation(command)?;
        tracing::debug!(command = %invocation.redacted(), "interactive session");
        let status = self.runner.run_interactive(&invocation).await?;
        self.after_run(&invocation);
        Ok(status)
    }

    async fn execute(&self, invocation: RemoteInvocation) -> Result<Output> {
        tracing::debug!(command = %invocation.redacted(), "remote command");
        let output = self.runner.run(&invocation).await?;
        tracing::trace!(status = %output.status, "remote command finished");
        self.after_run(&invocation);
        Ok(output)
    }

    fn after_run(&self, invocation: &RemoteInvocation) {
        if self.policy != PasswordClearPolicy::AfterFirstUse
            || invocation.mode() != AuthMode::Password
        {
            return;
        }
        if let AuthCapability::Password(password) = self.driver.auth_capability() {
            password.clear();
            tracing::debug!("bootstrap password cleared after first use");
        }
    }
}

impl<R: CommandRunner> RemoteShell for DriverShell<'_, R> {
    async fn run(&self, command: &str) -> Result<Output> {
        let invocation = self.invocation(&[command.to_string()])?;
        self.execute(invocation).await
    }

    async fn capture(&self, command: &str) -> Result<String> {
        let invocation = self.invocation(&[command.to_string()])?.capturing();
        let output = self
            .execute(invocation)
            .await
            .with_context(|| format!("running '{command}'"))?;
        anyhow::ensure!(
            output.status.success(),
            "'{command}' failed on {} ({})",
            self.driver.machine_name(),
            output.status
        );
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
