//! Read-only host queries and service control over the remote shell.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use rigger_common::OsRelease;

use crate::application::ports::RemoteShell;
use crate::domain::engine::{ServiceAction, service_command};
use crate::domain::host::{HOSTNAME_QUERY, OS_RELEASE_QUERY};

/// Current hostname, queried live from the machine.
///
/// # Errors
///
/// Returns an error if the query cannot be run or fails.
pub async fn remote_hostname(shell: &impl RemoteShell) -> Result<String> {
    shell.capture(HOSTNAME_QUERY).await
}

/// Detect the machine's OS identity from `/etc/os-release`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or has no `ID`.
pub async fn detect_os_release(shell: &impl RemoteShell) -> Result<OsRelease> {
    let content = shell
        .capture(OS_RELEASE_QUERY)
        .await
        .context("reading /etc/os-release")?;
    OsRelease::parse(&content).context("parsing /etc/os-release")
}

/// Run `service <name> <action>` and require it to succeed.
///
/// # Errors
///
/// Returns an error if the command cannot be run or exits non-zero.
pub async fn service(shell: &impl RemoteShell, name: &str, action: ServiceAction) -> Result<()> {
    let command = service_command(name, action);
    let output = shell.run(&command).await?;
    anyhow::ensure!(output.status.success(), "{command} failed ({})", output.status);
    Ok(())
}
