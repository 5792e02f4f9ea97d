//! Credential resolution: password or key authentication, decided per command.
//!
//! Nothing is cached between calls, so a password cleared mid-run takes
//! effect on the very next command.

use anyhow::Result;
use rigger_common::{AuthCapability, MachineDriver};

use crate::domain::ssh::{AuthDescriptor, RemoteInvocation, SshCommandBuilder};

/// Decide which credential the next command authenticates with.
///
/// A password capability holding the empty string means the password was
/// cleared (or never set) and falls back to the key.
#[must_use]
pub fn resolve_auth(driver: &dyn MachineDriver) -> AuthDescriptor {
    match driver.auth_capability() {
        AuthCapability::Password(password) => {
            let secret = password.get();
            if secret.is_empty() {
                key_auth(driver)
            } else {
                AuthDescriptor::Password { secret }
            }
        }
        AuthCapability::NoPassword => key_auth(driver),
    }
}

/// Build the invocation running `command` on the driver's machine.
///
/// # Errors
///
/// Returns the driver's own error, unchanged, if the address or port cannot
/// be determined.
pub fn resolve_invocation(
    driver: &dyn MachineDriver,
    builder: &SshCommandBuilder,
    command: &[String],
) -> Result<RemoteInvocation> {
    let host = driver.ssh_hostname()?;
    let port = driver.ssh_port()?;
    let user = driver.ssh_username();
    let auth = resolve_auth(driver);
    Ok(builder.build(&host, port, &user, &auth, command))
}

fn key_auth(driver: &dyn MachineDriver) -> AuthDescriptor {
    AuthDescriptor::Key {
        key_path: driver.ssh_key_path(),
    }
}
