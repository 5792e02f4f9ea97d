//! Host identity commands and the OS compatibility guard.

use crate::domain::shell::quote;

/// OS identities this provisioning strategy accepts.
pub const COMPATIBLE_OS_IDS: &[&str] = &["ubuntu", "debian", "aiyara"];

/// Remote command printing the live hostname.
pub const HOSTNAME_QUERY: &str = "hostname";

/// Remote command printing the OS identity file.
pub const OS_RELEASE_QUERY: &str = "cat /etc/os-release";

/// Best-effort creation of the remote SSH configuration directory.
pub const ENSURE_SSH_DIR: &str = "mkdir -p ~/.ssh";

/// Whether a machine reporting `os_id` can be provisioned.
#[must_use]
pub fn compatible_with_host(os_id: &str) -> bool {
    COMPATIBLE_OS_IDS.contains(&os_id)
}

/// One compound command that sets the live hostname, persists it, and adds a
/// loopback alias for it, in that order.
#[must_use]
pub fn set_hostname_command(hostname: &str) -> String {
    let name = quote(hostname);
    let alias = quote(&format!("127.0.0.1 {hostname}"));
    format!(
        "hostname {name} && echo {name} | tee /etc/hostname && echo {alias} | tee -a /etc/hosts"
    )
}

/// Append `public_key` to the remote authorized keys.
#[must_use]
pub fn authorize_key_command(public_key: &str) -> String {
    format!(
        "echo {} | tee -a ~/.ssh/authorized_keys",
        quote(public_key.trim())
    )
}
