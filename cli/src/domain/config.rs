//! Domain types and validators for rigger configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access. The one
//! exception is [`RunConfig::from_env`], which is only called from `main`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use regex::Regex;
use rigger_common::{AuthOptions, DriverKind, SwarmOptions};
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

/// Machine names double as remote hostnames.
pub static MACHINE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern: cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9.-]*$").expect("valid regex")
});

// ── Run-scoped settings ──────────────────────────────────────────────────────

/// Settings that live for one process run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Pass remote standard output through to ours.
    pub debug: bool,
}

impl RunConfig {
    /// Read defaults from the process environment. `DEBUG` set to any
    /// non-empty value enables debug passthrough.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            debug: std::env::var("DEBUG").is_ok_and(|v| !v.is_empty()),
        }
    }
}

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.rigger/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RiggerConfig {
    pub machines: BTreeMap<String, MachineSpec>,
    pub engine: EngineConfig,
    pub readiness: ReadinessConfig,
    pub password_policy: PasswordClearPolicy,
    pub auth: AuthOptions,
    pub swarm: SwarmOptions,
}

impl RiggerConfig {
    /// Look up a machine definition by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or not defined.
    pub fn machine(&self, name: &str) -> Result<&MachineSpec> {
        validate_machine_name(name)?;
        self.machines.get(name).ok_or_else(|| {
            let known = if self.machines.is_empty() {
                "(none)".to_string()
            } else {
                self.machines.keys().cloned().collect::<Vec<_>>().join(", ")
            };
            ConfigError::UnknownMachine {
                name: name.to_string(),
                known,
            }
            .into()
        })
    }
}

/// How to reach one machine. Passwords are deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MachineSpec {
    #[serde(default)]
    pub driver: DriverKind,
    pub host: String,
    #[serde(default = "default_ssh_port")]
    pub port: u16,
    #[serde(default = "default_ssh_user")]
    pub user: String,
    /// Private key; defaults to `~/.rigger/machines/<name>/id_rsa`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<PathBuf>,
}

fn default_ssh_port() -> u16 {
    22
}

fn default_ssh_user() -> String {
    "root".to_string()
}

/// Where the engine comes from and how it is exposed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// TCP port the daemon listens on.
    pub port: u16,
    pub install_dir: String,
    pub binary_link: String,
    pub archive_url: String,
    pub init_script_url: String,
    pub init_script_path: String,
    /// Value of the `architecture` label.
    pub machine_class: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            port: 2376,
            install_dir: "/opt/docker".to_string(),
            binary_link: "/usr/bin/docker".to_string(),
            archive_url: "https://dl.dropboxusercontent.com/u/9350284/docker.tar.xz".to_string(),
            init_script_url: "https://dl.dropboxusercontent.com/u/9350284/initd-docker.txt"
                .to_string(),
            init_script_path: "/etc/init.d/docker".to_string(),
            machine_class: "arm".to_string(),
        }
    }
}

/// Retry budget for the engine readiness wait.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReadinessConfig {
    pub max_attempts: u32,
    pub interval_secs: u64,
}

impl ReadinessConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval_secs: 3,
        }
    }
}

/// When the bootstrap password is discarded.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PasswordClearPolicy {
    /// Right after the first command that authenticated with it. During
    /// provisioning, the first command after the public key is installed.
    AfterFirstUse,
    /// Once the public key is installed, before the engine is installed.
    #[default]
    AfterKeyInstall,
    /// After the whole sequence succeeded.
    AfterProvision,
    /// Keep it for the lifetime of the driver handle.
    Never,
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a machine name.
///
/// # Errors
///
/// Returns an error if the name is not a usable hostname.
pub fn validate_machine_name(name: &str) -> Result<()> {
    if !MACHINE_NAME_RE.is_match(name) {
        return Err(ConfigError::InvalidMachineName(name.to_string()).into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
