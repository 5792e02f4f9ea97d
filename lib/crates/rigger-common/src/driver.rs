//! Machine driver boundary.
//!
//! A driver owns one remote machine and reports how to reach it. Drivers that
//! bootstrap machines with a throwaway password expose it through
//! [`AuthCapability::Password`]; the variant is fixed when the driver is built,
//! so callers never probe for the capability at runtime.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a driver reports while looking up connection metadata.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriverError {
    #[error("machine '{0}' has no address")]
    NoAddress(String),

    #[error("machine '{0}' has no SSH port")]
    NoPort(String),
}

/// Driver families known to rigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// Pre-existing host reachable with a key only.
    #[default]
    Generic,
    /// Board-class host shipped with a bootstrap password.
    Aiyara,
}

impl DriverKind {
    /// Name reported to the engine as the `provider` label.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Aiyara => "aiyara",
        }
    }

    /// Whether machines of this kind carry an ephemeral password capability.
    #[must_use]
    pub fn supports_password(self) -> bool {
        matches!(self, Self::Aiyara)
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Plaintext bootstrap password that can be cleared exactly once and never restored.
///
/// An empty value means "cleared or never set".
pub struct EphemeralPassword {
    secret: Mutex<String>,
}

impl EphemeralPassword {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Mutex::new(secret.into()),
        }
    }

    /// Current value, or the empty string once cleared.
    #[must_use]
    pub fn get(&self) -> String {
        self.secret
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.secret
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Irrevocably drop the secret. Idempotent.
    pub fn clear(&self) {
        let mut guard = self.secret.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = String::new();
    }
}

impl fmt::Debug for EphemeralPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_cleared() { "cleared" } else { "set" };
        f.debug_struct("EphemeralPassword")
            .field("secret", &state)
            .finish()
    }
}

/// Authentication capabilities a driver advertises.
#[derive(Debug, Clone, Copy)]
pub enum AuthCapability<'a> {
    /// Key-based authentication only.
    NoPassword,
    /// A bootstrap password is available until cleared.
    Password(&'a EphemeralPassword),
}

/// Connection metadata and identity of one remote machine.
pub trait MachineDriver {
    /// Address the SSH client should connect to.
    fn ssh_hostname(&self) -> Result<String, DriverError>;
    fn ssh_port(&self) -> Result<u16, DriverError>;
    fn ssh_username(&self) -> String;
    /// Private key; the public half lives next to it with a `.pub` suffix.
    fn ssh_key_path(&self) -> PathBuf;
    fn machine_name(&self) -> String;
    fn driver_name(&self) -> String;
    fn auth_capability(&self) -> AuthCapability<'_>;
}
