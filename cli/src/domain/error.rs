//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Fatal conditions raised by the provisioning sequence itself.
///
/// Driver metadata and collaborator failures are not wrapped here; they
/// propagate unchanged.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Host OS '{os_id}' is not supported. Supported: {supported}")]
    IncompatibleHost { os_id: String, supported: String },

    #[error("Cannot read public key {}: {source}", path.display())]
    PublicKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Remote step '{step}' failed ({status})")]
    RemoteStep { step: &'static str, status: String },

    #[error("Container engine did not become ready: {0}")]
    EngineNotReady(#[source] ReadinessError),
}

// ── Readiness errors ──────────────────────────────────────────────────────────

/// Outcomes of an unsuccessful readiness wait.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadinessError {
    #[error("timed out after {attempts} attempts")]
    TimedOut { attempts: u32 },

    #[error("wait cancelled")]
    Cancelled,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to machine definitions and settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Machine '{name}' is not defined.\n\nDefined machines: {known}")]
    UnknownMachine { name: String, known: String },

    #[error("Invalid machine name '{0}': must match ^[a-zA-Z0-9][a-zA-Z0-9.-]*$")]
    InvalidMachineName(String),

    #[error("Machine '{0}' has no host address")]
    MissingHost(String),
}
