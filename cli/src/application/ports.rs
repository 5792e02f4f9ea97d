//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `rigger_common`, never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::{ExitStatus, Output};

use anyhow::Result;
use rigger_common::{AuthOptions, SwarmOptions};

use crate::domain::RiggerConfig;
use crate::domain::engine::EngineOptions;
use crate::domain::ssh::RemoteInvocation;

// ── Process execution ─────────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run an invocation to completion.
    ///
    /// Standard output is captured or passed through per the invocation's
    /// wiring; standard error always goes to ours. A non-zero exit is not an
    /// error here; only failing to spawn or wait is.
    async fn run(&self, invocation: &RemoteInvocation) -> Result<Output>;

    /// Run an invocation with all standard streams inherited (interactive).
    async fn run_interactive(&self, invocation: &RemoteInvocation) -> Result<ExitStatus>;
}

// ── Remote shell ──────────────────────────────────────────────────────────────

/// Single entry point for running commands on the machine being provisioned.
///
/// Every call resolves credentials anew.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    /// Run one remote command line and return its raw output.
    async fn run(&self, command: &str) -> Result<Output>;

    /// Run one remote command line and return its standard output.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be run or exits non-zero.
    async fn capture(&self, command: &str) -> Result<String>;
}

// ── Collaborators ─────────────────────────────────────────────────────────────

/// Configures authenticated engine access (TLS material, daemon options).
#[allow(async_fn_in_trait)]
pub trait AuthConfigurator {
    async fn configure_auth(
        &self,
        shell: &impl RemoteShell,
        engine: &EngineOptions,
        options: &AuthOptions,
    ) -> Result<()>;
}

/// Configures cluster membership once the engine is up.
#[allow(async_fn_in_trait)]
pub trait ClusterJoiner {
    /// `engine_url` is the `tcp://host:port` address the engine listens on.
    async fn configure_cluster_join(
        &self,
        shell: &impl RemoteShell,
        options: &SwarmOptions,
        engine_url: &str,
    ) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading the rigger configuration.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when absent.
    fn load(&self) -> Result<RiggerConfig>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
