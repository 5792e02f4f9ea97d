//! Minimal auth-material and cluster-join collaborators.
//!
//! TLS material is expected at the paths in [`AuthOptions`]; generating it
//! is out of scope here.

use anyhow::Result;
use rigger_common::{AuthOptions, SwarmOptions};

use crate::application::ports::{AuthConfigurator, ClusterJoiner, RemoteShell};
use crate::application::services::host::service;
use crate::domain::engine::{ENGINE_OPTIONS_DIR, ENGINE_SERVICE, EngineOptions, ServiceAction};
use crate::domain::shell::quote;

async fn run_checked(shell: &impl RemoteShell, command: &str) -> Result<()> {
    let output = shell.run(command).await?;
    anyhow::ensure!(output.status.success(), "'{command}' failed ({})", output.status);
    Ok(())
}

// ── Auth ─────────────────────────────────────────────────────────────────────

/// Writes the engine options file and restarts the engine with it.
pub struct EngineOptionsAuth;

/// Command writing `content` verbatim to `path` on the remote host.
#[must_use]
pub fn write_file_command(path: &str, content: &str) -> String {
    format!("printf '%s\\n' {} | tee {path}", quote(content))
}

impl AuthConfigurator for EngineOptionsAuth {
    async fn configure_auth(
        &self,
        shell: &impl RemoteShell,
        engine: &EngineOptions,
        options: &AuthOptions,
    ) -> Result<()> {
        tracing::debug!(
            ca = %options.ca_cert_remote_path,
            cert = %options.server_cert_remote_path,
            "configuring engine access"
        );
        run_checked(shell, &format!("mkdir -p {ENGINE_OPTIONS_DIR}")).await?;
        run_checked(
            shell,
            &write_file_command(&engine.engine_options_path, &engine.engine_options),
        )
        .await?;
        service(shell, ENGINE_SERVICE, ServiceAction::Restart).await
    }
}

// ── Cluster join ─────────────────────────────────────────────────────────────

/// Starts swarm containers on the engine. Does nothing unless swarm is enabled.
pub struct SwarmJoiner {
    /// TLS material the manager verifies agents with.
    pub auth: AuthOptions,
}

impl SwarmJoiner {
    #[must_use]
    pub fn new(auth: AuthOptions) -> Self {
        Self { auth }
    }

    /// `docker run` line for the swarm manager.
    #[must_use]
    pub fn manage_command(&self, options: &SwarmOptions) -> String {
        let port = options.host.rsplit(':').next().unwrap_or("3376");
        format!(
            "docker run -d -p {port}:{port} --restart=always --name swarm-agent-master \
             -v {ENGINE_OPTIONS_DIR}:{ENGINE_OPTIONS_DIR} {image} manage \
             --tlsverify --tlscacert={ca} --tlscert={cert} --tlskey={key} \
             -H {host} --strategy {strategy} {discovery}",
            image = options.image,
            ca = self.auth.ca_cert_remote_path,
            cert = self.auth.server_cert_remote_path,
            key = self.auth.server_key_remote_path,
            host = options.host,
            strategy = options.strategy,
            discovery = quote(&options.discovery),
        )
    }
}

/// `docker run` line for the swarm agent advertising `engine_url`.
#[must_use]
pub fn join_command(options: &SwarmOptions, engine_url: &str) -> String {
    let advertise = engine_url.trim_start_matches("tcp://");
    format!(
        "docker run -d --restart=always --name swarm-agent {} join --advertise {advertise} {}",
        options.image,
        quote(&options.discovery)
    )
}

impl ClusterJoiner for SwarmJoiner {
    async fn configure_cluster_join(
        &self,
        shell: &impl RemoteShell,
        options: &SwarmOptions,
        engine_url: &str,
    ) -> Result<()> {
        if !options.is_swarm {
            tracing::debug!("swarm disabled, skipping cluster join");
            return Ok(());
        }
        anyhow::ensure!(
            !options.discovery.is_empty(),
            "swarm is enabled but no discovery URL is set"
        );
        if options.master {
            run_checked(shell, &self.manage_command(options)).await?;
        }
        run_checked(shell, &join_command(options, engine_url)).await
    }
}
