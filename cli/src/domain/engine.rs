//! Container engine installation plan and daemon options.
//!
//! Pure functions only: everything here produces command strings or
//! descriptors; running them is the sequencer's job.

use std::fmt;

use rigger_common::AuthOptions;
use serde::Serialize;

use crate::domain::config::EngineConfig;
use crate::domain::shell::quote;

/// Init-system service name of the engine.
pub const ENGINE_SERVICE: &str = "docker";
/// Directory holding engine TLS material and settings.
pub const ENGINE_OPTIONS_DIR: &str = "/etc/docker";
/// File the init script sources `DOCKER_OPTS` from.
pub const ENGINE_OPTIONS_PATH: &str = "/etc/default/docker";
/// Cheap probe: succeeds once the daemon answers.
pub const ENGINE_VERSION_PROBE: &str = "docker version";

const ENGINE_ARCHIVE: &str = "docker.tar.xz";

/// Init-system service actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        })
    }
}

#[must_use]
pub fn service_command(name: &str, action: ServiceAction) -> String {
    format!("service {name} {action}")
}

/// Whether a failing step aborts provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criticality {
    Critical,
    BestEffort,
}

/// One remote command of the engine installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallStep {
    pub name: &'static str,
    pub command: String,
    pub criticality: Criticality,
}

/// The six engine installation commands, in execution order.
#[must_use]
pub fn install_plan(cfg: &EngineConfig) -> Vec<InstallStep> {
    let dir = &cfg.install_dir;
    let binary = format!("{dir}/docker");
    vec![
        InstallStep {
            name: "stop-engine",
            command: service_command(ENGINE_SERVICE, ServiceAction::Stop),
            criticality: Criticality::BestEffort,
        },
        InstallStep {
            name: "unlink-previous",
            command: format!(
                "unlink {} || mkdir -p {} || unlink {}",
                cfg.binary_link, dir, binary
            ),
            criticality: Criticality::BestEffort,
        },
        InstallStep {
            name: "download-engine",
            command: format!(
                "wget --no-check-certificate -q -O{dir}/{ENGINE_ARCHIVE} {} && (cd {dir} && tar -xf {ENGINE_ARCHIVE})",
                quote(&cfg.archive_url)
            ),
            criticality: Criticality::Critical,
        },
        InstallStep {
            name: "link-engine",
            command: format!("chmod +x {binary} && ln -s {binary} {}", cfg.binary_link),
            criticality: Criticality::Critical,
        },
        InstallStep {
            name: "install-init-script",
            command: format!(
                "wget --no-check-certificate -q -O{path} {} && chmod +x {path}",
                quote(&cfg.init_script_url),
                path = cfg.init_script_path
            ),
            criticality: Criticality::Critical,
        },
        InstallStep {
            name: "start-engine",
            command: service_command(ENGINE_SERVICE, ServiceAction::Start),
            criticality: Criticality::BestEffort,
        },
    ]
}

/// Rendered daemon configuration and where it must be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineOptions {
    /// Single `export DOCKER_OPTS="..."` line.
    pub engine_options: String,
    pub engine_options_path: String,
}

/// TLS and provider options every engine gets.
#[must_use]
pub fn default_daemon_opts(driver_name: &str, auth: &AuthOptions) -> String {
    format!(
        "--tlsverify --tlscacert={} --tlskey={} --tlscert={} --label=provider={driver_name}",
        auth.ca_cert_remote_path, auth.server_key_remote_path, auth.server_cert_remote_path,
    )
}

/// Daemon options for a machine: defaults, socket and TCP binds, then the
/// machine-class label.
#[must_use]
pub fn generate_engine_options(
    driver_name: &str,
    engine_port: u16,
    machine_class: &str,
    auth: &AuthOptions,
) -> EngineOptions {
    let defaults = default_daemon_opts(driver_name, auth);
    let binds = format!("--host=unix:///var/run/docker.sock --host=tcp://0.0.0.0:{engine_port}");
    let class = format!("--label=architecture={machine_class}");
    EngineOptions {
        engine_options: format!("export DOCKER_OPTS=\"{defaults} {binds} {class}\""),
        engine_options_path: ENGINE_OPTIONS_PATH.to_string(),
    }
}
