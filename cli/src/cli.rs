//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;
use crate::domain::config::RunConfig;
use crate::infra::config::YamlConfigStore;

/// Turn a freshly booted remote machine into a container engine host
#[derive(Parser)]
#[command(
    name = "rigger",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Pass remote command output through and log every invocation
    /// (also enabled by a non-empty DEBUG)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision a machine: hostname, key, engine, cluster membership
    Provision(commands::provision::ProvisionArgs),

    /// Open a shell on a machine, or run a command on it
    Ssh(commands::ssh::SshArgs),

    /// Print the hostname a machine reports
    Hostname(commands::MachineArgs),

    /// Show a machine's OS identity and whether it is supported
    OsRelease(commands::MachineArgs),

    /// Print the engine options a machine would be configured with
    EngineConfig(commands::engine_config::EngineConfigArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Run-scoped settings: the `--debug` flag on top of environment defaults.
    #[must_use]
    pub fn run_config(&self, defaults: RunConfig) -> RunConfig {
        RunConfig {
            debug: defaults.debug || self.debug,
        }
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the command fails.
    pub async fn run(self, run: RunConfig) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            command,
            ..
        } = self;
        if let Command::Version = command {
            commands::version::run(json);
            return Ok(ExitCode::SUCCESS);
        }

        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            run,
        };
        let app = AppContext::new(&flags, &YamlConfigStore)?;

        match command {
            Command::Provision(args) => commands::provision::run(&args, &app).await?,
            Command::Ssh(args) => return commands::ssh::run(&args, &app).await,
            Command::Hostname(args) => commands::hostname::run(&args, &app).await?,
            Command::OsRelease(args) => commands::os_release::run(&args, &app).await?,
            Command::EngineConfig(args) => commands::engine_config::run(&args, &app)?,
            Command::Version => commands::version::run(json),
        }
        Ok(ExitCode::SUCCESS)
    }
}
