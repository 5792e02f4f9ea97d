//! `rigger ssh`: open a shell on a machine, or run one command on it.

use std::process::{ExitCode, ExitStatus};

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::commands::PasswordArgs;

/// Arguments for the ssh command.
#[derive(Args)]
#[command(trailing_var_arg = true)]
pub struct SshArgs {
    /// Machine name as defined in the config file
    pub machine: String,

    #[command(flatten)]
    pub password: PasswordArgs,

    /// Command to run instead of an interactive shell
    #[arg(allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Run `rigger ssh`, returning the remote exit status.
///
/// # Errors
///
/// Returns an error if the machine is unknown or ssh cannot be spawned.
pub async fn run(args: &SshArgs, app: &AppContext) -> Result<ExitCode> {
    let password = args.password.resolve(app, &args.machine)?;
    let driver = app.driver(&args.machine, password)?;
    let shell = app.shell(&driver, app.config.password_policy);

    let status = shell
        .interactive(&args.command)
        .await
        .with_context(|| format!("failed to open a session on {}", args.machine))?;

    Ok(ExitCode::from(exit_code(status)))
}

/// Shell convention: the remote code, or 128 + signal number when killed.
fn exit_code(status: ExitStatus) -> u8 {
    #[cfg(unix)]
    if let Some(signal) = std::os::unix::process::ExitStatusExt::signal(&status) {
        return u8::try_from(128 + signal).unwrap_or(u8::MAX);
    }
    status
        .code()
        .map_or(1, |code| u8::try_from(code & 0xff).unwrap_or(1))
}
