//! Command implementations

pub mod engine_config;
pub mod hostname;
pub mod os_release;
pub mod provision;
pub mod ssh;
pub mod version;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;

/// Environment variable read for the bootstrap password by default.
pub const DEFAULT_PASSWORD_ENV: &str = "RIGGER_SSH_PASSWORD";

/// Where a machine's bootstrap password comes from.
#[derive(Args, Debug, Clone)]
pub struct PasswordArgs {
    /// Prompt for the machine's bootstrap password
    #[arg(long)]
    pub ask_password: bool,

    /// Environment variable holding the bootstrap password
    #[arg(long, value_name = "VAR", default_value = DEFAULT_PASSWORD_ENV)]
    pub password_env: String,
}

impl PasswordArgs {
    /// The bootstrap password, if one was supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if the interactive prompt fails.
    pub fn resolve(&self, app: &AppContext, machine: &str) -> Result<Option<String>> {
        if self.ask_password {
            return app
                .prompt_password(&format!("Bootstrap password for {machine}"))
                .map(Some);
        }
        Ok(std::env::var(&self.password_env)
            .ok()
            .filter(|value| !value.is_empty()))
    }
}

/// A configured machine plus its optional bootstrap password.
#[derive(Args, Debug, Clone)]
pub struct MachineArgs {
    /// Machine name as defined in the config file
    pub machine: String,

    #[command(flatten)]
    pub password: PasswordArgs,
}
