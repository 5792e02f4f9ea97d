//! Application context: unified state passed to every command handler.

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::{PasswordClearPolicy, RiggerConfig, RunConfig};
use crate::domain::ssh::SshCommandBuilder;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::driver::StaticDriver;
use crate::infra::remote::DriverShell;
use crate::output::{OutputContext, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Run-scoped settings.
    pub run: RunConfig,
}

/// Unified application context passed to every command handler.
///
/// Constructed once in `Cli::run()` and passed as `&AppContext` to all
/// command handlers.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Run-scoped settings handed to the command builder.
    pub run: RunConfig,
    /// Loaded configuration.
    pub config: RiggerConfig,
    /// Process runner shared by every remote shell.
    pub runner: TokioCommandRunner,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn new(flags: &AppFlags, store: &impl ConfigStore) -> Result<Self> {
        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let config = store.load().context("loading configuration")?;

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet || flags.output.json),
            mode,
            run: flags.run,
            config,
            runner: TokioCommandRunner::default(),
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns a `TerminalReporter` backed by this context's output.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Builds the driver for a configured machine.
    ///
    /// # Errors
    ///
    /// Returns an error if the machine is not defined or its definition is unusable.
    pub fn driver(&self, name: &str, password: Option<String>) -> Result<StaticDriver> {
        let spec = self.config.machine(name)?;
        StaticDriver::from_spec(name, spec, password)
    }

    /// Remote shell for `driver` applying `policy` to its bootstrap password.
    #[must_use]
    pub fn shell<'a>(
        &'a self,
        driver: &'a StaticDriver,
        policy: PasswordClearPolicy,
    ) -> DriverShell<'a, TokioCommandRunner> {
        DriverShell::new(driver, &self.runner, SshCommandBuilder::new(self.run), policy)
    }

    /// Ask the user for a password without echoing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn prompt_password(&self, prompt: &str) -> Result<String> {
        let password = dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?;
        Ok(password)
    }
}
