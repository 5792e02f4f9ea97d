//! `rigger provision`: turn a reachable machine into a container engine host.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ProgressReporter;
use crate::application::services::host::detect_os_release;
use crate::application::services::provision::{self as service, ProvisionSettings, ProvisioningSession};
use crate::commands::PasswordArgs;
use crate::domain::config::PasswordClearPolicy;
use crate::infra::collaborators::{EngineOptionsAuth, SwarmJoiner};
use crate::output::json;

/// Arguments for the provision command.
#[derive(Args)]
pub struct ProvisionArgs {
    /// Machine name as defined in the config file
    pub machine: String,

    #[command(flatten)]
    pub password: PasswordArgs,

    /// When to discard the bootstrap password (overrides the config file)
    #[arg(long, value_enum)]
    pub password_policy: Option<PasswordClearPolicy>,
}

/// Run `rigger provision`.
///
/// # Errors
///
/// Returns an error if the machine is unknown, its OS is unsupported, or any
/// fatal provisioning step fails.
pub async fn run(args: &ProvisionArgs, app: &AppContext) -> Result<()> {
    let password = args.password.resolve(app, &args.machine)?;
    let driver = app.driver(&args.machine, password)?;
    let mut settings = ProvisionSettings::from_config(&app.config);
    if let Some(policy) = args.password_policy {
        settings.password_policy = policy;
    }

    let reporter = app.terminal_reporter();
    reporter.step("detecting operating system...");
    // The sequence clears the password itself; the shell must not.
    let shell = app.shell(&driver, PasswordClearPolicy::Never);
    let os_release = detect_os_release(&shell).await?;

    let session = ProvisioningSession {
        driver: &driver,
        swarm: app.config.swarm.clone(),
        auth: app.config.auth.clone(),
        os_release,
    };
    let cluster = SwarmJoiner::new(app.config.auth.clone());

    let report = tokio::select! {
        result = service::provision(&session, &shell, &EngineOptionsAuth, &cluster, &reporter, &settings) => result?,
        _ = tokio::signal::ctrl_c() => {
            anyhow::bail!("interrupted; {} may be partially provisioned", args.machine)
        }
    };
    drop(reporter);

    if app.is_json() {
        println!("{}", json::format_value(&report)?);
        return Ok(());
    }
    print_summary(&session, &settings, app);
    Ok(())
}

fn print_summary(
    session: &ProvisioningSession<'_>,
    settings: &ProvisionSettings,
    app: &AppContext,
) {
    let os = &session.os_release;
    app.output
        .kv("OS", os.pretty_name.as_deref().unwrap_or(os.id.as_str()));
    if let Ok(host) = session.driver.ssh_hostname() {
        app.output
            .kv("Engine", &format!("tcp://{host}:{}", settings.engine.port));
    }
}
