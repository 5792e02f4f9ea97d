//! `rigger hostname`: print the hostname a machine reports.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::host::remote_hostname;
use crate::commands::MachineArgs;
use crate::domain::config::PasswordClearPolicy;
use crate::output::json;

/// Run `rigger hostname`.
///
/// # Errors
///
/// Returns an error if the machine is unknown or the query fails.
pub async fn run(args: &MachineArgs, app: &AppContext) -> Result<()> {
    let password = args.password.resolve(app, &args.machine)?;
    let driver = app.driver(&args.machine, password)?;
    let hostname = remote_hostname(&app.shell(&driver, PasswordClearPolicy::Never)).await?;

    if app.is_json() {
        let value = serde_json::json!({ "machine": args.machine, "hostname": hostname });
        println!("{}", json::format_value(&value)?);
    } else {
        println!("{hostname}");
    }
    Ok(())
}
