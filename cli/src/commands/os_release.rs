//! `rigger os-release`: show a machine's OS identity and whether it is supported.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::host::detect_os_release;
use crate::commands::MachineArgs;
use crate::domain::config::PasswordClearPolicy;
use crate::domain::host::compatible_with_host;
use crate::output::json;

/// Run `rigger os-release`.
///
/// # Errors
///
/// Returns an error if the machine is unknown or `/etc/os-release` cannot be
/// read or parsed.
pub async fn run(args: &MachineArgs, app: &AppContext) -> Result<()> {
    let password = args.password.resolve(app, &args.machine)?;
    let driver = app.driver(&args.machine, password)?;
    let release = detect_os_release(&app.shell(&driver, PasswordClearPolicy::Never)).await?;
    let supported = compatible_with_host(&release.id);

    if app.is_json() {
        let value = serde_json::json!({ "os_release": release, "supported": supported });
        println!("{}", json::format_value(&value)?);
        return Ok(());
    }

    let ctx = &app.output;
    ctx.kv("ID", &release.id);
    if let Some(name) = &release.pretty_name {
        ctx.kv("Name", name);
    }
    if let Some(version) = &release.version_id {
        ctx.kv("Version", version);
    }
    if supported {
        ctx.success("supported");
    } else {
        ctx.warn("not supported for provisioning");
    }
    Ok(())
}
