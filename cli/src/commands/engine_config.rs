//! `rigger engine-config`: render the engine options a machine would get.
//!
//! Purely local: nothing is run on the machine.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::domain::engine::generate_engine_options;
use crate::output::json;

/// Arguments for the engine-config command.
#[derive(Args)]
pub struct EngineConfigArgs {
    /// Machine name as defined in the config file
    pub machine: String,
}

/// Run `rigger engine-config`.
///
/// # Errors
///
/// Returns an error if the machine is unknown.
pub fn run(args: &EngineConfigArgs, app: &AppContext) -> Result<()> {
    let spec = app.config.machine(&args.machine)?;
    let engine = &app.config.engine;
    let options = generate_engine_options(
        spec.driver.name(),
        engine.port,
        &engine.machine_class,
        &app.config.auth,
    );

    if app.is_json() {
        println!("{}", json::format_value(&options)?);
    } else {
        println!("# {}", options.engine_options_path);
        println!("{}", options.engine_options);
    }
    Ok(())
}
