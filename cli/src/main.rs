//! Rigger CLI - turn a freshly booted remote machine into a container engine host

use std::process::ExitCode;

use clap::Parser;
use rigger_cli::cli::Cli;
use rigger_cli::domain::config::RunConfig;
use rigger_cli::output::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let run = cli.run_config(RunConfig::from_env());

    let default_level = if run.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let as_json = cli.json;
    match cli.run(run).await {
        Ok(code) => code,
        Err(e) => {
            if as_json {
                match json::format_error(&format!("{e:#}"), json::error_code(&e)) {
                    Ok(body) => eprintln!("{body}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
