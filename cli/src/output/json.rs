//! JSON output helpers for `--json` code paths.

use anyhow::{Context, Result};
use serde::Serialize;

/// Format a JSON error object.
///
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Pretty-print any serializable value.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_value<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}

/// Stable error code for a failure, derived from its typed root where known.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    use crate::domain::error::{ConfigError, ProvisionError};
    use rigger_common::DriverError;

    if let Some(e) = err.downcast_ref::<ProvisionError>() {
        return match e {
            ProvisionError::IncompatibleHost { .. } => "INCOMPATIBLE_HOST",
            ProvisionError::PublicKey { .. } => "PUBLIC_KEY",
            ProvisionError::RemoteStep { .. } => "REMOTE_STEP_FAILED",
            ProvisionError::EngineNotReady(_) => "ENGINE_NOT_READY",
        };
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return "CONFIG";
    }
    if err.downcast_ref::<DriverError>().is_some() {
        return "DRIVER";
    }
    "ERROR"
}
