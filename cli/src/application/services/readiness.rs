//! Readiness polling: retry a probe with a fixed delay until it succeeds or
//! the attempt budget runs out.

use std::future::Future;

use crate::domain::config::ReadinessConfig;
use crate::domain::error::ReadinessError;

/// Poll `probe` until it returns `true`.
///
/// A probe that cannot even run should report `false`; only exhausting
/// `config.max_attempts` is fatal.
///
/// # Errors
///
/// Returns [`ReadinessError::TimedOut`] after exactly `max_attempts` failed probes.
pub async fn wait_for<F, Fut>(config: &ReadinessConfig, probe: F) -> Result<(), ReadinessError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    wait_for_cancellable(config, probe, std::future::pending()).await
}

/// [`wait_for`] that gives up as soon as `cancel` completes.
///
/// # Errors
///
/// Returns [`ReadinessError::Cancelled`] if `cancel` resolves first, otherwise
/// as [`wait_for`].
pub async fn wait_for_cancellable<F, Fut, C>(
    config: &ReadinessConfig,
    mut probe: F,
    cancel: C,
) -> Result<(), ReadinessError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
    C: Future<Output = ()>,
{
    tokio::pin!(cancel);
    let delay = config.interval();

    for attempt in 1..=config.max_attempts {
        tokio::select! {
            biased;
            () = &mut cancel => return Err(ReadinessError::Cancelled),
            ready = probe() => {
                if ready {
                    tracing::debug!(attempt, "probe succeeded");
                    return Ok(());
                }
            }
        }
        tracing::trace!(attempt, max_attempts = config.max_attempts, "not ready yet");

        if attempt < config.max_attempts {
            tokio::select! {
                biased;
                () = &mut cancel => return Err(ReadinessError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    Err(ReadinessError::TimedOut {
        attempts: config.max_attempts,
    })
}
