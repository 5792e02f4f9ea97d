//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill on all platforms.

use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::CommandRunner;
use crate::domain::ssh::{RemoteInvocation, StdoutWiring};

/// Default ceiling for one remote command. Engine downloads run on slow
/// boards, so this is generous.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(600);

/// Production `CommandRunner`.
///
/// `tokio::time::timeout` around `.output().await` does not kill the child
/// on every platform, so this uses `tokio::select!` with an explicit
/// `child.kill()`.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_REMOTE_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &RemoteInvocation) -> Result<Output> {
        let program = invocation.program();
        let stdout = match invocation.stdout() {
            StdoutWiring::Capture => Stdio::piped(),
            StdoutWiring::Inherit => Stdio::inherit(),
        };
        let mut child = tokio::process::Command::new(program)
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();

        tokio::select! {
            result = async {
                let (status, stdout) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr: Vec::new(),
                })
            } => result,
            () = tokio::time::sleep(self.timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", self.timeout.as_secs())
            }
        }
    }

    async fn run_interactive(&self, invocation: &RemoteInvocation) -> Result<ExitStatus> {
        let program = invocation.program();
        let mut child = tokio::process::Command::new(program)
            .args(invocation.args())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }
}
