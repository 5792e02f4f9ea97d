//! Shared test helpers: output constructors and a recording `CommandRunner`.

#![allow(dead_code)]

use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use rigger_cli::application::ports::{CommandRunner, ProgressReporter};
use rigger_cli::domain::ssh::{AuthMode, RemoteInvocation};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

// ── MockCommandRunner ────────────────────────────────────────────────────────

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub mode: AuthMode,
}

impl Call {
    /// The remote command line (last argument).
    pub fn remote(&self) -> &str {
        self.args.last().map_or("", String::as_str)
    }
}

type Responder = dyn Fn(&str) -> Result<Output> + Send + Sync;

/// A `CommandRunner` that records every invocation and answers from a
/// closure over the remote command line.
#[derive(Clone)]
pub struct MockCommandRunner {
    calls: Arc<Mutex<Vec<Call>>>,
    respond: Arc<Responder>,
}

impl MockCommandRunner {
    /// Every command succeeds with empty output.
    pub fn new_ok() -> Self {
        Self::responding(|_| Ok(ok_output(b"")))
    }

    /// Commands containing `pattern` exit 1; everything else succeeds.
    pub fn failing(pattern: &'static str) -> Self {
        Self::responding(move |cmd| {
            Ok(if cmd.contains(pattern) {
                err_output(1)
            } else {
                ok_output(b"")
            })
        })
    }

    pub fn responding(f: impl Fn(&str) -> Result<Output> + Send + Sync + 'static) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            respond: Arc::new(f),
        }
    }

    /// Return a snapshot of all recorded calls.
    pub fn recorded_calls(&self) -> Vec<Call> {
        self.calls.lock().expect("mutex poisoned").clone()
    }

    /// Remote command lines, in call order.
    pub fn remote_commands(&self) -> Vec<String> {
        self.recorded_calls()
            .iter()
            .map(|c| c.remote().to_string())
            .collect()
    }
}

impl CommandRunner for MockCommandRunner {
    async fn run(&self, invocation: &RemoteInvocation) -> Result<Output> {
        let call = Call {
            program: invocation.program().to_string(),
            args: invocation.args().to_vec(),
            mode: invocation.mode(),
        };
        let remote = call.remote().to_string();
        self.calls.lock().expect("mutex poisoned").push(call);
        (self.respond)(&remote)
    }

    async fn run_interactive(&self, invocation: &RemoteInvocation) -> Result<ExitStatus> {
        self.run(invocation).await.map(|o| o.status)
    }
}

// ── Reporter ─────────────────────────────────────────────────────────────────

/// Collects reported steps.
#[derive(Default)]
pub struct CollectingReporter {
    pub steps: Mutex<Vec<String>>,
}

impl ProgressReporter for CollectingReporter {
    fn step(&self, message: &str) {
        self.steps.lock().expect("mutex poisoned").push(message.to_string());
    }
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}
