//! Remote shell invocation construction.
//!
//! Pure functions only: building an invocation never touches the network,
//! the filesystem, or the process environment.

use std::fmt;
use std::path::PathBuf;

use crate::domain::config::RunConfig;

/// Secure-shell client binary.
pub const SSH_PROGRAM: &str = "ssh";
/// Password-automation wrapper around [`SSH_PROGRAM`].
pub const SSHPASS_PROGRAM: &str = "sshpass";

/// Client options shared by key and password mode.
const CONNECTION_OPTIONS: &[&str] = &[
    "IdentitiesOnly=yes",
    // never consult ~/.ssh/known_hosts
    "StrictHostKeyChecking=no",
    // and never write to it either
    "UserKnownHostsFile=/dev/null",
    "ConnectionAttempts=30",
    // drops the "Permanently added ... to the list of known hosts" warning
    "LogLevel=quiet",
];

/// Which credential a remote command authenticates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Key,
    Password,
}

/// Credential chosen for one remote command. Resolved fresh every time.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthDescriptor {
    Key { key_path: PathBuf },
    Password { secret: String },
}

impl AuthDescriptor {
    #[must_use]
    pub fn mode(&self) -> AuthMode {
        match self {
            Self::Key { .. } => AuthMode::Key,
            Self::Password { .. } => AuthMode::Password,
        }
    }
}

impl fmt::Debug for AuthDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key { key_path } => f.debug_struct("Key").field("key_path", key_path).finish(),
            Self::Password { .. } => f.debug_struct("Password").field("secret", &"***").finish(),
        }
    }
}

/// Where the invocation's standard output goes. Standard error always goes
/// to the caller's standard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdoutWiring {
    /// Pass through to the caller's standard output.
    Inherit,
    /// Left for the caller to capture or discard.
    Capture,
}

/// An executable remote-shell command. One per remote command.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteInvocation {
    program: String,
    args: Vec<String>,
    stdout: StdoutWiring,
    mode: AuthMode,
}

impl RemoteInvocation {
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn stdout(&self) -> StdoutWiring {
        self.stdout
    }

    #[must_use]
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Invocation of a local program, for exercising runners in tests.
    #[cfg(test)]
    pub(crate) fn local(program: &str, args: Vec<String>, stdout: StdoutWiring) -> Self {
        Self {
            program: program.to_string(),
            args,
            stdout,
            mode: AuthMode::Key,
        }
    }

    /// Same invocation with standard output captured regardless of debug mode.
    #[must_use]
    pub fn capturing(mut self) -> Self {
        self.stdout = StdoutWiring::Capture;
        self
    }

    /// Command line suitable for logs: the password argument is masked.
    #[must_use]
    pub fn redacted(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.clone());
        for (i, arg) in self.args.iter().enumerate() {
            if i == 0 && self.mode == AuthMode::Password {
                parts.push("-p***".to_string());
            } else {
                parts.push(arg.clone());
            }
        }
        parts.join(" ")
    }
}

impl fmt::Debug for RemoteInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteInvocation")
            .field("command", &self.redacted())
            .field("stdout", &self.stdout)
            .finish()
    }
}

/// Builds remote-shell invocations for a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SshCommandBuilder {
    run: RunConfig,
}

impl SshCommandBuilder {
    #[must_use]
    pub fn new(run: RunConfig) -> Self {
        Self { run }
    }

    /// Build an invocation running `command` as `user@host:port`.
    ///
    /// An empty `command` opens an interactive shell. Empty host/user or a
    /// zero port are caller contract violations and are not checked here.
    #[must_use]
    pub fn build(
        &self,
        host: &str,
        port: u16,
        user: &str,
        auth: &AuthDescriptor,
        command: &[String],
    ) -> RemoteInvocation {
        let mut ssh_args = Vec::with_capacity(CONNECTION_OPTIONS.len() * 2 + command.len() + 6);
        for opt in CONNECTION_OPTIONS {
            ssh_args.push("-o".to_string());
            ssh_args.push((*opt).to_string());
        }
        ssh_args.push("-p".to_string());
        ssh_args.push(port.to_string());

        let (program, args) = match auth {
            AuthDescriptor::Key { key_path } => {
                ssh_args.push("-i".to_string());
                ssh_args.push(key_path.display().to_string());
                (SSH_PROGRAM, ssh_args)
            }
            AuthDescriptor::Password { secret } => {
                let mut wrapped = Vec::with_capacity(ssh_args.len() + command.len() + 3);
                wrapped.push(format!("-p{secret}"));
                wrapped.push(SSH_PROGRAM.to_string());
                wrapped.extend(ssh_args);
                (SSHPASS_PROGRAM, wrapped)
            }
        };

        let mut args = args;
        args.push(format!("{user}@{host}"));
        args.extend(command.iter().cloned());

        RemoteInvocation {
            program: program.to_string(),
            args,
            stdout: if self.run.debug {
                StdoutWiring::Inherit
            } else {
                StdoutWiring::Capture
            },
            mode: auth.mode(),
        }
    }
}
