//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod provision;
pub mod shell;
pub mod ssh;

pub use config::{
    EngineConfig, MachineSpec, PasswordClearPolicy, ReadinessConfig, RiggerConfig, RunConfig,
    validate_machine_name,
};
pub use error::{ConfigError, ProvisionError, ReadinessError};
pub use provision::{ProvisionReport, Stage, StepOutcome, StepRecord};
pub use ssh::{AuthDescriptor, AuthMode, RemoteInvocation, SshCommandBuilder, StdoutWiring};
