//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the SSH
//! remote shell, config loading, and the collaborators that finish a machine.
//!
//! Imports from `crate::domain` and `crate::application` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod collaborators;
pub mod command_runner;
pub mod config;
pub mod driver;
pub mod remote;
