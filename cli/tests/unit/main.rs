//! Unit tests for rigger CLI
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod helpers;
mod provisioning_flow;
