//! Declarative smoke-test runner for external binaries
//!
//! Turns a nested YAML suite into a flat, ordered sequence of test cases,
//! runs each case as one or more external-binary invocations, verifies by
//! exit status or byte-exact artifact comparison, and produces a run report
//! plus a pass/fail summary and process exit code.

pub mod cli;
pub mod commands;
pub mod common;
pub mod suite;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use suite::{RunExit, TestCase, TestRunner};
