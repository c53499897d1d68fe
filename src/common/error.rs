//! Error types for the smoke-test CLI
//!
//! Per-case failures are not errors: a failing stage or a mismatched
//! artifact is recorded on the case and reported through the run log.
//! This type covers the infrastructure around the run: configuration,
//! suite parsing, report I/O, and preflight checks.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the smoke-test CLI
#[derive(Error, Debug)]
pub enum Error {
    // === Preflight Errors ===
    #[error("No {name} or it cannot be executed")]
    BinaryNotExecutable { name: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Suite Errors ===
    #[error("Invalid suite file: {0}")]
    SuiteParse(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a preflight error for a binary that cannot run
    pub fn binary_not_executable(name: &str) -> Self {
        Self::BinaryNotExecutable {
            name: name.to_string(),
        }
    }

    /// Create a file read error with the offending path
    pub fn file_read(path: &std::path::Path, error: &io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}
