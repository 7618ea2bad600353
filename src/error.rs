//! Error types for compat-check operations.
//!
//! This module defines [`CompatError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration, registry and persistence errors end the run and map to
//!   an exit code via [`CompatError::exit_code`]
//! - Per-package failures (acquisition, scanning, metadata) are recorded as
//!   verdict data by the pipeline and never abort a run
//! - Use `anyhow::Error` (via `CompatError::Other`) for unexpected errors

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for compat-check operations.
#[derive(Debug, Error)]
pub enum CompatError {
    /// Invalid flag combination or configuration value.
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// A credential required for the run is not set.
    #[error("Missing credential '{name}': set it in the environment or the .env file")]
    MissingCredential { name: String },

    /// Registry API request failed.
    #[error("Registry request failed: {message}")]
    Registry { message: String },

    /// External command could not be started or exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// External command could not be started at all.
    #[error("Failed to start \"{command}\": {message}")]
    SpawnFailed { command: String, message: String },

    /// External command exceeded its time budget and was killed.
    #[error("The process \"{command}\" exceeded the timeout of {} seconds", timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    /// Result ledger could not be written.
    #[error("Failed to persist results to {path}: {message}")]
    Persistence { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CompatError {
    /// Process exit code for a run that ends with this error.
    ///
    /// Usage errors exit with 2, everything else with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config { .. } | Self::MissingCredential { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for compat-check operations.
pub type Result<T> = std::result::Result<T, CompatError>;
