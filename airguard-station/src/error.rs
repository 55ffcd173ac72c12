//! Station-level errors
//!
//! The core keeps its errors `Copy` and allocation-free. Out here at the
//! edge we deal with files, JSON and threads, so errors carry owned context.

use std::path::PathBuf;

use airguard_core::AirGuardError;
use thiserror::Error;

/// Result alias for station operations
pub type StationResult<T> = Result<T, StationError>;

/// Errors raised while setting up or running a station
#[derive(Debug, Error)]
pub enum StationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read config {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Pipeline(#[from] AirGuardError),
}
