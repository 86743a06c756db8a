//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! None of these abort a batch on their own: record-level failures are
//! turned into diagnostics by the stage that hits them.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while decoding a single log line
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid log line format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur while computing a response time
#[derive(Error, Debug)]
pub enum TimestampError {
    #[error("{0} timestamp is missing")]
    Missing(&'static str),

    #[error("invalid timestamp '{value}': {source}")]
    Invalid {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("cannot compare a timestamp with an offset to one without")]
    MixedOffsets,

    #[error("time difference is out of range")]
    OutOfRange,
}

/// Errors that can occur while opening the input log
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Input file {0} not found")]
    NotFound(PathBuf),

    #[error("Cannot read input file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while reading or writing JSON artifacts
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
