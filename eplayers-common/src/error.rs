//! Common error types for E-Players

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for E-Players operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the E-Players crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Row codec error raised by the csv reader/writer
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A stored row could not be decoded into a record
    #[error("Malformed row at {}:{line}: {reason}", .path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    /// A field value cannot be stored without corrupting the row layout
    #[error("Invalid field {field}: {value:?} contains a delimiter or line break")]
    InvalidField { field: &'static str, value: String },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
