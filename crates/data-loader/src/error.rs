//! Error types for the data-loader crate.
//!
//! Only loading can fail. Lookups report misses as `None` or an empty
//! slice, never as an error.
//!
//! Rust error handling concepts used here:
//! - thiserror derives `Display` and `std::error::Error` from `#[error]`
//! - `#[from]` lets `?` convert an `io::Error` without a `map_err`
//! - Struct variants carry the file and line a failure points at

use thiserror::Error;

/// Errors that can occur while loading a record file.
///
/// Any of these aborts the whole file: no partially built database is
/// ever returned.
///
/// Rust concept: an enum lets callers `match` on the kind of failure, while
/// code that only reports errors can treat them all through `Display`.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A field inside a record could not be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// The file ended in the middle of a record block
    #[error("Truncated record in {file}: missing {field} at line {line}")]
    TruncatedRecord {
        file: String,
        line: usize,
        field: &'static str,
    },
}

/// Convenience type alias for Results in this crate
///
/// Rust concept: the alias fixes the error type, so signatures read
/// `Result<Vec<Movie>>` instead of spelling out `DataLoadError` each time.
pub type Result<T> = std::result::Result<T, DataLoadError>;
