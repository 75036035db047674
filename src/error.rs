//! Error handling types for kakikomi
//!
//! Every variant's `Display` output is the message handed back to the test
//! that made the assertion; the verifier never lets one of these escape.

use std::time::Duration;
use thiserror::Error;

/// Failure kinds for a single inline snapshot assertion
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The value-producing expression failed; its description is surfaced verbatim
    #[error("{0}")]
    Producer(String),

    /// The snapshot strategy did not deliver a value in time
    #[error("Exceeded timeout of {timeout:?} waiting for snapshot")]
    Timeout { timeout: Duration },

    /// Delivery was duplicated, cancelled, dropped, or produced nothing usable
    #[error("Couldn't snapshot value")]
    Delivery,

    /// The reference argument is neither `""` nor a multi-line literal
    #[error(
        "To record inline snapshots, the reference argument at line {line} must be a \
         multi-line string literal (`\"\"\"`). Convert it manually and re-run the test."
    )]
    LiteralSyntax { line: usize },

    /// The call site no longer exists in the file
    #[error("Line {line} is outside of the source file ({line_count} lines)")]
    LineOutOfRange { line: usize, line_count: usize },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

impl SnapshotError {
    /// Create a producer error from anything displayable
    pub fn producer(error: impl std::fmt::Display) -> Self {
        SnapshotError::Producer(error.to_string())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        SnapshotError::Config {
            message: message.into(),
        }
    }
}
