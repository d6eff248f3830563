//! Error types for tidemark.

use std::io;

/// Error type for region rendering operations.
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    /// The output stream is not a terminal.
    ///
    /// Mutations still work in this state; emission is suppressed. The error
    /// is surfaced only by operations that make no sense without a terminal
    /// (e.g. the cursor-position query).
    #[error("output stream is not a terminal")]
    NotATerminal,

    /// The underlying stream rejected a write.
    #[error("write failure: {0}")]
    Write(#[from] io::Error),

    /// A line number below 1 was passed to the region API.
    #[error("invalid line number: {0} (line numbers are 1-based)")]
    InvalidLineNumber(usize),

    /// A layout computation required a finite width where none exists.
    #[error("measurement error: {0}")]
    Measurement(String),

    /// The cursor-position query got no parseable reply in time.
    #[error("cursor position query timed out")]
    CursorQueryTimeout,
}

/// Result type alias for region rendering operations.
pub type Result<T> = std::result::Result<T, RegionError>;
