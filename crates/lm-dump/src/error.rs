//! Error types for lm-dump

use thiserror::Error;

/// Dump parsing errors
#[derive(Error, Debug)]
pub enum DumpError {
    /// D001: Failed to read a dump file
    #[error("[D001] Failed to read dump file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// D002: A present, non-empty dump file produced zero rows for the
    /// expected table. This signals a format or table-name mismatch, not
    /// "no data", and is fatal.
    #[error("[D002] Dump file '{path}' contains no parseable rows for table '{table}'")]
    NoRows { path: String, table: String },

    /// D003: Structurally malformed statement (unterminated quote or tuple)
    #[error("[D003] Malformed SQL in dump: {message}")]
    Malformed { message: String },
}

/// Result type alias for [`DumpError`]
pub type DumpResult<T> = Result<T, DumpError>;
