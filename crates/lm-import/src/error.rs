//! Error types for lm-import.
//!
//! Fatal conditions from the parser and store propagate unchanged; the
//! stage importers themselves degrade recoverable row-level failures into
//! counters rather than errors.

use thiserror::Error;

/// Import-layer errors
#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Dump(#[from] lm_dump::DumpError),

    #[error(transparent)]
    Store(#[from] lm_store::StoreError),

    #[error(transparent)]
    Core(#[from] lm_core::CoreError),
}

/// Result type alias for [`ImportError`]
pub type ImportResult<T> = Result<T, ImportError>;
