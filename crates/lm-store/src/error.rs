//! Error types for the destination store.

use thiserror::Error;

/// Destination store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open or create the database (S001).
    #[error("[S001] Store connection failed: {0}")]
    ConnectionError(String),

    /// Schema migration failed (S002).
    #[error("[S002] Store migration failed: {0}")]
    MigrationError(String),

    /// SQL execution error (S003).
    #[error("[S003] Store query failed: {0}")]
    QueryError(String),

    /// Transaction management error (S004).
    #[error("[S004] Store transaction failed: {0}")]
    TransactionError(String),

    /// Destination entity kind is not registered (S005). Fatal: the whole
    /// invocation aborts rather than materializing unknown kinds.
    #[error("[S005] Entity kind not registered: {0}")]
    UnknownKind(String),

    /// DuckDB driver error with preserved source chain (S006).
    #[error("[S006] DuckDB error")]
    DuckDb(#[source] duckdb::Error),
}

/// Result type alias for [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

impl From<duckdb::Error> for StoreError {
    fn from(err: duckdb::Error) -> Self {
        StoreError::DuckDb(err)
    }
}

/// Context helper mirroring the populate_context pattern: wraps driver
/// errors into [`StoreError::QueryError`] with the failing operation named.
pub trait StoreResultExt<T> {
    fn query_context(self, what: &str) -> StoreResult<T>;
}

impl<T> StoreResultExt<T> for Result<T, duckdb::Error> {
    fn query_context(self, what: &str) -> StoreResult<T> {
        self.map_err(|e| StoreError::QueryError(format!("{what}: {e}")))
    }
}
