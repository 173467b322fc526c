//! Error types for mitma-store.

use mitma_core::OutputTable;
use thiserror::Error;

/// Errors raised by a [`TableStore`][crate::TableStore] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table {0} does not exist")]
    MissingTable(OutputTable),

    #[error("table {table} holds a malformed row: {message}")]
    Corrupt { table: OutputTable, message: String },

    #[error("{0} storage support is not compiled in")]
    Unsupported(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;
