//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `MitmaError` as one
//! variant where they need to surface configuration or parsing problems.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MitmaError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid region code {0:?}")]
    InvalidRegion(String),

    #[error("invalid date {0:?}: expected YYYY-MM-DD or YYYYMMDD")]
    InvalidDate(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shorthand result type for all `mitma-*` crates.
pub type MitmaResult<T> = Result<T, MitmaError>;
