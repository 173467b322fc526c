use std::path::PathBuf;

use mitma_core::NaiveDate;
use thiserror::Error;

use crate::Missing;

#[derive(Debug, Error)]
pub enum SourceError {
    /// A source directory could not be listed.  Fatal for a run.
    #[error("cannot read source directory {path}: {source}")]
    UnreadableDirectory {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or both files are absent for a day in the processing range.
    #[error("missing {missing} file for {date}")]
    MissingSource { date: NaiveDate, missing: Missing },

    #[error("source parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;
