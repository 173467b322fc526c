use mitma_core::{NaiveDate, OutputTable};
use mitma_source::SourceError;
use mitma_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    /// The run cannot start: no watermark and no explicit start date, or an
    /// invalid setting.  Nothing has been processed.
    #[error("run configuration error: {0}")]
    Configuration(String),

    /// A source directory could not be listed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Schema creation or a watermark read failed before processing began.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Appending a day's rows failed.  Tables written earlier that day keep
    /// their rows; the failed table's watermark stays before `date`.
    #[error("failed to write {table} for {date}: {source}")]
    StorageWrite {
        date:   NaiveDate,
        table:  OutputTable,
        #[source]
        source: StoreError,
    },
}

pub type RunResult<T> = Result<T, RunError>;
