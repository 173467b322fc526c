//! Fluent builder for constructing an [`IncrementalRunner`].

use mitma_core::{NaiveDate, OutputGroup, PipelineConfig};
use mitma_store::TableStore;

use crate::{IncrementalRunner, RunError, RunResult};

/// Fluent builder for [`IncrementalRunner<S>`].
///
/// # Required inputs
///
/// - [`PipelineConfig`] — source directories, home labels, enabled outputs, …
/// - `S: TableStore` — the storage backend, usually from
///   [`mitma_store::open_store`]
///
/// # Optional overrides
///
/// | Method              | Default                          |
/// |---------------------|----------------------------------|
/// | `.start_date(d)`    | `config.start_date`              |
/// | `.end_date(d)`      | `config.end_date`                |
/// | `.outputs(v)`       | `config.outputs`                 |
///
/// # Example
///
/// ```rust,ignore
/// let store = open_store(&config.store)?;
/// let mut runner = RunnerBuilder::new(config, store)
///     .end_date(NaiveDate::from_ymd_opt(2020, 6, 1).unwrap())
///     .build()?;
/// let summary = runner.run(&mut LogObserver)?;
/// ```
pub struct RunnerBuilder<S: TableStore> {
    config:     PipelineConfig,
    store:      S,
    start_date: Option<NaiveDate>,
    end_date:   Option<NaiveDate>,
    outputs:    Option<Vec<OutputGroup>>,
}

impl<S: TableStore> RunnerBuilder<S> {
    pub fn new(config: PipelineConfig, store: S) -> Self {
        Self {
            config,
            store,
            start_date: None,
            end_date:   None,
            outputs:    None,
        }
    }

    /// Process from `date` regardless of stored watermarks.  Tables that
    /// already hold a later day are still not written twice.
    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Stop before `date`; it is not loaded.
    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Restrict the run to `groups`.
    pub fn outputs(mut self, groups: Vec<OutputGroup>) -> Self {
        self.outputs = Some(groups);
        self
    }

    /// Apply overrides, validate, and return a ready-to-run runner.
    pub fn build(self) -> RunResult<IncrementalRunner<S>> {
        let mut config = self.config;
        if let Some(date) = self.start_date {
            config.start_date = Some(date);
        }
        if let Some(date) = self.end_date {
            config.end_date = Some(date);
        }
        if let Some(groups) = self.outputs {
            config.outputs = groups;
        }

        config.validate().map_err(|e| RunError::Configuration(e.to_string()))?;

        Ok(IncrementalRunner {
            tables: config.tables(),
            config,
            store:  self.store,
        })
    }
}
