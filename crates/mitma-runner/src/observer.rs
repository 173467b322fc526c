//! Run observer trait for progress reporting.

use mitma_core::NaiveDate;
use tracing::info;

use crate::{DayReport, RunSummary, SkipReason};

/// Callbacks invoked by [`IncrementalRunner::run`][crate::IncrementalRunner::run]
/// at day boundaries.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — day counter
///
/// ```rust,ignore
/// struct DayCounter(usize);
///
/// impl RunObserver for DayCounter {
///     fn on_day_end(&mut self, _date: NaiveDate, _report: &DayReport) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait RunObserver {
    /// Called once after watermarks are resolved and before the first day.
    ///
    /// `end_date` is the exclusive stop, if one was configured.
    fn on_run_start(&mut self, _start_date: NaiveDate, _end_date: Option<NaiveDate>) {}

    /// Called before a day's files are looked up.
    fn on_day_start(&mut self, _date: NaiveDate) {}

    /// Called after all of a day's rows have been appended.
    fn on_day_end(&mut self, _date: NaiveDate, _report: &DayReport) {}

    /// Called for a day in range that produced no output.
    fn on_day_skipped(&mut self, _date: NaiveDate, _reason: &SkipReason) {}

    /// Called once after the last day.  Not called when the run aborts.
    fn on_run_end(&mut self, _summary: &RunSummary) {}
}

/// A [`RunObserver`] that does nothing.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// A [`RunObserver`] that writes one `info` event per processed day and a
/// closing summary.
///
/// Skipped days and degenerate regions are already logged at `warn` by the
/// runner itself.
#[derive(Default)]
pub struct LogObserver;

impl RunObserver for LogObserver {
    fn on_run_start(&mut self, start_date: NaiveDate, end_date: Option<NaiveDate>) {
        match end_date {
            Some(end) => info!(%start_date, end_date = %end, "starting incremental run"),
            None => info!(%start_date, "starting incremental run through last available file"),
        }
    }

    fn on_day_end(&mut self, date: NaiveDate, report: &DayReport) {
        info!(
            %date,
            rows = report.total_rows(),
            degenerate = report.degenerate.len(),
            "day processed"
        );
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        info!(
            processed = summary.processed.len(),
            skipped = summary.skipped.len(),
            last = ?summary.last_processed(),
            "incremental run finished"
        );
    }
}
