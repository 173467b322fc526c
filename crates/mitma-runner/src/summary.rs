//! Per-day reports and the end-of-run summary.

use std::collections::BTreeMap;
use std::fmt;

use mitma_core::{NaiveDate, OutputTable, RegionId};
use mitma_source::Missing;

/// Why a day in the processing range produced no output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// One or both source files are absent.
    Missing(Missing),
    /// The files exist but could not be read or parsed.
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Missing(missing) => write!(f, "missing {missing} file"),
            SkipReason::Unreadable(msg)  => write!(f, "unreadable source: {msg}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedDay {
    pub date:   NaiveDate,
    pub reason: SkipReason,
}

/// What one processed day wrote.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DayReport {
    /// Rows appended per table.  Tables already holding this day are absent.
    pub rows:       BTreeMap<OutputTable, usize>,
    /// Regions left out of `mitma_qrp` because their sampled population is
    /// zero.
    pub degenerate: Vec<RegionId>,
}

impl DayReport {
    pub fn total_rows(&self) -> usize {
        self.rows.values().sum()
    }
}

/// Outcome of [`IncrementalRunner::run`][crate::IncrementalRunner::run].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// The first day considered (explicit start or watermark + 1).
    pub start_date:   Option<NaiveDate>,
    /// Days whose output was written, ascending.
    pub processed:    Vec<NaiveDate>,
    /// Days in range that were skipped, ascending.
    pub skipped:      Vec<SkippedDay>,
    /// Degenerate regions per processed day.  Days without any are absent.
    pub degenerate:   BTreeMap<NaiveDate, Vec<RegionId>>,
    /// Rows appended per table over the whole run.
    pub rows_written: BTreeMap<OutputTable, usize>,
}

impl RunSummary {
    pub(crate) fn record_day(&mut self, date: NaiveDate, report: &DayReport) {
        self.processed.push(date);
        for (&table, &count) in &report.rows {
            *self.rows_written.entry(table).or_default() += count;
        }
        if !report.degenerate.is_empty() {
            self.degenerate.insert(date, report.degenerate.clone());
        }
    }

    pub(crate) fn record_skip(&mut self, date: NaiveDate, reason: SkipReason) {
        self.skipped.push(SkippedDay { date, reason });
    }

    /// Last day written, if any.
    pub fn last_processed(&self) -> Option<NaiveDate> {
        self.processed.last().copied()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.processed.first(), self.processed.last()) {
            (Some(first), Some(last)) => {
                writeln!(f, "processed {} day(s): {first} .. {last}", self.processed.len())?
            }
            _ => writeln!(f, "processed 0 days")?,
        }
        for (table, count) in &self.rows_written {
            writeln!(f, "  {table:<20} {count:>10} rows")?;
        }
        if !self.skipped.is_empty() {
            writeln!(f, "skipped {} day(s):", self.skipped.len())?;
            for day in &self.skipped {
                writeln!(f, "  {}  {}", day.date, day.reason)?;
            }
        }
        for (date, regions) in &self.degenerate {
            let codes: Vec<&str> = regions.iter().map(RegionId::as_str).collect();
            writeln!(f, "degenerate on {date}: {}", codes.join(", "))?;
        }
        Ok(())
    }
}
