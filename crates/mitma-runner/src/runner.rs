//! The `IncrementalRunner` and its day loop.

use std::collections::BTreeMap;

use mitma_core::{NaiveDate, OutputGroup, OutputTable, PipelineConfig, RegionId, next_day};
use mitma_indicators::{compute_flux, compute_indexes, from_home_matrix, trip_matrix, trip_totals};
use mitma_source::{SourceCatalog, SourceError, load_population_file, load_trips_file};
use mitma_store::{OutputRows, TableStore};
use tracing::{debug, warn};

use crate::{DayReport, RunError, RunObserver, RunResult, RunSummary, SkipReason};

/// Last stored day per enabled output group, read from the group's
/// [primary table][OutputGroup::primary].
pub type Watermarks = BTreeMap<OutputGroup, Option<NaiveDate>>;

/// Drives the day-by-day indicator computation.
///
/// Each call to [`run`][Self::run]:
///
/// 1. **Schema**: creates every enabled table that does not exist yet.
/// 2. **Watermarks**: reads the latest stored day of every enabled group's
///    primary table and resolves the first day to process (explicit start
///    date, or the oldest watermark + 1 day).  Tables that may legitimately
///    stay empty, like `mitma_flux`, never hold the run back.
/// 3. **Scan**: lists both source directories once.
/// 4. **Day loop**, ascending, stopping before `end_date` or after the last
///    available file, whichever comes first:
///    - groups already holding the day are left alone, and so are tables
///      that were written before an earlier run failed on their group's
///      primary table;
///    - a day with a missing or unreadable file is skipped and reported;
///    - otherwise the day is loaded, computed, and appended table by table.
///
/// A failed append aborts the run.  The primary table of a group is written
/// last, so a group's watermark only moves once all its rows are stored and
/// re-running resumes at the failed day.
///
/// Create via [`RunnerBuilder`][crate::RunnerBuilder].
pub struct IncrementalRunner<S: TableStore> {
    pub(crate) config: PipelineConfig,
    pub(crate) store:  S,
    /// Enabled tables, sorted.
    pub(crate) tables: Vec<OutputTable>,
}

impl<S: TableStore> IncrementalRunner<S> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn tables(&self) -> &[OutputTable] {
        &self.tables
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Create every enabled table that does not exist yet.
    pub fn init(&mut self) -> RunResult<()> {
        for &table in &self.tables {
            self.store.create_schema(table)?;
        }
        Ok(())
    }

    /// Enabled output groups, in table order.
    pub fn groups(&self) -> Vec<OutputGroup> {
        let mut groups: Vec<OutputGroup> = Vec::new();
        for table in &self.tables {
            if !groups.contains(&table.group()) {
                groups.push(table.group());
            }
        }
        groups
    }

    /// Latest stored day of every enabled group.
    pub fn watermarks(&self) -> RunResult<Watermarks> {
        let mut marks = Watermarks::new();
        for group in self.groups() {
            marks.insert(group, self.store.latest_date(group.primary())?);
        }
        Ok(marks)
    }

    /// The first day a run would consider.
    ///
    /// # Errors
    ///
    /// [`RunError::Configuration`] when no start date is configured and the
    /// primary table of some enabled group has no stored rows.
    pub fn next_date(&self, watermarks: &Watermarks) -> RunResult<NaiveDate> {
        if let Some(start) = self.config.start_date {
            return Ok(start);
        }

        let mut oldest: Option<NaiveDate> = None;
        for (group, mark) in watermarks {
            let Some(mark) = *mark else {
                return Err(RunError::Configuration(format!(
                    "{} has no stored rows; give an explicit start date for the first run",
                    group.primary()
                )));
            };
            oldest = Some(oldest.map_or(mark, |o| o.min(mark)));
        }
        let oldest = oldest
            .ok_or_else(|| RunError::Configuration("no output tables enabled".into()))?;
        next_day(oldest).map_err(|e| RunError::Configuration(e.to_string()))
    }

    /// Process every pending day.  See the type-level docs for the steps.
    pub fn run<O: RunObserver>(&mut self, observer: &mut O) -> RunResult<RunSummary> {
        self.init()?;
        let mut watermarks = self.watermarks()?;
        let start = self.next_date(&watermarks)?;
        let end = self.config.end_date;

        let order = self.write_order();
        let mut stored = BTreeMap::new();
        for &table in &order {
            stored.insert(table, self.store.latest_date(table)?);
        }

        let catalog = SourceCatalog::scan(&self.config.trips_dir, &self.config.population_dir)?;
        let last = catalog.last_date();

        let mut summary = RunSummary { start_date: Some(start), ..RunSummary::default() };
        observer.on_run_start(start, end);

        let mut date = start;
        loop {
            if end.is_some_and(|end| date >= end) || last.is_none_or(|last| date > last) {
                break;
            }

            let after = |mark: &Option<NaiveDate>| mark.is_none_or(|mark| date > mark);
            let pending: Vec<OutputTable> = order
                .iter()
                .copied()
                .filter(|table| after(&watermarks[&table.group()]) && after(&stored[table]))
                .collect();

            if pending.is_empty() {
                debug!(%date, "already stored in every table");
            } else {
                observer.on_day_start(date);
                match self.process_day(&catalog, date, &pending)? {
                    Ok(report) => {
                        for &table in report.rows.keys() {
                            stored.insert(table, Some(date));
                            watermarks.insert(table.group(), Some(date));
                        }
                        summary.record_day(date, &report);
                        observer.on_day_end(date, &report);
                    }
                    Err(reason) => {
                        warn!(%date, %reason, "skipping day");
                        observer.on_day_skipped(date, &reason);
                        summary.record_skip(date, reason);
                    }
                }
            }

            let Ok(next) = next_day(date) else { break };
            date = next;
        }

        observer.on_run_end(&summary);
        Ok(summary)
    }

    // ── Per-day processing ────────────────────────────────────────────────

    /// Enabled tables grouped by output group, each group's primary last.
    fn write_order(&self) -> Vec<OutputTable> {
        let mut order = Vec::with_capacity(self.tables.len());
        for group in self.groups() {
            let primary = group.primary();
            order.extend(
                self.tables.iter().copied().filter(|&t| t.group() == group && t != primary),
            );
            order.push(primary);
        }
        order
    }

    /// Load, compute and append one day.
    ///
    /// The outer `Result` carries fatal storage failures; the inner one a
    /// day-local reason to skip.
    fn process_day(
        &mut self,
        catalog: &SourceCatalog,
        date:    NaiveDate,
        pending: &[OutputTable],
    ) -> RunResult<Result<DayReport, SkipReason>> {
        let (batches, degenerate) = match self.compute_day(catalog, date, pending) {
            Ok(computed) => computed,
            Err(SourceError::MissingSource { missing, .. }) => {
                return Ok(Err(SkipReason::Missing(missing)));
            }
            Err(e) => return Ok(Err(SkipReason::Unreadable(e.to_string()))),
        };

        let mut report = DayReport { degenerate, ..DayReport::default() };
        for batch in batches {
            let table = batch.table();
            self.store
                .append_rows(&batch)
                .map_err(|source| RunError::StorageWrite { date, table, source })?;
            debug!(%date, %table, rows = batch.len(), "appended");
            report.rows.insert(table, batch.len());
        }
        Ok(Ok(report))
    }

    /// Read the day's files and build one batch per pending table, in
    /// `pending` order.  Also returns the day's degenerate regions.
    fn compute_day(
        &self,
        catalog: &SourceCatalog,
        date:    NaiveDate,
        pending: &[OutputTable],
    ) -> Result<(Vec<OutputRows>, Vec<RegionId>), SourceError> {
        let day = catalog.day(date);
        let (trips_path, population_path) = day.require()?;

        let raw = load_trips_file(trips_path)?;
        let wants = |group: OutputGroup| pending.iter().any(|t| t.group() == group);

        let mut by_table: BTreeMap<OutputTable, OutputRows> = BTreeMap::new();
        let mut degenerate = Vec::new();

        if wants(OutputGroup::Qrp) {
            let population = load_population_file(population_path)?;
            let matrix = from_home_matrix(&raw, &self.config.home_labels);
            let outcome = compute_indexes(&population, &matrix);
            for region in &outcome.degenerate {
                warn!(%date, %region, "zero sampled population; region left out of indexes");
            }
            by_table.insert(OutputTable::Qrp, OutputRows::Qrp(outcome.to_rows(date)));
            by_table.insert(OutputTable::Flux, OutputRows::Flux(compute_flux(&matrix, date)));
            degenerate = outcome.degenerate;
        }
        if wants(OutputGroup::Trips) {
            by_table.insert(OutputTable::Trips, OutputRows::Trips(trip_totals(&raw, date)));
        }
        if wants(OutputGroup::Matrix) {
            by_table.insert(
                OutputTable::TripsMatrix,
                OutputRows::TripsMatrix(trip_matrix(&raw, date)),
            );
        }

        let batches = pending.iter().filter_map(|t| by_table.remove(t)).collect();
        Ok((batches, degenerate))
    }
}
