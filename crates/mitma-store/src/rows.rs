//! Row batches and filters shared by all backends.

use mitma_core::{
    FluxRow, IndexRow, NaiveDate, OutputTable, RegionId, TripMatrixOutputRow, TripTotalsRow,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{StoreError, StoreResult};

// ── TableRow ──────────────────────────────────────────────────────────────────

/// A row type stored in exactly one [`OutputTable`].
///
/// Every table has the same shape: `date`, `source`, an optional `target`,
/// then one or more float columns.  Backends that are not serde-driven
/// (SQLite) work from [`values`][Self::values] and
/// [`from_parts`][Self::from_parts].
pub trait TableRow: Clone + Serialize + DeserializeOwned {
    const TABLE: OutputTable;

    fn date(&self) -> NaiveDate;
    fn source(&self) -> &RegionId;

    fn target(&self) -> Option<&RegionId> {
        None
    }

    /// The float columns in storage order.
    fn values(&self) -> Vec<f64>;

    /// Rebuild a row from its stored columns.
    fn from_parts(
        date:   NaiveDate,
        source: RegionId,
        target: Option<RegionId>,
        values: &[f64],
    ) -> StoreResult<Self>;

    fn into_batch(rows: Vec<Self>) -> OutputRows;
}

fn corrupt(table: OutputTable, message: impl Into<String>) -> StoreError {
    StoreError::Corrupt { table, message: message.into() }
}

fn expect_values<const N: usize>(table: OutputTable, values: &[f64]) -> StoreResult<[f64; N]> {
    values
        .try_into()
        .map_err(|_| corrupt(table, format!("expected {N} values, got {}", values.len())))
}

fn expect_target(table: OutputTable, target: Option<RegionId>) -> StoreResult<RegionId> {
    target.ok_or_else(|| corrupt(table, "missing target column"))
}

impl TableRow for TripTotalsRow {
    const TABLE: OutputTable = OutputTable::Trips;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn source(&self) -> &RegionId {
        &self.source
    }

    fn values(&self) -> Vec<f64> {
        vec![self.trips_outgoing, self.trips_incoming, self.trips_internal]
    }

    fn from_parts(
        date:   NaiveDate,
        source: RegionId,
        _:      Option<RegionId>,
        values: &[f64],
    ) -> StoreResult<Self> {
        let [trips_outgoing, trips_incoming, trips_internal] = expect_values(Self::TABLE, values)?;
        Ok(Self { date, source, trips_outgoing, trips_incoming, trips_internal })
    }

    fn into_batch(rows: Vec<Self>) -> OutputRows {
        OutputRows::Trips(rows)
    }
}

impl TableRow for TripMatrixOutputRow {
    const TABLE: OutputTable = OutputTable::TripsMatrix;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn source(&self) -> &RegionId {
        &self.source
    }

    fn target(&self) -> Option<&RegionId> {
        Some(&self.target)
    }

    fn values(&self) -> Vec<f64> {
        vec![self.trips]
    }

    fn from_parts(
        date:   NaiveDate,
        source: RegionId,
        target: Option<RegionId>,
        values: &[f64],
    ) -> StoreResult<Self> {
        let [trips] = expect_values(Self::TABLE, values)?;
        let target = expect_target(Self::TABLE, target)?;
        Ok(Self { date, source, target, trips })
    }

    fn into_batch(rows: Vec<Self>) -> OutputRows {
        OutputRows::TripsMatrix(rows)
    }
}

impl TableRow for IndexRow {
    const TABLE: OutputTable = OutputTable::Qrp;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn source(&self) -> &RegionId {
        &self.source
    }

    fn values(&self) -> Vec<f64> {
        vec![self.q, self.r, self.p]
    }

    fn from_parts(
        date:   NaiveDate,
        source: RegionId,
        _:      Option<RegionId>,
        values: &[f64],
    ) -> StoreResult<Self> {
        let [q, r, p] = expect_values(Self::TABLE, values)?;
        Ok(Self { date, source, q, r, p })
    }

    fn into_batch(rows: Vec<Self>) -> OutputRows {
        OutputRows::Qrp(rows)
    }
}

impl TableRow for FluxRow {
    const TABLE: OutputTable = OutputTable::Flux;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn source(&self) -> &RegionId {
        &self.source
    }

    fn target(&self) -> Option<&RegionId> {
        Some(&self.target)
    }

    fn values(&self) -> Vec<f64> {
        vec![self.p_fraction]
    }

    fn from_parts(
        date:   NaiveDate,
        source: RegionId,
        target: Option<RegionId>,
        values: &[f64],
    ) -> StoreResult<Self> {
        let [p_fraction] = expect_values(Self::TABLE, values)?;
        let target = expect_target(Self::TABLE, target)?;
        Ok(Self { date, source, target, p_fraction })
    }

    fn into_batch(rows: Vec<Self>) -> OutputRows {
        OutputRows::Flux(rows)
    }
}

// ── OutputRows ────────────────────────────────────────────────────────────────

/// A batch of rows bound for one table.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputRows {
    Trips(Vec<TripTotalsRow>),
    TripsMatrix(Vec<TripMatrixOutputRow>),
    Qrp(Vec<IndexRow>),
    Flux(Vec<FluxRow>),
}

/// Run `$body` with `$rows` bound to the inner `Vec` of whichever variant.
macro_rules! each_batch {
    ($batch:expr, $rows:ident => $body:expr) => {
        match $batch {
            OutputRows::Trips($rows)       => $body,
            OutputRows::TripsMatrix($rows) => $body,
            OutputRows::Qrp($rows)         => $body,
            OutputRows::Flux($rows)        => $body,
        }
    };
}
pub(crate) use each_batch;

impl OutputRows {
    /// An empty batch for `table`.
    pub fn empty(table: OutputTable) -> Self {
        match table {
            OutputTable::Trips       => OutputRows::Trips(Vec::new()),
            OutputTable::TripsMatrix => OutputRows::TripsMatrix(Vec::new()),
            OutputTable::Qrp         => OutputRows::Qrp(Vec::new()),
            OutputTable::Flux        => OutputRows::Flux(Vec::new()),
        }
    }

    pub fn table(&self) -> OutputTable {
        match self {
            OutputRows::Trips(_)       => OutputTable::Trips,
            OutputRows::TripsMatrix(_) => OutputTable::TripsMatrix,
            OutputRows::Qrp(_)         => OutputTable::Qrp,
            OutputRows::Flux(_)        => OutputTable::Flux,
        }
    }

    pub fn len(&self) -> usize {
        each_batch!(self, rows => rows.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Latest `date` in the batch.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        each_batch!(self, rows => rows.iter().map(|r| r.date()).max())
    }

    /// A copy holding only the rows `filter` accepts.
    pub fn filtered(&self, filter: &RowFilter) -> OutputRows {
        each_batch!(self, rows => filter_rows(rows, filter))
    }

    /// Append `other` to `self`.  Both must belong to the same table.
    pub(crate) fn extend_from(&mut self, other: &OutputRows) {
        match (self, other) {
            (OutputRows::Trips(a), OutputRows::Trips(b))             => a.extend_from_slice(b),
            (OutputRows::TripsMatrix(a), OutputRows::TripsMatrix(b)) => a.extend_from_slice(b),
            (OutputRows::Qrp(a), OutputRows::Qrp(b))                 => a.extend_from_slice(b),
            (OutputRows::Flux(a), OutputRows::Flux(b))               => a.extend_from_slice(b),
            (a, b) => debug_assert!(false, "batch for {} appended to {}", b.table(), a.table()),
        }
    }
}

fn filter_rows<T: TableRow>(rows: &[T], filter: &RowFilter) -> OutputRows {
    T::into_batch(
        rows.iter()
            .filter(|r| filter.matches(r.date(), r.source(), r.target()))
            .cloned()
            .collect(),
    )
}

// ── RowFilter ─────────────────────────────────────────────────────────────────

/// Row selection for [`TableStore::query`][crate::TableStore::query].
///
/// Region criteria (`regions` and `prefixes`) are alternatives: a region is
/// accepted when it equals one of `regions` or starts with one of `prefixes`.
/// On pair tables a row is kept when its source or its target is accepted.
///
/// The default filter matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowFilter {
    /// Inclusive lower bound on `date`.
    pub from:     Option<NaiveDate>,
    /// Inclusive upper bound on `date`.
    pub to:       Option<NaiveDate>,
    /// Accepted region codes.
    pub regions:  Vec<RegionId>,
    /// Accepted code prefixes: `08` for a province, `08019` for a
    /// municipality.
    pub prefixes: Vec<String>,
}

impl RowFilter {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from: Some(from), to: Some(to), ..Self::default() }
    }

    pub fn with_regions(mut self, regions: impl IntoIterator<Item = RegionId>) -> Self {
        self.regions.extend(regions);
        self
    }

    pub fn with_prefixes<P: Into<String>>(mut self, prefixes: impl IntoIterator<Item = P>) -> Self {
        self.prefixes.extend(prefixes.into_iter().map(Into::into));
        self
    }

    /// Whether any region criterion is set.
    pub fn has_region_criteria(&self) -> bool {
        !self.regions.is_empty() || !self.prefixes.is_empty()
    }

    /// Whether `region` satisfies the region criteria, ignoring dates.
    pub fn accepts_region(&self, region: &RegionId) -> bool {
        !self.has_region_criteria()
            || self.regions.contains(region)
            || self.prefixes.iter().any(|p| region.has_prefix(p))
    }

    pub fn matches(&self, date: NaiveDate, source: &RegionId, target: Option<&RegionId>) -> bool {
        self.from.is_none_or(|from| date >= from)
            && self.to.is_none_or(|to| date <= to)
            && (self.accepts_region(source) || target.is_some_and(|t| self.accepts_region(t)))
    }
}
