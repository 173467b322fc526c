//! The `TableStore` trait implemented by every backend.

use mitma_core::{NaiveDate, OutputTable};

use crate::{OutputRows, RowFilter, StoreResult};

/// Durable, append-only storage of the indicator tables.
///
/// The runner relies on three guarantees:
///
/// - `append_rows` never requires the table to be empty and may be called any
///   number of times per run;
/// - `latest_date` returns the single greatest stored `date`, or `None` for an
///   empty or absent table;
/// - a failed `append_rows` leaves none of that batch visible.
pub trait TableStore {
    /// Create `table` if it does not exist.  Idempotent.
    fn create_schema(&mut self, table: OutputTable) -> StoreResult<()>;

    /// Greatest `date` stored in `table`.
    fn latest_date(&self, table: OutputTable) -> StoreResult<Option<NaiveDate>>;

    /// Append a batch to the table it belongs to.
    fn append_rows(&mut self, rows: &OutputRows) -> StoreResult<()>;

    /// Rows of `table` accepted by `filter`, in insertion order.
    fn query(&self, table: OutputTable, filter: &RowFilter) -> StoreResult<OutputRows>;

    /// Remove `table` and all its rows.  Idempotent.
    fn drop_table(&mut self, table: OutputTable) -> StoreResult<()>;
}

impl<S: TableStore + ?Sized> TableStore for Box<S> {
    fn create_schema(&mut self, table: OutputTable) -> StoreResult<()> {
        (**self).create_schema(table)
    }

    fn latest_date(&self, table: OutputTable) -> StoreResult<Option<NaiveDate>> {
        (**self).latest_date(table)
    }

    fn append_rows(&mut self, rows: &OutputRows) -> StoreResult<()> {
        (**self).append_rows(rows)
    }

    fn query(&self, table: OutputTable, filter: &RowFilter) -> StoreResult<OutputRows> {
        (**self).query(table, filter)
    }

    fn drop_table(&mut self, table: OutputTable) -> StoreResult<()> {
        (**self).drop_table(table)
    }
}
