//! In-process backend.  Used by tests and dry runs.

use std::collections::BTreeMap;

use mitma_core::{NaiveDate, OutputTable};

use crate::store::TableStore;
use crate::{OutputRows, RowFilter, StoreError, StoreResult};

/// Keeps every table in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: BTreeMap<OutputTable, OutputRows>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows of `table`, if it exists.
    pub fn rows(&self, table: OutputTable) -> Option<&OutputRows> {
        self.tables.get(&table)
    }
}

impl TableStore for MemoryStore {
    fn create_schema(&mut self, table: OutputTable) -> StoreResult<()> {
        self.tables.entry(table).or_insert_with(|| OutputRows::empty(table));
        Ok(())
    }

    fn latest_date(&self, table: OutputTable) -> StoreResult<Option<NaiveDate>> {
        Ok(self.tables.get(&table).and_then(OutputRows::latest_date))
    }

    fn append_rows(&mut self, rows: &OutputRows) -> StoreResult<()> {
        let table = rows.table();
        let stored = self.tables.get_mut(&table).ok_or(StoreError::MissingTable(table))?;
        stored.extend_from(rows);
        Ok(())
    }

    fn query(&self, table: OutputTable, filter: &RowFilter) -> StoreResult<OutputRows> {
        let stored = self.tables.get(&table).ok_or(StoreError::MissingTable(table))?;
        Ok(stored.filtered(filter))
    }

    fn drop_table(&mut self, table: OutputTable) -> StoreResult<()> {
        self.tables.remove(&table);
        Ok(())
    }
}
