//! `mitma-store` — append-only storage of the indicator tables.
//!
//! Three backends implement [`TableStore`]:
//!
//! | Feature   | Backend     | Layout                                                  |
//! |-----------|-------------|---------------------------------------------------------|
//! | *(none)*  | Memory      | process-local, lost on exit                             |
//! | *(none)*  | CSV         | `<dir>/mitma_trips.csv`, `<dir>/mitma_qrp.csv`, …       |
//! | `sqlite`  | SQLite      | one database file, one table per output                 |
//!
//! Rows travel as an [`OutputRows`] batch tagged with their table, so a
//! backend never sees a row for the wrong table.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mitma_store::{open_store, RowFilter, TableStore};
//!
//! let mut store = open_store(&config.store)?;
//! store.create_schema(OutputTable::Qrp)?;
//! let latest = store.latest_date(OutputTable::Qrp)?;
//! let rows = store.query(OutputTable::Qrp, &RowFilter::default())?;
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod rows;
pub mod store;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use crate::csv::CsvStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use rows::{OutputRows, RowFilter, TableRow};
pub use store::TableStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use mitma_core::StoreConfig;

/// Open the backend described by `config`.
pub fn open_store(config: &StoreConfig) -> StoreResult<Box<dyn TableStore>> {
    match config {
        StoreConfig::Memory => Ok(Box::new(MemoryStore::new())),
        StoreConfig::Csv { dir } => Ok(Box::new(CsvStore::open(dir)?)),
        #[cfg(feature = "sqlite")]
        StoreConfig::Sqlite { path } => Ok(Box::new(SqliteStore::open(path)?)),
        #[cfg(not(feature = "sqlite"))]
        StoreConfig::Sqlite { .. } => Err(StoreError::Unsupported("sqlite")),
    }
}
