//! SQLite backend (feature `sqlite`).
//!
//! All four tables live in one database file.  Each table carries a
//! surrogate `parameter_id` key, an ISO-8601 `date` TEXT column (so `MAX`
//! and range filters compare correctly), the region columns as TEXT, and the
//! indicator values as REAL.  Every table gets an index on `date` for the
//! watermark lookup.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params_from_iter};
use tracing::debug;

use mitma_core::{
    FluxRow, IndexRow, NaiveDate, OutputTable, RegionId, TripMatrixOutputRow, TripTotalsRow,
    parse_date,
};

use crate::rows::{TableRow, each_batch};
use crate::store::TableStore;
use crate::{OutputRows, RowFilter, StoreError, StoreResult};

/// Writes indicator tables to an SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// A private in-memory database.
    pub fn in_memory() -> StoreResult<Self> {
        Ok(Self { conn: Connection::open_in_memory()? })
    }

    fn table_exists(&self, table: OutputTable) -> StoreResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table.name()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn require_table(&self, table: OutputTable) -> StoreResult<()> {
        if self.table_exists(table)? { Ok(()) } else { Err(StoreError::MissingTable(table)) }
    }

    fn insert<T: TableRow>(&mut self, rows: &[T]) -> StoreResult<()> {
        let table = T::TABLE;
        let columns = table.columns();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.name(),
            columns.join(", "),
            placeholders.join(", "),
        );

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&sql)?;
            for row in rows {
                let mut values: Vec<Value> = Vec::with_capacity(columns.len());
                values.push(Value::Text(row.date().to_string()));
                values.push(Value::Text(row.source().to_string()));
                if let Some(target) = row.target() {
                    values.push(Value::Text(target.to_string()));
                }
                values.extend(row.values().into_iter().map(Value::Real));
                stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn select<T: TableRow>(&self, filter: &RowFilter) -> StoreResult<OutputRows> {
        let table = T::TABLE;
        let columns = table.columns();

        let mut sql = format!("SELECT {} FROM {} WHERE 1 = 1", columns.join(", "), table.name());
        let mut params: Vec<Value> = Vec::new();
        if let Some(from) = filter.from {
            params.push(Value::Text(from.to_string()));
            sql.push_str(&format!(" AND date >= ?{}", params.len()));
        }
        if let Some(to) = filter.to {
            params.push(Value::Text(to.to_string()));
            sql.push_str(&format!(" AND date <= ?{}", params.len()));
        }
        if filter.has_region_criteria() {
            let mut sides = vec!["source"];
            if table.has_target() {
                sides.push("target");
            }
            let mut alternatives = Vec::new();
            for column in sides {
                alternatives.extend(region_predicates(column, filter, &mut params));
            }
            sql.push_str(&format!(" AND ({})", alternatives.join(" OR ")));
        }
        sql.push_str(" ORDER BY parameter_id");

        let has_target = table.has_target();
        let first_value = if has_target { 3 } else { 2 };

        let mut stmt = self.conn.prepare(&sql)?;
        let raw = stmt
            .query_map(params_from_iter(params), |row| {
                let date: String = row.get(0)?;
                let source: String = row.get(1)?;
                let target: Option<String> = if has_target { Some(row.get(2)?) } else { None };
                let values = (first_value..columns.len())
                    .map(|i| row.get::<_, f64>(i))
                    .collect::<rusqlite::Result<Vec<f64>>>()?;
                Ok((date, source, target, values))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let corrupt = |message: String| StoreError::Corrupt { table, message };
        let mut rows = Vec::with_capacity(raw.len());
        for (date, source, target, values) in raw {
            let date = parse_date(&date).map_err(|e| corrupt(e.to_string()))?;
            let source = RegionId::new(&source).map_err(|e| corrupt(e.to_string()))?;
            let target = target
                .map(|t| RegionId::new(&t))
                .transpose()
                .map_err(|e| corrupt(e.to_string()))?;
            rows.push(T::from_parts(date, source, target, &values)?);
        }
        Ok(T::into_batch(rows))
    }
}

/// One SQL predicate per region criterion on `column`, binding into `params`.
fn region_predicates(column: &str, filter: &RowFilter, params: &mut Vec<Value>) -> Vec<String> {
    let mut predicates = Vec::new();
    if !filter.regions.is_empty() {
        let mut slots = Vec::with_capacity(filter.regions.len());
        for region in &filter.regions {
            params.push(Value::Text(region.to_string()));
            slots.push(format!("?{}", params.len()));
        }
        predicates.push(format!("{column} IN ({})", slots.join(", ")));
    }
    for prefix in &filter.prefixes {
        params.push(Value::Text(prefix.clone()));
        let n = params.len();
        predicates.push(format!("substr({column}, 1, length(?{n})) = ?{n}"));
    }
    predicates
}

impl TableStore for SqliteStore {
    fn create_schema(&mut self, table: OutputTable) -> StoreResult<()> {
        let columns: Vec<String> = table
            .columns()
            .iter()
            .map(|&c| match c {
                "date" | "source" | "target" => format!("{c} TEXT NOT NULL"),
                _ => format!("{c} REAL NOT NULL"),
            })
            .collect();
        let name = table.name();
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {name} (
                 parameter_id INTEGER PRIMARY KEY,
                 {}
             );
             CREATE INDEX IF NOT EXISTS {name}_date ON {name} (date);",
            columns.join(",\n                 "),
        ))?;
        debug!(table = %table, "ensured SQLite table");
        Ok(())
    }

    fn latest_date(&self, table: OutputTable) -> StoreResult<Option<NaiveDate>> {
        if !self.table_exists(table)? {
            return Ok(None);
        }
        let latest: Option<String> = self.conn.query_row(
            &format!("SELECT MAX(date) FROM {}", table.name()),
            [],
            |row| row.get(0),
        )?;
        latest
            .map(|s| parse_date(&s))
            .transpose()
            .map_err(|e| StoreError::Corrupt { table, message: e.to_string() })
    }

    fn append_rows(&mut self, rows: &OutputRows) -> StoreResult<()> {
        self.require_table(rows.table())?;
        if rows.is_empty() {
            return Ok(());
        }
        each_batch!(rows, batch => self.insert(batch))
    }

    fn query(&self, table: OutputTable, filter: &RowFilter) -> StoreResult<OutputRows> {
        self.require_table(table)?;
        match table {
            OutputTable::Trips       => self.select::<TripTotalsRow>(filter),
            OutputTable::TripsMatrix => self.select::<TripMatrixOutputRow>(filter),
            OutputTable::Qrp         => self.select::<IndexRow>(filter),
            OutputTable::Flux        => self.select::<FluxRow>(filter),
        }
    }

    fn drop_table(&mut self, table: OutputTable) -> StoreResult<()> {
        self.conn.execute_batch(&format!("DROP TABLE IF EXISTS {}", table.name()))?;
        Ok(())
    }
}
