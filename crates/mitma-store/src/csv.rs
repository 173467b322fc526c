//! CSV backend.
//!
//! One file per table inside the configured directory:
//! - `mitma_trips.csv`
//! - `mitma_trips_matrix.csv`
//! - `mitma_qrp.csv`
//! - `mitma_flux.csv`
//!
//! The header row is written by `create_schema`; appends open the file in
//! append mode and write data rows only.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use mitma_core::{
    FluxRow, IndexRow, NaiveDate, OutputTable, TripMatrixOutputRow, TripTotalsRow, parse_date,
};

use crate::rows::{TableRow, each_batch};
use crate::store::TableStore;
use crate::{OutputRows, RowFilter, StoreError, StoreResult};

/// Writes indicator tables to CSV files in a directory.
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Use `dir` (created if absent) as the table directory.
    pub fn open(dir: &Path) -> StoreResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    pub fn path(&self, table: OutputTable) -> PathBuf {
        self.dir.join(format!("{}.csv", table.name()))
    }

    fn existing_path(&self, table: OutputTable) -> StoreResult<PathBuf> {
        let path = self.path(table);
        if path.is_file() { Ok(path) } else { Err(StoreError::MissingTable(table)) }
    }
}

impl TableStore for CsvStore {
    fn create_schema(&mut self, table: OutputTable) -> StoreResult<()> {
        let path = self.path(table);
        if path.is_file() {
            return Ok(());
        }
        let mut writer = WriterBuilder::new().has_headers(false).from_path(&path)?;
        writer.write_record(table.columns())?;
        writer.flush()?;
        debug!(table = %table, path = %path.display(), "created CSV table");
        Ok(())
    }

    fn latest_date(&self, table: OutputTable) -> StoreResult<Option<NaiveDate>> {
        let path = self.path(table);
        if !path.is_file() {
            return Ok(None);
        }
        let mut reader = ReaderBuilder::new().from_path(&path)?;
        let mut latest: Option<NaiveDate> = None;
        for record in reader.records() {
            let record = record?;
            let field = record.get(0).unwrap_or_default();
            let date = parse_date(field).map_err(|e| StoreError::Corrupt {
                table,
                message: e.to_string(),
            })?;
            latest = latest.max(Some(date));
        }
        Ok(latest)
    }

    fn append_rows(&mut self, rows: &OutputRows) -> StoreResult<()> {
        let path = self.existing_path(rows.table())?;
        if rows.is_empty() {
            return Ok(());
        }

        // Serialize the whole batch first so a bad row never leaves a
        // half-written batch behind.
        let mut buffer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
        each_batch!(rows, batch => {
            for row in batch {
                buffer.serialize(row)?;
            }
        });
        let bytes = buffer.into_inner().map_err(|e| StoreError::Io(e.into_error()))?;

        let file = OpenOptions::new().append(true).open(&path)?;
        let mut out = BufWriter::new(file);
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }

    fn query(&self, table: OutputTable, filter: &RowFilter) -> StoreResult<OutputRows> {
        let path = self.existing_path(table)?;
        match table {
            OutputTable::Trips       => read_rows::<TripTotalsRow>(&path, filter),
            OutputTable::TripsMatrix => read_rows::<TripMatrixOutputRow>(&path, filter),
            OutputTable::Qrp         => read_rows::<IndexRow>(&path, filter),
            OutputTable::Flux        => read_rows::<FluxRow>(&path, filter),
        }
    }

    fn drop_table(&mut self, table: OutputTable) -> StoreResult<()> {
        match fs::remove_file(self.path(table)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

fn read_rows<T: TableRow>(path: &Path, filter: &RowFilter) -> StoreResult<OutputRows> {
    let mut reader = ReaderBuilder::new().from_reader(File::open(path)?);
    let mut rows = Vec::new();
    for result in reader.deserialize::<T>() {
        let row = result?;
        if filter.matches(row.date(), row.source(), row.target()) {
            rows.push(row);
        }
    }
    Ok(T::into_batch(rows))
}
