//! Source-file parsing.
//!
//! # Trip file
//!
//! ```text
//! fecha|origen|destino|actividad_origen|actividad_destino|residencia|edad|periodo|distancia|viajes|viajes_km
//! 20200301|0100101|0100101|casa|otros|01|NA|00|0005-010|4.106|31.21
//! ```
//!
//! Only `origen`, `destino`, `actividad_origen` and `viajes` are read; the
//! English headers `origin`, `destination`, `origin_activity`, `trips` are
//! accepted too.  An empty `viajes` counts as zero trips.
//!
//! # Population file
//!
//! ```text
//! fecha|distrito|numero_viajes|personas
//! 20200301|0100101|0|1520.3
//! 20200301|0100101|2+|2880.1
//! ```
//!
//! English headers: `region`, `trip_count_bucket`, `person_count`.
//!
//! Region codes are always read as text so leading zeros survive.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use serde::Deserialize;

use mitma_core::{PopulationRow, RawTripRow, RegionId};

use crate::{SourceError, SourceResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TripRecord {
    #[serde(alias = "origin")]
    origen:           String,
    #[serde(alias = "destination")]
    destino:          String,
    #[serde(alias = "origin_activity")]
    actividad_origen: String,
    #[serde(alias = "trips")]
    viajes:           Option<f64>,
}

#[derive(Deserialize)]
struct PopulationRecord {
    #[serde(alias = "region")]
    distrito:      String,
    #[serde(alias = "trip_count_bucket")]
    numero_viajes: String,
    #[serde(alias = "person_count")]
    personas:      f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Open a source file, transparently decompressing `*.gz`.
pub fn open_source(path: &Path) -> SourceResult<Box<dyn Read>> {
    let file = BufReader::new(File::open(path)?);
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz")) {
        Ok(Box::new(MultiGzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Load every row of a trip file.
pub fn load_trips_file(path: &Path) -> SourceResult<Vec<RawTripRow>> {
    load_trips_reader(open_source(path)?).map_err(|e| in_file(e, path))
}

/// Like [`load_trips_file`] but accepts any `Read` source.
pub fn load_trips_reader<R: Read>(reader: R) -> SourceResult<Vec<RawTripRow>> {
    let mut rows = Vec::new();
    for (line, result) in pipe_reader(reader).deserialize::<TripRecord>().enumerate() {
        let record = result.map_err(|e| SourceError::Parse(e.to_string()))?;
        let trips = record.viajes.unwrap_or(0.0);
        rows.push(RawTripRow {
            origin:          region(&record.origen, line)?,
            destination:     region(&record.destino, line)?,
            origin_activity: record.actividad_origen,
            trips:           count(trips, "viajes", line)?,
        });
    }
    Ok(rows)
}

/// Load every row of a population file.
pub fn load_population_file(path: &Path) -> SourceResult<Vec<PopulationRow>> {
    load_population_reader(open_source(path)?).map_err(|e| in_file(e, path))
}

/// Like [`load_population_file`] but accepts any `Read` source.
pub fn load_population_reader<R: Read>(reader: R) -> SourceResult<Vec<PopulationRow>> {
    let mut rows = Vec::new();
    for (line, result) in pipe_reader(reader).deserialize::<PopulationRecord>().enumerate() {
        let record = result.map_err(|e| SourceError::Parse(e.to_string()))?;
        rows.push(PopulationRow {
            region:            region(&record.distrito, line)?,
            trip_count_bucket: record.numero_viajes,
            person_count:      count(record.personas, "personas", line)?,
        });
    }
    Ok(rows)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn pipe_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'|')
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// `line` is the zero-based record index; the header is line 1 of the file.
fn region(code: &str, line: usize) -> SourceResult<RegionId> {
    RegionId::new(code)
        .map_err(|e| SourceError::Parse(format!("record {}: {e}", line + 1)))
}

fn count(value: f64, column: &str, line: usize) -> SourceResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SourceError::Parse(format!(
            "record {}: {column} must be a non-negative number, got {value}",
            line + 1
        )))
    }
}

fn in_file(err: SourceError, path: &Path) -> SourceError {
    match err {
        SourceError::Parse(msg) => SourceError::Parse(format!("{}: {msg}", path.display())),
        other => other,
    }
}
