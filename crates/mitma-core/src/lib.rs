//! `mitma-core` — foundational types for the MITMA mobility indicator pipeline.
//!
//! This crate is a dependency of every other `mitma-*` crate.  It has no
//! `mitma-*` dependencies and only a handful of external ones (`chrono`,
//! `serde`, `serde_json`, `thiserror`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`region`]   | `RegionId` — zero-padding-safe region code                   |
//! | [`date`]     | `parse_date`, `date_stem`, `next_day`                        |
//! | [`row`]      | raw input rows and the four output row types                 |
//! | [`table`]    | `OutputTable`, `OutputGroup`                                 |
//! | [`config`]   | `PipelineConfig`, `StoreConfig`, `HomeLabels`                |
//! | [`error`]    | `MitmaError`, `MitmaResult`                                  |

pub mod config;
pub mod date;
pub mod error;
pub mod region;
pub mod row;
pub mod table;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use chrono::NaiveDate;
pub use config::{HomeLabels, PipelineConfig, StoreConfig};
pub use date::{date_stem, next_day, parse_date};
pub use error::{MitmaError, MitmaResult};
pub use region::RegionId;
pub use row::{
    FluxRow, IndexRow, PopulationRow, RawTripRow, TripMatrixOutputRow, TripMatrixRow,
    TripTotalsRow,
};
pub use table::{OutputGroup, OutputTable};
