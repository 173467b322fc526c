//! `mitma-source` — daily source files.
//!
//! Each day is described by two files whose names start with the same
//! 8-digit `YYYYMMDD` stem:
//!
//! | Directory        | Example file name                           | Contents            |
//! |------------------|---------------------------------------------|---------------------|
//! | `trips_dir`      | `20200301_maestra_1_mitma_distrito.txt.gz`  | origin-destination trips |
//! | `population_dir` | `20200301_maestra_2_mitma_distrito.txt.gz`  | people per trip-count bucket |
//!
//! Files are `|`-separated with a header row, optionally gzip-compressed.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`catalog`] | `SourceCatalog`, `DayFiles`, `Missing`, `date_from_file_name` |
//! | [`reader`]  | `load_trips_*`, `load_population_*`, `open_source`      |
//! | [`error`]   | `SourceError`, `SourceResult<T>`                        |

pub mod catalog;
pub mod error;
pub mod reader;

#[cfg(test)]
mod tests;

pub use catalog::{DayFiles, Missing, SourceCatalog, date_from_file_name};
pub use error::{SourceError, SourceResult};
pub use reader::{
    load_population_file, load_population_reader, load_trips_file, load_trips_reader, open_source,
};
