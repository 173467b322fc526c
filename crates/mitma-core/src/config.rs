//! Pipeline configuration.
//!
//! Loaded from a JSON file by the application crate (or built in code) and
//! handed to the runner at construction.  Every field has a default so a
//! config file only needs to list what differs.
//!
//! ```json
//! {
//!   "trips_dir": "data/MITMA/maestra_1_mitma_distritos",
//!   "population_dir": "data/MITMA/maestra_2_mitma_distritos",
//!   "store": { "kind": "sqlite", "path": "mitma.db" },
//!   "outputs": ["qrp", "trips", "matrix"],
//!   "end_date": "2020-06-01"
//! }
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{MitmaError, MitmaResult, OutputGroup, OutputTable};

/// Origin-activity labels counted as "home" by the from-home filter.
///
/// The raw MITMA files label home as `casa`; re-exported data sets use
/// `home`.  Matching is ASCII case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HomeLabels(pub Vec<String>);

impl HomeLabels {
    pub fn matches(&self, label: &str) -> bool {
        let label = label.trim();
        self.0.iter().any(|l| l.eq_ignore_ascii_case(label))
    }
}

impl Default for HomeLabels {
    fn default() -> Self {
        Self(vec!["casa".to_owned(), "home".to_owned()])
    }
}

/// Where the indicator tables live.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// A single SQLite database file.
    Sqlite { path: PathBuf },
    /// One `<table>.csv` per table inside `dir`.
    Csv { dir: PathBuf },
    /// Process-local tables, lost on exit.
    Memory,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Sqlite { path: PathBuf::from("mitma.db") }
    }
}

/// Top-level pipeline configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory of daily trip-matrix files (`YYYYMMDD_maestra_1_…`).
    pub trips_dir: PathBuf,

    /// Directory of daily population files (`YYYYMMDD_maestra_2_…`).
    pub population_dir: PathBuf,

    pub home_labels: HomeLabels,

    pub store: StoreConfig,

    /// Enabled output groups.  Empty is rejected by [`validate`][Self::validate].
    pub outputs: Vec<OutputGroup>,

    /// First day to process.  When unset the runner resumes from the stored
    /// watermark.
    pub start_date: Option<NaiveDate>,

    /// Exclusive stop: processing halts before this day.  When unset the
    /// runner processes through the last available file.
    pub end_date: Option<NaiveDate>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            trips_dir:      PathBuf::from("data/maestra_1_mitma_distritos"),
            population_dir: PathBuf::from("data/maestra_2_mitma_distritos"),
            home_labels:    HomeLabels::default(),
            store:          StoreConfig::default(),
            outputs:        OutputGroup::ALL.to_vec(),
            start_date:     None,
            end_date:       None,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file.  Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> MitmaResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Reject settings that can never produce a run.
    pub fn validate(&self) -> MitmaResult<()> {
        if self.outputs.is_empty() {
            return Err(MitmaError::Config("no output groups enabled".into()));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end <= start {
                return Err(MitmaError::Config(format!(
                    "end_date {end} must be after start_date {start}"
                )));
            }
        }
        Ok(())
    }

    /// Enabled tables, deduplicated, in a stable order.
    pub fn tables(&self) -> Vec<OutputTable> {
        let mut tables: Vec<OutputTable> = self
            .outputs
            .iter()
            .flat_map(|g| g.tables().iter().copied())
            .collect();
        tables.sort();
        tables.dedup();
        tables
    }
}
