//! Output table catalogue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MitmaError;

/// One of the four indicator tables.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum OutputTable {
    Trips,
    TripsMatrix,
    Qrp,
    Flux,
}

impl OutputTable {
    pub const ALL: [OutputTable; 4] = [
        OutputTable::Trips,
        OutputTable::TripsMatrix,
        OutputTable::Qrp,
        OutputTable::Flux,
    ];

    /// The table name in storage.
    pub fn name(self) -> &'static str {
        match self {
            OutputTable::Trips       => "mitma_trips",
            OutputTable::TripsMatrix => "mitma_trips_matrix",
            OutputTable::Qrp         => "mitma_qrp",
            OutputTable::Flux        => "mitma_flux",
        }
    }

    /// Column names in storage order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            OutputTable::Trips => {
                &["date", "source", "trips_outgoing", "trips_incoming", "trips_internal"]
            }
            OutputTable::TripsMatrix => &["date", "source", "target", "trips"],
            OutputTable::Qrp         => &["date", "source", "q", "r", "p"],
            OutputTable::Flux        => &["date", "source", "target", "p_fraction"],
        }
    }

    /// Whether rows are keyed by a (source, target) pair.
    pub fn has_target(self) -> bool {
        matches!(self, OutputTable::TripsMatrix | OutputTable::Flux)
    }

    /// The group whose computation fills this table.
    pub fn group(self) -> OutputGroup {
        match self {
            OutputTable::Trips               => OutputGroup::Trips,
            OutputTable::TripsMatrix         => OutputGroup::Matrix,
            OutputTable::Qrp | OutputTable::Flux => OutputGroup::Qrp,
        }
    }
}

impl fmt::Display for OutputTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for OutputTable {
    type Err = MitmaError;

    /// Accepts the storage name (`mitma_qrp`) or the short form (`qrp`).
    fn from_str(s: &str) -> Result<Self, MitmaError> {
        let key = s.trim().to_ascii_lowercase();
        let key = key.strip_prefix("mitma_").unwrap_or(&key);
        match key {
            "trips"        => Ok(OutputTable::Trips),
            "trips_matrix" => Ok(OutputTable::TripsMatrix),
            "qrp"          => Ok(OutputTable::Qrp),
            "flux"         => Ok(OutputTable::Flux),
            _ => Err(MitmaError::Config(format!("unknown table {s:?}"))),
        }
    }
}

/// A unit of computation and the tables it fills.
///
/// | Group    | Input                   | Tables                        |
/// |----------|-------------------------|-------------------------------|
/// | `Qrp`    | from-home matrix + population | `mitma_qrp`, `mitma_flux` |
/// | `Trips`  | full trip file          | `mitma_trips`                 |
/// | `Matrix` | full trip file          | `mitma_trips_matrix`          |
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputGroup {
    Qrp,
    Trips,
    Matrix,
}

impl OutputGroup {
    pub const ALL: [OutputGroup; 3] = [OutputGroup::Qrp, OutputGroup::Trips, OutputGroup::Matrix];

    /// The table whose latest stored day marks the group as done.  It is
    /// written last, after the other tables of the group.
    pub fn primary(self) -> OutputTable {
        match self {
            OutputGroup::Qrp    => OutputTable::Qrp,
            OutputGroup::Trips  => OutputTable::Trips,
            OutputGroup::Matrix => OutputTable::TripsMatrix,
        }
    }

    pub fn tables(self) -> &'static [OutputTable] {
        match self {
            OutputGroup::Qrp    => &[OutputTable::Qrp, OutputTable::Flux],
            OutputGroup::Trips  => &[OutputTable::Trips],
            OutputGroup::Matrix => &[OutputTable::TripsMatrix],
        }
    }
}

impl FromStr for OutputGroup {
    type Err = MitmaError;

    fn from_str(s: &str) -> Result<Self, MitmaError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qrp" | "flux" => Ok(OutputGroup::Qrp),
            "trips"        => Ok(OutputGroup::Trips),
            "matrix" | "trips_matrix" => Ok(OutputGroup::Matrix),
            _ => Err(MitmaError::Config(format!(
                "unknown output group {s:?}: expected \"qrp\", \"trips\", or \"matrix\""
            ))),
        }
    }
}
