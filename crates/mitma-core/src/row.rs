//! Plain data row types.
//!
//! Input rows are what one day's source files boil down to; output rows are
//! what gets appended to the four indicator tables.  Output rows carry their
//! own `date` so a batch can be written without any surrounding context.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::RegionId;

// ── Inputs ────────────────────────────────────────────────────────────────────

/// One record of the daily trip file, reduced to the columns the indicators
/// use.  Finer-grained attributes (hour, distance band, residence, age) are
/// summed away by the aggregator.
#[derive(Clone, Debug, PartialEq)]
pub struct RawTripRow {
    pub origin:          RegionId,
    pub destination:     RegionId,
    /// Activity at the origin, as labelled in the source (`casa`, `trabajo_estudio`, …).
    pub origin_activity: String,
    pub trips:           f64,
}

/// Sampled people of one region falling into one trip-count bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct PopulationRow {
    pub region:            RegionId,
    /// `"0"` means the people in this bucket made no trips; `"1"`, `"2"`,
    /// `"2+"` and anything else mean at least one.
    pub trip_count_bucket: String,
    pub person_count:      f64,
}

impl PopulationRow {
    /// The bucket label for people who stayed put.
    pub const ZERO_TRIPS: &'static str = "0";

    #[inline]
    pub fn made_no_trips(&self) -> bool {
        self.trip_count_bucket.trim() == Self::ZERO_TRIPS
    }
}

/// Trips from `origin` to `destination` for one day, already summed over all
/// finer-grained attributes.  At most one row per pair.
#[derive(Clone, Debug, PartialEq)]
pub struct TripMatrixRow {
    pub origin:      RegionId,
    pub destination: RegionId,
    pub trip_count:  f64,
}

impl TripMatrixRow {
    #[inline]
    pub fn is_internal(&self) -> bool {
        self.origin == self.destination
    }
}

// ── Outputs ───────────────────────────────────────────────────────────────────

/// `mitma_qrp` — mobility indexes of one region.  `q + r + p == 1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexRow {
    pub date:   NaiveDate,
    pub source: RegionId,
    /// Share of the population making no trips.
    pub q:      f64,
    /// Share moving only within its own region.
    pub r:      f64,
    /// Share moving to other regions.
    pub p:      f64,
}

/// `mitma_flux` — share of `source`'s cross-region trips that go to `target`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FluxRow {
    pub date:       NaiveDate,
    pub source:     RegionId,
    pub target:     RegionId,
    pub p_fraction: f64,
}

/// `mitma_trips` — per-region trip totals.  Missing groupings are zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripTotalsRow {
    pub date:           NaiveDate,
    pub source:         RegionId,
    pub trips_outgoing: f64,
    pub trips_incoming: f64,
    pub trips_internal: f64,
}

/// `mitma_trips_matrix` — all trips between a pair, self-pairs included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripMatrixOutputRow {
    pub date:   NaiveDate,
    pub source: RegionId,
    pub target: RegionId,
    pub trips:  f64,
}
