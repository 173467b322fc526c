//! The q/r/p mobility indexes.
//!
//! For a region `R` on one day:
//!
//! ```text
//! q  = people making no trips / all sampled people          (population file)
//! nq = 1 - q
//! r  = nq * within(R) / (within(R) + cross(R))              (from-home matrix)
//! p  = nq - r
//! ```
//!
//! `within(R)` sums trips from `R` to `R`; `cross(R)` sums trips from `R` to
//! any other region.  When the matrix has no trips at all for `R` the whole
//! moving share is attributed to cross-region movement: `r = 0`, `p = nq`.
//!
//! By construction `q + r + p == 1` up to rounding.

use std::collections::BTreeMap;

use mitma_core::{IndexRow, NaiveDate, PopulationRow, RegionId, TripMatrixRow};
use rustc_hash::FxHashMap;

use crate::{IndicatorError, IndicatorResult};

// ── Types ─────────────────────────────────────────────────────────────────────

/// Mobility indexes of one region.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Qrp {
    pub q: f64,
    pub r: f64,
    pub p: f64,
}

impl Qrp {
    /// Combine the population split and the trip split of one region.
    ///
    /// # Errors
    ///
    /// [`IndicatorError::DegenerateRegion`] when `stayed + moved` is zero.
    pub fn from_counts(
        region: &RegionId,
        stayed: f64,
        moved:  f64,
        split:  TripSplit,
    ) -> IndicatorResult<Qrp> {
        let sampled = stayed + moved;
        if !(sampled > 0.0) {
            return Err(IndicatorError::DegenerateRegion { region: region.clone() });
        }

        let q = stayed / sampled;
        let nq = 1.0 - q;

        let trips = split.within + split.cross;
        let r = if trips > 0.0 { split.within / trips * nq } else { 0.0 };

        Ok(Qrp { q, r, p: nq - r })
    }
}

/// From-home trips leaving one region, split by destination.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TripSplit {
    /// Trips whose destination is the origin region itself.
    pub within: f64,
    /// Trips to any other region.
    pub cross:  f64,
}

impl TripSplit {
    /// Per-origin splits of a day's matrix.  Origins without rows are absent;
    /// callers treat them as `TripSplit::default()`.
    pub fn by_origin(matrix: &[TripMatrixRow]) -> FxHashMap<&RegionId, TripSplit> {
        let mut splits: FxHashMap<&RegionId, TripSplit> = FxHashMap::default();
        for row in matrix {
            let split = splits.entry(&row.origin).or_default();
            if row.is_internal() {
                split.within += row.trip_count;
            } else {
                split.cross += row.trip_count;
            }
        }
        splits
    }
}

/// The result of computing one day's indexes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexOutcome {
    /// One entry per region with a non-zero sampled population, sorted.
    pub indexes:    BTreeMap<RegionId, Qrp>,
    /// Regions present in the population file whose counts sum to zero.
    pub degenerate: Vec<RegionId>,
}

impl IndexOutcome {
    /// Output rows for `mitma_qrp`, tagged with `date`.
    pub fn to_rows(&self, date: NaiveDate) -> Vec<IndexRow> {
        self.indexes
            .iter()
            .map(|(region, qrp)| IndexRow {
                date,
                source: region.clone(),
                q:      qrp.q,
                r:      qrp.r,
                p:      qrp.p,
            })
            .collect()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Compute q/r/p for every region that appears in `population`.
///
/// Degenerate regions are collected in [`IndexOutcome::degenerate`] instead
/// of failing the whole day.
pub fn compute_indexes(population: &[PopulationRow], matrix: &[TripMatrixRow]) -> IndexOutcome {
    // (stayed, moved) per region
    let mut counts: BTreeMap<&RegionId, (f64, f64)> = BTreeMap::new();
    for row in population {
        let entry = counts.entry(&row.region).or_insert((0.0, 0.0));
        if row.made_no_trips() {
            entry.0 += row.person_count;
        } else {
            entry.1 += row.person_count;
        }
    }

    let splits = TripSplit::by_origin(matrix);

    let mut outcome = IndexOutcome::default();
    for (region, (stayed, moved)) in counts {
        let split = splits.get(region).copied().unwrap_or_default();
        match Qrp::from_counts(region, stayed, moved, split) {
            Ok(qrp) => {
                outcome.indexes.insert(region.clone(), qrp);
            }
            Err(IndicatorError::DegenerateRegion { region }) => outcome.degenerate.push(region),
        }
    }
    outcome
}

/// Compute q/r/p for a single region.
///
/// Scans both inputs; prefer [`compute_indexes`] for whole days.
pub fn region_index(
    region:     &RegionId,
    population: &[PopulationRow],
    matrix:     &[TripMatrixRow],
) -> IndicatorResult<Qrp> {
    let (stayed, moved) = population
        .iter()
        .filter(|row| &row.region == region)
        .fold((0.0, 0.0), |(stayed, moved), row| {
            if row.made_no_trips() {
                (stayed + row.person_count, moved)
            } else {
                (stayed, moved + row.person_count)
            }
        });

    let split = matrix
        .iter()
        .filter(|row| &row.origin == region)
        .fold(TripSplit::default(), |mut split, row| {
            if row.is_internal() {
                split.within += row.trip_count;
            } else {
                split.cross += row.trip_count;
            }
            split
        });

    Qrp::from_counts(region, stayed, moved, split)
}
