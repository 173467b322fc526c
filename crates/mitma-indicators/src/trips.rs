//! Trip aggregation.
//!
//! The raw trip file holds one row per (origin, destination, activities,
//! residence, age, hour, distance band).  Everything downstream only cares
//! about region pairs, so rows are summed by `(origin, destination)` here.
//!
//! Outputs are sorted by region code so repeated runs write identical
//! tables.

use std::collections::BTreeMap;

use mitma_core::{
    HomeLabels, NaiveDate, RawTripRow, RegionId, TripMatrixOutputRow, TripMatrixRow,
    TripTotalsRow,
};
use rustc_hash::FxHashMap;

// ── Public API ────────────────────────────────────────────────────────────────

/// Trips that started at home, summed per `(origin, destination)`.
///
/// This is the canonical input of the q/r/p indexes and the flux table.
pub fn from_home_matrix(raw: &[RawTripRow], home: &HomeLabels) -> Vec<TripMatrixRow> {
    let pairs = sum_pairs(raw.iter().filter(|row| home.matches(&row.origin_activity)));
    pairs
        .into_iter()
        .map(|((origin, destination), trip_count)| TripMatrixRow {
            origin:      origin.clone(),
            destination: destination.clone(),
            trip_count,
        })
        .collect()
}

/// Per-region outgoing, incoming and internal totals over all trips.
///
/// A region that shows up in only some of the three groupings gets `0.0`
/// for the others.
pub fn trip_totals(raw: &[RawTripRow], date: NaiveDate) -> Vec<TripTotalsRow> {
    #[derive(Default)]
    struct Totals {
        outgoing: f64,
        incoming: f64,
        internal: f64,
    }

    let mut by_region: BTreeMap<&RegionId, Totals> = BTreeMap::new();
    for row in raw {
        if row.origin == row.destination {
            by_region.entry(&row.origin).or_default().internal += row.trips;
        } else {
            by_region.entry(&row.origin).or_default().outgoing += row.trips;
            by_region.entry(&row.destination).or_default().incoming += row.trips;
        }
    }

    by_region
        .into_iter()
        .map(|(region, t)| TripTotalsRow {
            date,
            source:         region.clone(),
            trips_outgoing: t.outgoing,
            trips_incoming: t.incoming,
            trips_internal: t.internal,
        })
        .collect()
}

/// All trips between each region pair, self-pairs included.
pub fn trip_matrix(raw: &[RawTripRow], date: NaiveDate) -> Vec<TripMatrixOutputRow> {
    sum_pairs(raw.iter())
        .into_iter()
        .map(|((source, target), trips)| TripMatrixOutputRow {
            date,
            source: source.clone(),
            target: target.clone(),
            trips,
        })
        .collect()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Sum `trips` per `(origin, destination)` and return the pairs sorted.
fn sum_pairs<'a>(
    rows: impl Iterator<Item = &'a RawTripRow>,
) -> Vec<((&'a RegionId, &'a RegionId), f64)> {
    let mut sums: FxHashMap<(&RegionId, &RegionId), f64> = FxHashMap::default();
    for row in rows {
        *sums.entry((&row.origin, &row.destination)).or_insert(0.0) += row.trips;
    }
    let mut pairs: Vec<_> = sums.into_iter().collect();
    pairs.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    pairs
}
