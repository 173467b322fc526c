//! Cross-region flux fractions.
//!
//! For an origin `R` with cross-region trips, each destination `T != R`
//! receives `trips(R, T) / cross(R)`.  The fractions of one origin sum to 1.
//! Origins without cross-region trips produce no rows at all.

use mitma_core::{FluxRow, NaiveDate, TripMatrixRow};

use crate::TripSplit;

/// Flux rows for one day's from-home matrix, sorted by (source, target).
pub fn compute_flux(matrix: &[TripMatrixRow], date: NaiveDate) -> Vec<FluxRow> {
    let splits = TripSplit::by_origin(matrix);

    let mut rows: Vec<FluxRow> = matrix
        .iter()
        .filter(|row| !row.is_internal())
        .filter_map(|row| {
            let cross = splits.get(&row.origin)?.cross;
            (cross > 0.0).then(|| FluxRow {
                date,
                source:     row.origin.clone(),
                target:     row.destination.clone(),
                p_fraction: row.trip_count / cross,
            })
        })
        .collect();

    rows.sort_unstable_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));
    rows
}
