//! Unit tests for mitma-indicators.

use mitma_core::{NaiveDate, PopulationRow, RawTripRow, RegionId, TripMatrixRow};

// ── Helpers ───────────────────────────────────────────────────────────────────

const EPS: f64 = 1e-9;

fn rid(code: &str) -> RegionId {
    RegionId::new(code).unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 3, 2).unwrap()
}

fn pop(region: &str, bucket: &str, people: f64) -> PopulationRow {
    PopulationRow {
        region:            rid(region),
        trip_count_bucket: bucket.to_owned(),
        person_count:      people,
    }
}

fn cell(origin: &str, destination: &str, trips: f64) -> TripMatrixRow {
    TripMatrixRow {
        origin:      rid(origin),
        destination: rid(destination),
        trip_count:  trips,
    }
}

fn raw(origin: &str, destination: &str, activity: &str, trips: f64) -> RawTripRow {
    RawTripRow {
        origin:          rid(origin),
        destination:     rid(destination),
        origin_activity: activity.to_owned(),
        trips,
    }
}

// ── q / r / p ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod qrp_tests {
    use super::*;
    use crate::{IndicatorError, TripSplit, compute_indexes, region_index};

    #[test]
    fn stationary_and_split_movement() {
        let population = vec![pop("R1", "0", 40.0), pop("R1", "1", 60.0)];
        let matrix = vec![cell("R1", "R1", 30.0), cell("R1", "R2", 30.0)];

        let outcome = compute_indexes(&population, &matrix);
        let qrp = outcome.indexes[&rid("R1")];
        assert!((qrp.q - 0.4).abs() < EPS);
        assert!((qrp.r - 0.3).abs() < EPS);
        assert!((qrp.p - 0.3).abs() < EPS);
        assert!(outcome.degenerate.is_empty());
    }

    #[test]
    fn no_trips_at_all_attributes_movement_to_p() {
        let population = vec![pop("R1", "0", 50.0), pop("R1", "2", 50.0)];
        let matrix = vec![cell("R2", "R3", 10.0)];

        let qrp = compute_indexes(&population, &matrix).indexes[&rid("R1")];
        assert!((qrp.q - 0.5).abs() < EPS);
        assert_eq!(qrp.r, 0.0);
        assert!((qrp.p - 0.5).abs() < EPS);
    }

    #[test]
    fn only_internal_trips_gives_p_zero() {
        let population = vec![pop("R1", "0", 20.0), pop("R1", "1", 80.0)];
        let matrix = vec![cell("R1", "R1", 5.0)];

        let qrp = compute_indexes(&population, &matrix).indexes[&rid("R1")];
        assert!((qrp.r - 0.8).abs() < EPS);
        assert!(qrp.p.abs() < EPS);
    }

    #[test]
    fn only_cross_trips_gives_r_zero() {
        let population = vec![pop("R1", "0", 20.0), pop("R1", "2+", 80.0)];
        let matrix = vec![cell("R1", "R2", 5.0), cell("R1", "R3", 15.0)];

        let qrp = compute_indexes(&population, &matrix).indexes[&rid("R1")];
        assert_eq!(qrp.r, 0.0);
        assert!((qrp.p - 0.8).abs() < EPS);
    }

    #[test]
    fn zero_population_is_degenerate_and_excluded() {
        let population = vec![
            pop("R1", "0", 0.0),
            pop("R1", "1", 0.0),
            pop("R2", "0", 10.0),
            pop("R2", "1", 30.0),
        ];
        let matrix = vec![cell("R2", "R2", 1.0), cell("R2", "R1", 3.0)];

        let outcome = compute_indexes(&population, &matrix);
        assert_eq!(outcome.degenerate, vec![rid("R1")]);
        assert!(!outcome.indexes.contains_key(&rid("R1")));
        assert!(outcome.indexes.contains_key(&rid("R2")));

        assert_eq!(
            region_index(&rid("R1"), &population, &matrix),
            Err(IndicatorError::DegenerateRegion { region: rid("R1") })
        );
    }

    #[test]
    fn indexes_sum_to_one_for_every_region() {
        let population = vec![
            pop("01", "0", 13.0),
            pop("01", "1", 7.0),
            pop("01", "2", 3.3),
            pop("02", "0", 1.0),
            pop("02", "2+", 999.0),
            pop("03", "1", 0.7),
            pop("04", "0", 42.0),
        ];
        let matrix = vec![
            cell("01", "01", 17.1),
            cell("01", "02", 3.9),
            cell("01", "03", 0.01),
            cell("02", "01", 8.0),
            cell("03", "03", 2.2),
        ];

        let outcome = compute_indexes(&population, &matrix);
        assert_eq!(outcome.indexes.len(), 4);
        for (region, qrp) in &outcome.indexes {
            let sum = qrp.q + qrp.r + qrp.p;
            assert!((sum - 1.0).abs() < EPS, "{region}: q+r+p = {sum}");
            assert!(qrp.q >= 0.0 && qrp.r >= 0.0 && qrp.p >= -EPS);
        }
    }

    #[test]
    fn single_region_matches_whole_day() {
        let population = vec![pop("A", "0", 3.0), pop("A", "1", 9.0), pop("B", "0", 1.0)];
        let matrix = vec![cell("A", "A", 2.0), cell("A", "B", 6.0), cell("B", "A", 1.0)];

        let whole = compute_indexes(&population, &matrix);
        for region in [rid("A"), rid("B")] {
            let single = region_index(&region, &population, &matrix).unwrap();
            assert_eq!(whole.indexes[&region], single);
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let population = vec![pop("R1", "0", 4.0), pop("R1", "1", 6.0), pop("R2", "1", 2.0)];
        let matrix = vec![cell("R1", "R2", 3.0), cell("R2", "R2", 1.0)];

        let first = compute_indexes(&population, &matrix);
        let second = compute_indexes(&population, &matrix);
        assert_eq!(first, second);
        assert_eq!(first.to_rows(day()), second.to_rows(day()));
    }

    #[test]
    fn rows_are_sorted_and_dated() {
        let population = vec![pop("R2", "0", 1.0), pop("R1", "0", 1.0)];
        let rows = compute_indexes(&population, &[]).to_rows(day());
        let sources: Vec<&str> = rows.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, ["R1", "R2"]);
        assert!(rows.iter().all(|r| r.date == day()));
    }

    #[test]
    fn split_by_origin() {
        let matrix = vec![cell("R1", "R1", 2.0), cell("R1", "R2", 3.0), cell("R1", "R3", 4.0)];
        let splits = TripSplit::by_origin(&matrix);
        assert_eq!(splits[&rid("R1")], TripSplit { within: 2.0, cross: 7.0 });
        assert!(!splits.contains_key(&rid("R2")));
    }
}

// ── Flux ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod flux_tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::compute_flux;

    #[test]
    fn fractions_of_cross_trips() {
        let matrix = vec![cell("R1", "R2", 20.0), cell("R1", "R3", 80.0)];
        let rows = compute_flux(&matrix, day());

        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].source.as_str(), rows[0].target.as_str()), ("R1", "R2"));
        assert!((rows[0].p_fraction - 0.2).abs() < EPS);
        assert_eq!((rows[1].source.as_str(), rows[1].target.as_str()), ("R1", "R3"));
        assert!((rows[1].p_fraction - 0.8).abs() < EPS);
    }

    #[test]
    fn internal_trips_are_ignored() {
        let matrix = vec![cell("R1", "R1", 500.0), cell("R1", "R2", 1.0)];
        let rows = compute_flux(&matrix, day());
        assert_eq!(rows.len(), 1);
        assert!((rows[0].p_fraction - 1.0).abs() < EPS);
    }

    #[test]
    fn regions_without_cross_trips_are_absent() {
        let matrix = vec![cell("R1", "R1", 10.0), cell("R2", "R3", 0.0), cell("R4", "R1", 2.0)];
        let rows = compute_flux(&matrix, day());
        assert!(rows.iter().all(|r| r.source.as_str() == "R4"));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn fractions_sum_to_one_per_source() {
        let matrix = vec![
            cell("A", "B", 1.3),
            cell("A", "C", 2.9),
            cell("A", "D", 0.001),
            cell("A", "A", 7.0),
            cell("B", "A", 11.0),
            cell("B", "C", 0.0),
            cell("C", "D", 5.5),
        ];
        let rows = compute_flux(&matrix, day());

        let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
        for row in &rows {
            assert_ne!(row.source, row.target);
            *sums.entry(row.source.as_str()).or_default() += row.p_fraction;
        }
        assert_eq!(sums.len(), 3);
        for (source, sum) in sums {
            assert!((sum - 1.0).abs() < EPS, "{source}: {sum}");
        }
    }
}

// ── Trip aggregation ──────────────────────────────────────────────────────────

#[cfg(test)]
mod trips_tests {
    use mitma_core::HomeLabels;

    use super::*;
    use crate::{from_home_matrix, trip_matrix, trip_totals};

    fn sample() -> Vec<RawTripRow> {
        vec![
            raw("R1", "R1", "casa", 10.0),
            raw("R1", "R1", "casa", 5.0),
            raw("R1", "R2", "casa", 7.0),
            raw("R1", "R2", "trabajo_estudio", 3.0),
            raw("R2", "R1", "frecuente", 4.0),
            raw("R3", "R3", "otros", 2.5),
        ]
    }

    #[test]
    fn from_home_filters_and_groups() {
        let matrix = from_home_matrix(&sample(), &HomeLabels::default());
        assert_eq!(matrix, vec![cell("R1", "R1", 15.0), cell("R1", "R2", 7.0)]);
    }

    #[test]
    fn from_home_honours_custom_labels() {
        let rows = vec![raw("R1", "R2", "home", 1.0), raw("R1", "R2", "casa", 2.0)];
        let labels = HomeLabels(vec!["HOME".to_owned()]);
        assert_eq!(from_home_matrix(&rows, &labels), vec![cell("R1", "R2", 1.0)]);
    }

    #[test]
    fn totals_outer_join_fills_zero() {
        let totals = trip_totals(&sample(), day());
        let by: Vec<(&str, f64, f64, f64)> = totals
            .iter()
            .map(|t| (t.source.as_str(), t.trips_outgoing, t.trips_incoming, t.trips_internal))
            .collect();
        assert_eq!(
            by,
            vec![
                ("R1", 10.0, 4.0, 15.0),
                ("R2", 4.0, 10.0, 0.0),
                ("R3", 0.0, 0.0, 2.5),
            ]
        );
        assert!(totals.iter().all(|t| t.date == day()));
    }

    #[test]
    fn incoming_only_region_is_present() {
        let totals = trip_totals(&[raw("A", "B", "casa", 3.0)], day());
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[1].source.as_str(), "B");
        assert_eq!(totals[1].trips_incoming, 3.0);
        assert_eq!(totals[1].trips_outgoing, 0.0);
        assert_eq!(totals[1].trips_internal, 0.0);
    }

    #[test]
    fn matrix_keeps_self_pairs_and_all_activities() {
        let matrix = trip_matrix(&sample(), day());
        let pairs: Vec<(&str, &str, f64)> = matrix
            .iter()
            .map(|m| (m.source.as_str(), m.target.as_str(), m.trips))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("R1", "R1", 15.0),
                ("R1", "R2", 10.0),
                ("R2", "R1", 4.0),
                ("R3", "R3", 2.5),
            ]
        );
    }

    #[test]
    fn empty_input_gives_empty_outputs() {
        assert!(from_home_matrix(&[], &HomeLabels::default()).is_empty());
        assert!(trip_totals(&[], day()).is_empty());
        assert!(trip_matrix(&[], day()).is_empty());
    }
}
