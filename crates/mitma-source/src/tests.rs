//! Unit tests for mitma-source.

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use mitma_core::NaiveDate;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn write_gz(path: &Path, body: &str) {
    let mut enc = GzEncoder::new(fs::File::create(path).unwrap(), Compression::fast());
    enc.write_all(body.as_bytes()).unwrap();
    enc.finish().unwrap();
}

const TRIPS: &str = "\
fecha|origen|destino|actividad_origen|actividad_destino|residencia|edad|periodo|distancia|viajes|viajes_km
20200301|0100101|0100101|casa|otros|01|NA|00|0005-010|4.5|31.2
20200301|0100101|0800102|trabajo_estudio|casa|01|NA|07|010-050|2|40
20200301|0800102|0100101|casa|frecuente|08|NA|08|010-050||0
";

const POPULATION: &str = "\
fecha|distrito|numero_viajes|personas
20200301|0100101|0|100.5
20200301|0100101|2+|50
20200301|0800102|1|7
";

// ── Reader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reader_tests {
    use super::*;
    use crate::{load_population_file, load_population_reader, load_trips_file, load_trips_reader};

    #[test]
    fn trip_rows_keep_text_region_codes() {
        let rows = load_trips_reader(TRIPS.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].origin.as_str(), "0100101");
        assert_eq!(rows[1].destination.as_str(), "0800102");
        assert_eq!(rows[1].origin_activity, "trabajo_estudio");
        assert_eq!(rows[0].trips, 4.5);
    }

    #[test]
    fn empty_trip_count_is_zero() {
        let rows = load_trips_reader(TRIPS.as_bytes()).unwrap();
        assert_eq!(rows[2].trips, 0.0);
    }

    #[test]
    fn english_headers_are_accepted() {
        let body = "origin|destination|origin_activity|trips\n001|002|home|3\n";
        let rows = load_trips_reader(body.as_bytes()).unwrap();
        assert_eq!(rows[0].origin.as_str(), "001");
        assert_eq!(rows[0].origin_activity, "home");

        let body = "region|trip_count_bucket|person_count\n001|0|3\n";
        let rows = load_population_reader(body.as_bytes()).unwrap();
        assert!(rows[0].made_no_trips());
    }

    #[test]
    fn population_rows() {
        let rows = load_population_reader(POPULATION.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].made_no_trips());
        assert_eq!(rows[1].trip_count_bucket, "2+");
        assert_eq!(rows[1].person_count, 50.0);
    }

    #[test]
    fn negative_counts_are_rejected() {
        let body = "distrito|numero_viajes|personas\n001|0|-1\n";
        assert!(load_population_reader(body.as_bytes()).is_err());
    }

    #[test]
    fn missing_column_is_a_parse_error() {
        let body = "origen|destino|viajes\n001|002|1\n";
        assert!(load_trips_reader(body.as_bytes()).is_err());
    }

    #[test]
    fn empty_region_is_rejected() {
        let body = "origen|destino|actividad_origen|viajes\n|002|casa|1\n";
        assert!(load_trips_reader(body.as_bytes()).is_err());
    }

    #[test]
    fn gzip_and_plain_files_read_the_same() {
        let dir = tempfile::tempdir().unwrap();
        let gz = dir.path().join("20200301_maestra_1.txt.gz");
        let plain = dir.path().join("20200301_maestra_1.txt");
        write_gz(&gz, TRIPS);
        fs::write(&plain, TRIPS).unwrap();

        assert_eq!(load_trips_file(&gz).unwrap(), load_trips_file(&plain).unwrap());

        let pop = dir.path().join("20200301_maestra_2.txt.gz");
        write_gz(&pop, POPULATION);
        assert_eq!(load_population_file(&pop).unwrap().len(), 3);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("20200301_bad.txt");
        fs::write(&path, "distrito|numero_viajes|personas\n001|0|abc\n").unwrap();
        let err = load_population_file(&path).unwrap_err().to_string();
        assert!(err.contains("20200301_bad.txt"), "{err}");
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod catalog_tests {
    use super::*;
    use crate::{Missing, SourceCatalog, SourceError, date_from_file_name};

    #[test]
    fn date_stems() {
        assert_eq!(
            date_from_file_name("20200301_maestra_1_mitma_distrito.txt.gz"),
            Some(d(2020, 3, 1))
        );
        assert_eq!(date_from_file_name("20200302.txt"), Some(d(2020, 3, 2)));
        assert_eq!(date_from_file_name("2020030_x.txt"), None);
        assert_eq!(date_from_file_name("20201341_x.txt"), None);
        assert_eq!(date_from_file_name("README.md"), None);
    }

    #[test]
    fn scan_pairs_files_by_date() {
        let trips = tempfile::tempdir().unwrap();
        let pop = tempfile::tempdir().unwrap();
        for name in ["20200301_m1.txt.gz", "20200302_m1.txt.gz", "notes.txt"] {
            fs::write(trips.path().join(name), "").unwrap();
        }
        for name in ["20200301_m2.txt.gz", "20200303_m2.txt.gz"] {
            fs::write(pop.path().join(name), "").unwrap();
        }
        fs::create_dir(trips.path().join("20200304_dir")).unwrap();

        let catalog = SourceCatalog::scan(trips.path(), pop.path()).unwrap();
        let dates: Vec<NaiveDate> = catalog.days().map(|day| day.date).collect();
        assert_eq!(dates, vec![d(2020, 3, 1), d(2020, 3, 2), d(2020, 3, 3)]);
        assert_eq!(catalog.last_date(), Some(d(2020, 3, 3)));

        let day = catalog.day(d(2020, 3, 1));
        let (t, p) = day.require().unwrap();
        assert!(t.ends_with("20200301_m1.txt.gz"));
        assert!(p.ends_with("20200301_m2.txt.gz"));
    }

    #[test]
    fn require_reports_what_is_missing() {
        let trips = tempfile::tempdir().unwrap();
        let pop = tempfile::tempdir().unwrap();
        fs::write(trips.path().join("20200302_m1.txt"), "").unwrap();
        fs::write(pop.path().join("20200303_m2.txt"), "").unwrap();
        let catalog = SourceCatalog::scan(trips.path(), pop.path()).unwrap();

        let missing = |date| match catalog.day(date).require() {
            Err(SourceError::MissingSource { missing, .. }) => Some(missing),
            _ => None,
        };
        assert_eq!(missing(d(2020, 3, 2)), Some(Missing::Population));
        assert_eq!(missing(d(2020, 3, 3)), Some(Missing::Trips));
        assert_eq!(missing(d(2020, 3, 4)), Some(Missing::Both));
    }

    #[test]
    fn duplicate_stems_keep_the_first_name() {
        let trips = tempfile::tempdir().unwrap();
        let pop = tempfile::tempdir().unwrap();
        fs::write(trips.path().join("20200301_a.txt"), "").unwrap();
        fs::write(trips.path().join("20200301_b.txt"), "").unwrap();
        let catalog = SourceCatalog::scan(trips.path(), pop.path()).unwrap();
        let day = catalog.day(d(2020, 3, 1));
        assert!(day.trips.unwrap().ends_with("20200301_a.txt"));
    }

    #[test]
    fn unreadable_directory_is_an_error() {
        let pop = tempfile::tempdir().unwrap();
        let result = SourceCatalog::scan(Path::new("/definitely/not/here"), pop.path());
        assert!(matches!(result, Err(SourceError::UnreadableDirectory { .. })));
    }

    #[test]
    fn empty_directories_give_empty_catalog() {
        let trips = tempfile::tempdir().unwrap();
        let pop = tempfile::tempdir().unwrap();
        let catalog = SourceCatalog::scan(trips.path(), pop.path()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.last_date(), None);
    }
}
