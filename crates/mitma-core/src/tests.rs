//! Unit tests for mitma-core primitives.

#[cfg(test)]
mod region {
    use crate::RegionId;

    #[test]
    fn keeps_leading_zeros() {
        let id = RegionId::new("0800101").unwrap();
        assert_eq!(id.as_str(), "0800101");
        assert_eq!(id.to_string(), "0800101");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(RegionId::new("  01001_AM ").unwrap().as_str(), "01001_AM");
    }

    #[test]
    fn empty_is_rejected() {
        assert!(RegionId::new("").is_err());
        assert!(RegionId::new("   ").is_err());
    }

    #[test]
    fn province_prefix() {
        let id: RegionId = "08019".parse().unwrap();
        assert!(id.has_prefix("08"));
        assert!(!id.has_prefix("17"));
    }

    #[test]
    fn serde_is_a_plain_string() {
        let id = RegionId::new("007").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"007\"");
        let back: RegionId = serde_json::from_str("\"007\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<RegionId>("\"\"").is_err());
    }
}

#[cfg(test)]
mod date {
    use chrono::NaiveDate;

    use crate::{date_stem, next_day, parse_date};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_both_forms() {
        assert_eq!(parse_date("2020-03-01").unwrap(), d(2020, 3, 1));
        assert_eq!(parse_date("20200301").unwrap(), d(2020, 3, 1));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date("2020-13-01").is_err());
        assert!(parse_date("202003").is_err());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn stem_is_eight_digits() {
        assert_eq!(date_stem(d(2020, 3, 1)), "20200301");
    }

    #[test]
    fn next_day_crosses_month_end() {
        assert_eq!(next_day(d(2020, 2, 29)).unwrap(), d(2020, 3, 1));
        assert_eq!(next_day(d(2020, 12, 31)).unwrap(), d(2021, 1, 1));
    }
}

#[cfg(test)]
mod rows {
    use crate::{PopulationRow, RegionId, TripMatrixRow};

    #[test]
    fn zero_bucket_detection() {
        let row = |bucket: &str| PopulationRow {
            region:            RegionId::new("R1").unwrap(),
            trip_count_bucket: bucket.to_owned(),
            person_count:      1.0,
        };
        assert!(row("0").made_no_trips());
        assert!(!row("1").made_no_trips());
        assert!(!row("2+").made_no_trips());
    }

    #[test]
    fn internal_pair() {
        let r1 = RegionId::new("R1").unwrap();
        let r2 = RegionId::new("R2").unwrap();
        let internal = TripMatrixRow { origin: r1.clone(), destination: r1.clone(), trip_count: 1.0 };
        let cross = TripMatrixRow { origin: r1, destination: r2, trip_count: 1.0 };
        assert!(internal.is_internal());
        assert!(!cross.is_internal());
    }
}

#[cfg(test)]
mod tables {
    use crate::{OutputGroup, OutputTable};

    #[test]
    fn names_and_parsing() {
        for table in OutputTable::ALL {
            assert_eq!(table.name().parse::<OutputTable>().unwrap(), table);
        }
        assert_eq!("qrp".parse::<OutputTable>().unwrap(), OutputTable::Qrp);
        assert!("mitma_raw".parse::<OutputTable>().is_err());
    }

    #[test]
    fn columns_start_with_date_and_source() {
        for table in OutputTable::ALL {
            assert_eq!(&table.columns()[..2], &["date", "source"]);
            assert_eq!(table.has_target(), table.columns()[2] == "target");
        }
    }

    #[test]
    fn groups_cover_every_table_once() {
        let mut all: Vec<OutputTable> =
            OutputGroup::ALL.iter().flat_map(|g| g.tables().iter().copied()).collect();
        all.sort();
        assert_eq!(all, OutputTable::ALL.to_vec());
        for table in OutputTable::ALL {
            assert!(table.group().tables().contains(&table));
        }
    }

    #[test]
    fn primary_table_belongs_to_its_group() {
        for group in OutputGroup::ALL {
            assert_eq!(group.primary().group(), group);
        }
        assert_eq!(OutputGroup::Qrp.primary(), OutputTable::Qrp);
    }
}

#[cfg(test)]
mod config {
    use std::io::Write;

    use chrono::NaiveDate;

    use crate::{HomeLabels, OutputGroup, OutputTable, PipelineConfig, StoreConfig};

    #[test]
    fn home_labels_default() {
        let labels = HomeLabels::default();
        assert!(labels.matches("casa"));
        assert!(labels.matches("Home"));
        assert!(!labels.matches("trabajo_estudio"));
        assert!(!labels.matches("frecuente"));
    }

    #[test]
    fn defaults_enable_all_tables() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.tables(), OutputTable::ALL.to_vec());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "trips_dir": "t", "store": {{ "kind": "csv", "dir": "out" }},
                 "outputs": ["trips"], "end_date": "2020-06-01" }}"#
        )
        .unwrap();

        let config = PipelineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.trips_dir.to_str(), Some("t"));
        assert_eq!(config.store, StoreConfig::Csv { dir: "out".into() });
        assert_eq!(config.outputs, vec![OutputGroup::Trips]);
        assert_eq!(config.end_date, NaiveDate::from_ymd_opt(2020, 6, 1));
        assert_eq!(config.home_labels, HomeLabels::default());
        assert_eq!(config.tables(), vec![OutputTable::Trips]);
    }

    #[test]
    fn validate_rejects_empty_outputs_and_inverted_range() {
        let mut config = PipelineConfig { outputs: vec![], ..Default::default() };
        assert!(config.validate().is_err());

        config.outputs = vec![OutputGroup::Qrp];
        config.start_date = NaiveDate::from_ymd_opt(2020, 3, 5);
        config.end_date = NaiveDate::from_ymd_opt(2020, 3, 5);
        assert!(config.validate().is_err());
    }
}
