//! Source-file discovery.
//!
//! Both directories are listed once per run.  Files whose name does not start
//! with an 8-digit date stem (`README`, `.DS_Store`, partial downloads named
//! `tmp_…`) are ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use mitma_core::{NaiveDate, parse_date};
use tracing::{debug, warn};

use crate::{SourceError, SourceResult};

// ── DayFiles ──────────────────────────────────────────────────────────────────

/// Which of a day's two files are absent.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Missing {
    Trips,
    Population,
    Both,
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Missing::Trips      => "trip matrix",
            Missing::Population => "population",
            Missing::Both       => "trip matrix and population",
        })
    }
}

/// The files found for one calendar day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayFiles {
    pub date:       NaiveDate,
    pub trips:      Option<PathBuf>,
    pub population: Option<PathBuf>,
}

impl DayFiles {
    /// A day with no files at all.
    pub fn empty(date: NaiveDate) -> Self {
        Self { date, trips: None, population: None }
    }

    /// Both paths, or [`SourceError::MissingSource`] naming what is absent.
    pub fn require(&self) -> SourceResult<(&Path, &Path)> {
        match (&self.trips, &self.population) {
            (Some(t), Some(p)) => Ok((t, p)),
            (None, Some(_)) => Err(self.missing(Missing::Trips)),
            (Some(_), None) => Err(self.missing(Missing::Population)),
            (None, None) => Err(self.missing(Missing::Both)),
        }
    }

    fn missing(&self, missing: Missing) -> SourceError {
        SourceError::MissingSource { date: self.date, missing }
    }
}

// ── SourceCatalog ─────────────────────────────────────────────────────────────

/// All dated files of the two source directories, keyed by day.
#[derive(Clone, Debug, Default)]
pub struct SourceCatalog {
    days: BTreeMap<NaiveDate, DayFiles>,
}

impl SourceCatalog {
    /// List `trips_dir` and `population_dir`.
    ///
    /// # Errors
    ///
    /// [`SourceError::UnreadableDirectory`] if either directory cannot be
    /// listed.
    pub fn scan(trips_dir: &Path, population_dir: &Path) -> SourceResult<Self> {
        let mut catalog = SourceCatalog::default();
        for (path, date) in dated_files(trips_dir)? {
            catalog.insert(date, path, |day| &mut day.trips);
        }
        for (path, date) in dated_files(population_dir)? {
            catalog.insert(date, path, |day| &mut day.population);
        }
        debug!(
            days = catalog.days.len(),
            trips_dir = %trips_dir.display(),
            population_dir = %population_dir.display(),
            "source catalog scanned"
        );
        Ok(catalog)
    }

    /// The files for `date`; an empty [`DayFiles`] if nothing was found.
    pub fn day(&self, date: NaiveDate) -> DayFiles {
        self.days.get(&date).cloned().unwrap_or_else(|| DayFiles::empty(date))
    }

    /// Days with at least one file, ascending.
    pub fn days(&self) -> impl Iterator<Item = &DayFiles> {
        self.days.values()
    }

    /// The latest day with at least one file.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    fn insert(
        &mut self,
        date: NaiveDate,
        path: PathBuf,
        slot: impl Fn(&mut DayFiles) -> &mut Option<PathBuf>,
    ) {
        let day = self.days.entry(date).or_insert_with(|| DayFiles::empty(date));
        let slot = slot(day);
        match slot {
            // Listing is sorted, so the first name wins deterministically.
            Some(kept) => warn!(
                %date,
                kept = %kept.display(),
                ignored = %path.display(),
                "two source files share a date stem"
            ),
            None => *slot = Some(path),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// The day encoded in a file name's leading 8-digit stem.
///
/// `20200301_maestra_1_mitma_distrito.txt.gz` → 2020-03-01;
/// `20200301.txt` → 2020-03-01; `maestra.txt` → `None`.
pub fn date_from_file_name(name: &str) -> Option<NaiveDate> {
    let stem = name.split(['_', '.']).next()?;
    if stem.len() != 8 || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    parse_date(stem).ok()
}

fn dated_files(dir: &Path) -> SourceResult<Vec<(PathBuf, NaiveDate)>> {
    let unreadable = |source| SourceError::UnreadableDirectory { path: dir.to_path_buf(), source };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        if !entry.file_type().map_err(unreadable)?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(date) = name.to_str().and_then(date_from_file_name) else {
            continue;
        };
        files.push((entry.path(), date));
    }
    files.sort();
    Ok(files)
}
