//! Calendar-day helpers.
//!
//! Daily source files are named by an 8-digit `YYYYMMDD` stem, while the
//! output tables and the command line use ISO `YYYY-MM-DD`.  Both forms are
//! accepted on input.

use chrono::{Days, NaiveDate};

use crate::{MitmaError, MitmaResult};

/// Parse `YYYY-MM-DD` or `YYYYMMDD`.
pub fn parse_date(s: &str) -> MitmaResult<NaiveDate> {
    let s = s.trim();
    let format = if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        "%Y%m%d"
    } else {
        "%Y-%m-%d"
    };
    NaiveDate::parse_from_str(s, format).map_err(|_| MitmaError::InvalidDate(s.to_owned()))
}

/// The 8-digit file-name stem for `date` (`2020-03-01` → `"20200301"`).
pub fn date_stem(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// The calendar day after `date`.
pub fn next_day(date: NaiveDate) -> MitmaResult<NaiveDate> {
    date.checked_add_days(Days::new(1))
        .ok_or_else(|| MitmaError::InvalidDate(format!("{date} has no successor")))
}
