//! Calendar dates as they appear in loan history.
//!
//! Dates are written `DD-MM-YYYY` everywhere (CLI input, `loans.csv`). They are
//! validated on parse, so day arithmetic never sees a malformed value.

use crate::error::{LibraryError, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Date(NaiveDate);

impl Date {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Date)
    }

    /// The local calendar date.
    pub fn today() -> Self {
        Date(Local::now().date_naive())
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for Date {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        // chrono accepts single-digit fields; the stored format is always padded
        if trimmed.len() != 10 {
            return Err(LibraryError::InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(Date)
            .map_err(|_| LibraryError::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

/// Whole days from `from` to `to`. Negative when `to` precedes `from`.
pub fn days_between(from: Date, to: Date) -> i64 {
    to.0.signed_duration_since(from.0).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_formats_padded_dates() {
        let d = date("01-02-2024");
        assert_eq!(d, Date::from_ymd(2024, 2, 1).unwrap());
        assert_eq!(d.to_string(), "01-02-2024");
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!("2024-01-01".parse::<Date>().is_err());
        assert!("32-01-2024".parse::<Date>().is_err());
        assert!("1-1-2024".parse::<Date>().is_err());
        assert!("".parse::<Date>().is_err());
    }

    #[test]
    fn counts_days_forward() {
        assert_eq!(days_between(date("01-01-2024"), date("20-01-2024")), 19);
        assert_eq!(days_between(date("01-01-2024"), date("10-01-2024")), 9);
    }

    #[test]
    fn crosses_month_and_leap_day() {
        assert_eq!(days_between(date("28-02-2024"), date("01-03-2024")), 2);
        assert_eq!(days_between(date("28-02-2023"), date("01-03-2023")), 1);
        assert_eq!(days_between(date("25-12-2023"), date("05-01-2024")), 11);
    }

    #[test]
    fn negative_when_reversed() {
        assert_eq!(days_between(date("20-01-2024"), date("01-01-2024")), -19);
    }
}
