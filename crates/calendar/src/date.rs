//! No-leap date with year context.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::doy::{DAYS_PER_YEAR, Doy};
use crate::error::CalendarError;

/// A date in the 365-day no-leap calendar with year context.
///
/// Ordering is chronological. Every date maps to a unique day ordinal
/// (`year * 365 + doy - 1`), which makes day differences and offsets exact
/// integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoLeapDate {
    year: i32,
    doy: Doy,
}

impl PartialOrd for NoLeapDate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NoLeapDate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.year, self.doy).cmp(&(other.year, other.doy))
    }
}

impl NoLeapDate {
    /// Creates a new `NoLeapDate` from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] if the month or day is invalid for the
    /// 365-day no-leap calendar (February 29 is always invalid).
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, CalendarError> {
        let doy = Doy::from_month_day(month, day)?;
        Ok(Self { year, doy })
    }

    /// Creates a `NoLeapDate` from a year and an already-validated [`Doy`].
    pub fn from_year_doy(year: i32, doy: Doy) -> Self {
        Self { year, doy }
    }

    /// Inverse of [`NoLeapDate::ordinal`].
    pub fn from_ordinal(ordinal: i64) -> Self {
        let n = DAYS_PER_YEAR as i64;
        let year = ordinal.div_euclid(n) as i32;
        let idx = ordinal.rem_euclid(n) as usize;
        Self {
            year,
            doy: Doy::from_index(idx),
        }
    }

    /// Converts a proleptic Gregorian date. Returns `None` for February 29,
    /// which has no counterpart in the no-leap calendar.
    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        Self::new(date.year(), date.month() as u8, date.day() as u8).ok()
    }

    /// Converts to a proleptic Gregorian date.
    pub fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month() as u32, self.day() as u32)
    }

    /// Returns the year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u8 {
        self.doy.month()
    }

    /// Returns the day within the month (1..=31).
    pub fn day(self) -> u8 {
        self.doy.day()
    }

    /// Returns the day-of-year.
    pub fn doy(self) -> Doy {
        self.doy
    }

    /// Returns `(month, day)` as a tuple.
    pub fn month_day(self) -> (u8, u8) {
        self.doy.month_day()
    }

    /// Continuous day count: `year * 365 + (doy - 1)`.
    pub fn ordinal(self) -> i64 {
        self.year as i64 * DAYS_PER_YEAR as i64 + self.doy.index() as i64
    }

    /// Returns the date `days` days later (or earlier, if negative).
    pub fn add_days(self, days: i64) -> Self {
        Self::from_ordinal(self.ordinal() + days)
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(self, other: NoLeapDate) -> i64 {
        other.ordinal() - self.ordinal()
    }

    /// Returns the next date in the no-leap calendar.
    ///
    /// December 31 wraps to January 1 of the following year.
    pub fn next(self) -> Self {
        self.add_days(1)
    }
}

impl fmt::Display for NoLeapDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, d) = self.month_day();
        write!(f, "{:04}-{:02}-{:02}", self.year, m, d)
    }
}

impl FromStr for NoLeapDate {
    type Err = CalendarError;

    /// Parses `YYYY-MM-DD`. A valid Gregorian 29 February is an
    /// [`CalendarError::InvalidDay`]; anything chrono rejects is a
    /// [`CalendarError::Parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            CalendarError::Parse {
                input: s.to_string(),
            }
        })?;
        Self::new(date.year(), date.month() as u8, date.day() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_valid() {
        let date = NoLeapDate::new(2000, 1, 1).unwrap();
        assert_eq!(date.year(), 2000);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 1);
        assert_eq!(date.doy().get(), 1);
    }

    #[test]
    fn new_invalid_day() {
        assert_eq!(
            NoLeapDate::new(2000, 2, 29).unwrap_err(),
            CalendarError::InvalidDay {
                day: 29,
                month: 2,
                max_day: 28,
            }
        );
    }

    #[test]
    fn accessors() {
        let date = NoLeapDate::new(2024, 3, 15).unwrap();
        assert_eq!(date.doy().get(), 74); // 31 (Jan) + 28 (Feb) + 15
        assert_eq!(date.month_day(), (3, 15));
    }

    #[test]
    fn ordinal_roundtrip() {
        for ord in [-800_i64, -1, 0, 1, 364, 365, 729_635] {
            assert_eq!(NoLeapDate::from_ordinal(ord).ordinal(), ord);
        }
    }

    #[test]
    fn next_dec_31_year_wrap() {
        let next = NoLeapDate::new(2000, 12, 31).unwrap().next();
        assert_eq!(next, NoLeapDate::new(2001, 1, 1).unwrap());
    }

    #[test]
    fn next_feb_28_to_mar_1() {
        let next = NoLeapDate::new(2000, 2, 28).unwrap().next();
        assert_eq!(next.month_day(), (3, 1));
    }

    #[test]
    fn negative_year_boundary() {
        let next = NoLeapDate::new(-1, 12, 31).unwrap().next();
        assert_eq!(next, NoLeapDate::new(0, 1, 1).unwrap());
    }

    #[test]
    fn add_days_and_days_until() {
        let a = NoLeapDate::new(1990, 1, 1).unwrap();
        let b = a.add_days(365 * 21 - 1);
        assert_eq!(b, NoLeapDate::new(2010, 12, 31).unwrap());
        assert_eq!(a.days_until(b), 365 * 21 - 1);
        assert_eq!(b.add_days(-(365 * 21 - 1)), a);
    }

    #[test]
    fn display_and_parse() {
        let date: NoLeapDate = "2045-07-04".parse().unwrap();
        assert_eq!(date, NoLeapDate::new(2045, 7, 4).unwrap());
        assert_eq!(date.to_string(), "2045-07-04");
    }

    #[test]
    fn parse_rejects_malformed() {
        for s in ["2045/07/04", "", "abcd-01-01", "2000-02-29", "2045-13-01"] {
            assert!(s.parse::<NoLeapDate>().is_err(), "{s:?} should fail");
        }
    }

    #[test]
    fn parse_errors_name_the_input() {
        // Not a Gregorian date either, so chrono rejects it.
        let err = "2001-02-29".parse::<NoLeapDate>().unwrap_err();
        assert_eq!(
            err,
            CalendarError::Parse {
                input: "2001-02-29".to_string()
            }
        );
        assert_eq!(
            " 2045-07-04 ".parse::<NoLeapDate>().unwrap(),
            NoLeapDate::new(2045, 7, 4).unwrap()
        );
    }

    #[test]
    fn naive_bridge_drops_leap_day() {
        let leap = NaiveDate::from_ymd_opt(2000, 2, 29).unwrap();
        assert!(NoLeapDate::from_naive(leap).is_none());
        let mar1 = NaiveDate::from_ymd_opt(2000, 3, 1).unwrap();
        let nl = NoLeapDate::from_naive(mar1).unwrap();
        assert_eq!(nl.doy().get(), 60);
        assert_eq!(nl.to_naive(), Some(mar1));
    }

    #[test]
    fn ord_different_years() {
        let dec31 = NoLeapDate::new(1999, 12, 31).unwrap();
        let jan1 = NoLeapDate::new(2000, 1, 1).unwrap();
        assert!(dec31 < jan1);
    }
}
