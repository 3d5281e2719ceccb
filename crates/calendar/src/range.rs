//! Inclusive date ranges.

use std::fmt;

use crate::date::NoLeapDate;
use crate::error::CalendarError;
use crate::sequence::noleap_sequence;

/// An inclusive range of no-leap dates.
///
/// Used for reference windows (threshold, transition and GPD statistics) and
/// prediction windows (the dates to synthesise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NoLeapDate,
    end: NoLeapDate,
}

impl DateRange {
    /// Creates a range covering `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvertedRange`] if `end < start`.
    pub fn new(start: NoLeapDate, end: NoLeapDate) -> Result<Self, CalendarError> {
        if end < start {
            return Err(CalendarError::InvertedRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses a pair of ISO `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, CalendarError> {
        Self::new(start.parse()?, end.parse()?)
    }

    /// First day (inclusive).
    pub fn start(&self) -> NoLeapDate {
        self.start
    }

    /// Last day (inclusive).
    pub fn end(&self) -> NoLeapDate {
        self.end
    }

    /// Number of days in the range.
    pub fn len_days(&self) -> usize {
        (self.start.days_until(self.end) + 1) as usize
    }

    /// Length of the range in no-leap years.
    pub fn years(&self) -> f64 {
        self.len_days() as f64 / 365.0
    }

    /// Whether `date` lies inside the range.
    pub fn contains(&self, date: NoLeapDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether `other` lies entirely inside this range.
    pub fn contains_range(&self, other: &DateRange) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }

    /// Returns the range widened by `days` on both ends.
    pub fn widen(&self, days: i64) -> DateRange {
        Self {
            start: self.start.add_days(-days),
            end: self.end.add_days(days),
        }
    }

    /// Overlap of two ranges, if any.
    pub fn intersect(&self, other: &DateRange) -> Option<DateRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Self { start, end })
    }

    /// Every date in the range, in order.
    pub fn dates(&self) -> Vec<NoLeapDate> {
        noleap_sequence(self.start, self.len_days())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NoLeapDate {
        s.parse().unwrap()
    }

    #[test]
    fn inverted_range_rejected() {
        let err = DateRange::new(d("2010-01-02"), d("2010-01-01")).unwrap_err();
        assert!(matches!(err, CalendarError::InvertedRange { .. }));
    }

    #[test]
    fn single_day_range() {
        let r = DateRange::new(d("2010-01-01"), d("2010-01-01")).unwrap();
        assert_eq!(r.len_days(), 1);
        assert_eq!(r.dates(), vec![d("2010-01-01")]);
    }

    #[test]
    fn length_of_reference_period() {
        let r = DateRange::parse("1990-01-01", "2010-12-31").unwrap();
        assert_eq!(r.len_days(), 21 * 365);
        assert!((r.years() - 21.0).abs() < 1e-12);
    }

    #[test]
    fn containment() {
        let outer = DateRange::parse("1990-01-01", "2010-12-31").unwrap();
        let inner = DateRange::parse("1995-06-01", "2000-06-01").unwrap();
        assert!(outer.contains_range(&inner));
        assert!(!inner.contains_range(&outer));
        assert!(outer.contains(d("1990-01-01")));
        assert!(!outer.contains(d("2011-01-01")));
    }

    #[test]
    fn widen_and_intersect() {
        let r = DateRange::parse("2020-01-10", "2020-01-20").unwrap();
        let w = r.widen(15);
        assert_eq!(w.start(), d("2019-12-26"));
        assert_eq!(w.end(), d("2020-02-04"));

        let other = DateRange::parse("2020-01-15", "2021-01-01").unwrap();
        let i = r.intersect(&other).unwrap();
        assert_eq!(i.to_string(), "2020-01-15..=2020-01-20");

        let disjoint = DateRange::parse("2030-01-01", "2030-01-02").unwrap();
        assert!(r.intersect(&disjoint).is_none());
    }
}
