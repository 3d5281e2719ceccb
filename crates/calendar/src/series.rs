//! Gap-free daily precipitation series.

use crate::date::NoLeapDate;
use crate::error::CalendarError;
use crate::range::DateRange;

/// One day of precipitation (mm/day) on the no-leap calendar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRecord {
    /// Calendar day.
    pub date: NoLeapDate,
    /// Precipitation magnitude.
    pub precip: f64,
}

/// A contiguous daily series: one value per no-leap day starting at `start`.
///
/// Storing only the start date and a dense value vector makes date lookup an
/// O(1) ordinal subtraction.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    start: NoLeapDate,
    values: Vec<f64>,
}

impl DailySeries {
    /// Builds a series whose first value falls on `start`.
    pub fn new(start: NoLeapDate, values: Vec<f64>) -> Self {
        Self { start, values }
    }

    /// Builds a series from explicit records, checking that dates are
    /// consecutive no-leap days.
    ///
    /// # Errors
    ///
    /// [`CalendarError::EmptySeries`] for no records,
    /// [`CalendarError::Gap`] if any two neighbours are not one day apart.
    pub fn from_records(records: &[DailyRecord]) -> Result<Self, CalendarError> {
        let first = records.first().ok_or(CalendarError::EmptySeries)?;
        let mut expected = first.date;
        let mut values = Vec::with_capacity(records.len());
        for rec in records {
            if rec.date != expected {
                return Err(CalendarError::Gap {
                    expected: expected.to_string(),
                    found: rec.date.to_string(),
                });
            }
            values.push(rec.precip);
            expected = expected.next();
        }
        Ok(Self {
            start: first.date,
            values,
        })
    }

    /// First date covered.
    pub fn start(&self) -> NoLeapDate {
        self.start
    }

    /// Last date covered. For an empty series this is the day before `start`.
    pub fn end(&self) -> NoLeapDate {
        self.start.add_days(self.values.len() as i64 - 1)
    }

    /// Full date range covered.
    ///
    /// # Errors
    ///
    /// [`CalendarError::EmptySeries`] when the series holds no values.
    pub fn range(&self) -> Result<DateRange, CalendarError> {
        if self.values.is_empty() {
            return Err(CalendarError::EmptySeries);
        }
        DateRange::new(self.start, self.end())
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Dense value slice.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Date of the `i`-th value.
    pub fn date_at(&self, i: usize) -> NoLeapDate {
        self.start.add_days(i as i64)
    }

    /// Position of `date` in the series, if covered.
    pub fn index_of(&self, date: NoLeapDate) -> Option<usize> {
        let offset = self.start.days_until(date);
        (offset >= 0 && (offset as usize) < self.values.len()).then_some(offset as usize)
    }

    /// Value on `date`, if covered.
    pub fn value_on(&self, date: NoLeapDate) -> Option<f64> {
        self.index_of(date).map(|i| self.values[i])
    }

    /// Sub-series covering `range`, or `None` if `range` is not fully covered.
    pub fn slice(&self, range: &DateRange) -> Option<DailySeries> {
        let lo = self.index_of(range.start())?;
        let hi = self.index_of(range.end())?;
        Some(Self {
            start: range.start(),
            values: self.values[lo..=hi].to_vec(),
        })
    }

    /// Iterates over `(date, value)` records.
    pub fn records(&self) -> impl Iterator<Item = DailyRecord> + '_ {
        self.values.iter().enumerate().map(|(i, &precip)| DailyRecord {
            date: self.date_at(i),
            precip,
        })
    }

    /// Returns a series with `f` applied to every value.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> DailySeries {
        Self {
            start: self.start,
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NoLeapDate {
        s.parse().unwrap()
    }

    #[test]
    fn from_records_contiguous() {
        let records = vec![
            DailyRecord {
                date: d("2000-02-27"),
                precip: 1.0,
            },
            DailyRecord {
                date: d("2000-02-28"),
                precip: 2.0,
            },
            DailyRecord {
                date: d("2000-03-01"),
                precip: 3.0,
            },
        ];
        let s = DailySeries::from_records(&records).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.end(), d("2000-03-01"));
        assert_eq!(s.value_on(d("2000-03-01")), Some(3.0));
    }

    #[test]
    fn from_records_gap() {
        let records = vec![
            DailyRecord {
                date: d("2000-01-01"),
                precip: 1.0,
            },
            DailyRecord {
                date: d("2000-01-03"),
                precip: 2.0,
            },
        ];
        let err = DailySeries::from_records(&records).unwrap_err();
        assert!(matches!(err, CalendarError::Gap { .. }));
    }

    #[test]
    fn from_records_empty() {
        assert_eq!(
            DailySeries::from_records(&[]).unwrap_err(),
            CalendarError::EmptySeries
        );
    }

    #[test]
    fn index_and_slice() {
        let s = DailySeries::new(d("1999-12-30"), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.index_of(d("2000-01-01")), Some(2));
        assert_eq!(s.index_of(d("1999-12-29")), None);
        assert_eq!(s.index_of(d("2000-01-04")), None);

        let r = DateRange::parse("1999-12-31", "2000-01-02").unwrap();
        let sub = s.slice(&r).unwrap();
        assert_eq!(sub.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(sub.start(), d("1999-12-31"));

        let outside = DateRange::parse("1999-12-31", "2000-01-10").unwrap();
        assert!(s.slice(&outside).is_none());
    }

    #[test]
    fn records_and_map() {
        let s = DailySeries::new(d("2000-01-01"), vec![1.0, 2.0]);
        let doubled = s.map_values(|v| v * 2.0);
        let recs: Vec<_> = doubled.records().collect();
        assert_eq!(recs[1].date, d("2000-01-02"));
        assert_eq!(recs[1].precip, 4.0);
    }

    #[test]
    fn empty_series_has_no_range() {
        let s = DailySeries::new(d("2000-01-01"), vec![]);
        assert!(s.is_empty());
        assert!(s.range().is_err());
    }
}
