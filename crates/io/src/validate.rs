//! Accumulated validation utilities.
//!
//! [`ValidationCollector`] gathers every problem found in an input file into
//! a single [`IoError::Validation`].

use pluvio_calendar::DailyRecord;

use crate::error::IoError;

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    /// Create an empty collector.
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Returns the number of recorded errors.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// `Ok(())` if nothing was recorded, otherwise one
    /// `IoError::Validation` joining all messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

/// Checks date-sorted records for negative or non-finite precipitation and
/// repeated dates.
pub(crate) fn validate_records(records: &[DailyRecord]) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    for r in records {
        if !r.precip.is_finite() {
            c.push(format!("missing or non-finite precipitation on {}", r.date));
        } else if r.precip < 0.0 {
            c.push(format!("negative precipitation on {}: {}", r.date, r.precip));
        }
    }
    for pair in records.windows(2) {
        if pair[0].date == pair[1].date {
            c.push(format!("duplicate date {}", pair[1].date));
        }
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, precip: f64) -> DailyRecord {
        DailyRecord {
            date: date.parse().unwrap(),
            precip,
        }
    }

    #[test]
    fn clean_records_pass() {
        let recs = [rec("2001-01-01", 0.0), rec("2001-01-02", 4.5)];
        assert!(validate_records(&recs).finish().is_ok());
    }

    #[test]
    fn every_problem_is_reported() {
        let recs = [
            rec("2001-01-01", -1.0),
            rec("2001-01-02", f64::NAN),
            rec("2001-01-02", 3.0),
        ];
        let c = validate_records(&recs);
        assert_eq!(c.len(), 3);
        match c.finish().unwrap_err() {
            IoError::Validation { count, details } => {
                assert_eq!(count, 3);
                assert!(details.contains("negative precipitation on 2001-01-01"));
                assert!(details.contains("duplicate date 2001-01-02"));
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }
}
