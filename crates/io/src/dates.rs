//! Arrow `Date32` (days since 1970-01-01) conversions.

use chrono::{Datelike, NaiveDate};
use pluvio_calendar::NoLeapDate;

use crate::error::IoError;

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Gregorian date to `Date32`.
pub(crate) fn naive_to_date32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// `Date32` to Gregorian date.
pub(crate) fn date32_to_naive(days: i32) -> Result<NaiveDate, IoError> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| IoError::InvalidDate {
            reason: format!("date32 value {days} is out of range"),
        })
}

/// No-leap date to `Date32`.
pub(crate) fn noleap_to_date32(date: NoLeapDate) -> Result<i32, IoError> {
    date.to_naive()
        .map(naive_to_date32)
        .ok_or_else(|| IoError::InvalidDate {
            reason: format!("{date} has no Gregorian equivalent"),
        })
}
