//! Date sequence generation for the no-leap calendar.

use crate::date::NoLeapDate;

/// Generates a contiguous sequence of no-leap dates.
///
/// Starting from `start`, produces exactly `n_days` consecutive dates. Year
/// boundaries are handled automatically (Dec 31 wraps to Jan 1 of the
/// following year).
///
/// # Example
///
/// ```
/// use pluvio_calendar::{NoLeapDate, noleap_sequence};
///
/// let start = NoLeapDate::new(2000, 12, 30).unwrap();
/// let dates = noleap_sequence(start, 4);
/// assert_eq!(dates[2], NoLeapDate::new(2001, 1, 1).unwrap());
/// ```
pub fn noleap_sequence(start: NoLeapDate, n_days: usize) -> Vec<NoLeapDate> {
    let base = start.ordinal();
    (0..n_days as i64)
        .map(|i| NoLeapDate::from_ordinal(base + i))
        .collect()
}
