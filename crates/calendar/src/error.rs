//! Error types for the pluvio-calendar crate.

/// Error type for all fallible operations in the pluvio-calendar crate.
///
/// Covers validation failures for day-of-year values, months, and days in
/// the 365-day no-leap calendar, plus malformed date strings, inverted
/// ranges, and series that are not gap-free.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a day-of-year value is outside the valid range 1..=365.
    #[error("invalid day of year: {doy} (must be 1..=365)")]
    InvalidDoy {
        /// The invalid day-of-year value that was provided.
        doy: u16,
    },

    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a day number exceeds the number of days in the given month.
    #[error("invalid day: {day} for month {month} (max {max_day})")]
    InvalidDay {
        /// The invalid day number that was provided.
        day: u8,
        /// The month for which the day is invalid.
        month: u8,
        /// The maximum valid day for the given month.
        max_day: u8,
    },

    /// Returned when a date string is not of the form `YYYY-MM-DD`.
    #[error("cannot parse date {input:?}: expected YYYY-MM-DD")]
    Parse {
        /// The rejected input.
        input: String,
    },

    /// Returned when a range ends before it starts.
    #[error("range end {end} is before start {start}")]
    InvertedRange {
        /// Range start (ISO).
        start: String,
        /// Range end (ISO).
        end: String,
    },

    /// Returned when consecutive records are not consecutive no-leap days.
    #[error("series has a gap: expected {expected}, found {found}")]
    Gap {
        /// The date that should have come next (ISO).
        expected: String,
        /// The date actually found (ISO).
        found: String,
    },

    /// Returned when a series has no records.
    #[error("series is empty")]
    EmptySeries,
}
