//! Day-of-year newtype for the 365-day no-leap calendar.

use crate::error::CalendarError;

/// Number of days in every no-leap year.
pub const DAYS_PER_YEAR: u16 = 365;

/// Day-of-year in the 365-day no-leap calendar (1..=365).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Doy(u16);

/// Number of days in each month (index 0 unused, index 1 = January, ..., index 12 = December).
pub(crate) const DAYS_PER_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Day-of-year on which each month starts (index 0 unused, index 1 = January starts at DOY 1, ...).
const MONTH_START_DOY: [u16; 13] = [0, 1, 32, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

impl Doy {
    /// Creates a new `Doy` from a day-of-year value.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDoy`] if `doy` is not in 1..=365.
    pub fn new(doy: u16) -> Result<Self, CalendarError> {
        if !(1..=DAYS_PER_YEAR).contains(&doy) {
            return Err(CalendarError::InvalidDoy { doy });
        }
        Ok(Self(doy))
    }

    /// Creates a `Doy` from a 0-based index, wrapping modulo 365.
    pub fn from_index(index: usize) -> Self {
        Self((index % DAYS_PER_YEAR as usize) as u16 + 1)
    }

    /// Creates a new `Doy` from a (month, day) pair.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is not in 1..=12.
    /// Returns [`CalendarError::InvalidDay`] if `day` is not valid for the given month.
    pub fn from_month_day(month: u8, day: u8) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        let max_day = DAYS_PER_MONTH[month as usize];
        if !(1..=max_day).contains(&day) {
            return Err(CalendarError::InvalidDay {
                day,
                month,
                max_day,
            });
        }
        Ok(Self(MONTH_START_DOY[month as usize] + day as u16 - 1))
    }

    /// Returns the inner day-of-year value (1..=365).
    pub fn get(self) -> u16 {
        self.0
    }

    /// Returns the 0-based index suitable for array indexing (0..=364).
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Returns the `(month, day)` pair for this day-of-year.
    pub fn month_day(self) -> (u8, u8) {
        // Last month whose start is <= self.
        let month = MONTH_START_DOY[1..].partition_point(|&start| start <= self.0);
        let day = self.0 - MONTH_START_DOY[month] + 1;
        (month as u8, day as u8)
    }

    /// Returns the month (1..=12) for this day-of-year.
    pub fn month(self) -> u8 {
        self.month_day().0
    }

    /// Returns the day within the month (1..=31) for this day-of-year.
    pub fn day(self) -> u8 {
        self.month_day().1
    }

    /// Shifts by `offset` days, wrapping around the year boundary.
    pub fn wrapping_add(self, offset: i32) -> Self {
        let n = DAYS_PER_YEAR as i32;
        let idx = (self.index() as i32 + offset).rem_euclid(n);
        Self(idx as u16 + 1)
    }

    /// Shortest distance in days between two days-of-year on the circular
    /// calendar (0..=182). Dec 31 and Jan 1 are one day apart.
    pub fn circular_distance(self, other: Doy) -> u16 {
        let d = self.0.abs_diff(other.0);
        d.min(DAYS_PER_YEAR - d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bounds() {
        assert!(Doy::new(1).is_ok());
        assert!(Doy::new(365).is_ok());
        assert_eq!(Doy::new(0), Err(CalendarError::InvalidDoy { doy: 0 }));
        assert_eq!(Doy::new(366), Err(CalendarError::InvalidDoy { doy: 366 }));
    }

    #[test]
    fn month_day_boundaries() {
        assert_eq!(Doy::new(1).unwrap().month_day(), (1, 1));
        assert_eq!(Doy::new(31).unwrap().month_day(), (1, 31));
        assert_eq!(Doy::new(32).unwrap().month_day(), (2, 1));
        assert_eq!(Doy::new(59).unwrap().month_day(), (2, 28));
        assert_eq!(Doy::new(60).unwrap().month_day(), (3, 1));
        assert_eq!(Doy::new(335).unwrap().month_day(), (12, 1));
        assert_eq!(Doy::new(365).unwrap().month_day(), (12, 31));
    }

    #[test]
    fn feb_29_rejected() {
        assert_eq!(
            Doy::from_month_day(2, 29),
            Err(CalendarError::InvalidDay {
                day: 29,
                month: 2,
                max_day: 28
            })
        );
    }

    #[test]
    fn from_index_wraps() {
        assert_eq!(Doy::from_index(0).get(), 1);
        assert_eq!(Doy::from_index(364).get(), 365);
        assert_eq!(Doy::from_index(365).get(), 1);
    }

    #[test]
    fn wrapping_add_crosses_year() {
        let dec30 = Doy::from_month_day(12, 30).unwrap();
        assert_eq!(dec30.wrapping_add(3).month_day(), (1, 2));
        let jan2 = Doy::from_month_day(1, 2).unwrap();
        assert_eq!(jan2.wrapping_add(-3).month_day(), (12, 30));
        assert_eq!(jan2.wrapping_add(365), jan2);
    }

    #[test]
    fn circular_distance_symmetric() {
        let jan1 = Doy::new(1).unwrap();
        let dec31 = Doy::new(365).unwrap();
        assert_eq!(jan1.circular_distance(dec31), 1);
        assert_eq!(dec31.circular_distance(jan1), 1);
        let jul1 = Doy::from_month_day(7, 1).unwrap();
        assert_eq!(jan1.circular_distance(jul1), 181);
        assert_eq!(jan1.circular_distance(jan1), 0);
    }
}
