//! # pluvio-calendar
//!
//! Date arithmetic for the 365-day no-leap calendar, plus the contiguous
//! daily precipitation series every other pluvio crate consumes.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["Doy (1..=365)"] -->|".month_day()"| B["(month, day)"]
//!     B -->|"Doy::from_month_day()"| A
//!     A -->|"NoLeapDate::from_year_doy()"| C["NoLeapDate"]
//!     C -->|".add_days()"| C
//!     C -->|"DateRange::new()"| D["DateRange"]
//!     D -->|".dates()"| E["Vec of NoLeapDate"]
//!     C -->|"DailySeries::new()"| F["DailySeries"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use pluvio_calendar::{DailySeries, DateRange, Doy, NoLeapDate};
//!
//! // Day-of-year conversions
//! let doy = Doy::from_month_day(3, 15).unwrap(); // Mar 15 -> DOY 74
//! assert_eq!(doy.get(), 74);
//!
//! // ISO parsing, no-leap arithmetic
//! let start: NoLeapDate = "1999-12-31".parse().unwrap();
//! assert_eq!(start.add_days(1).to_string(), "2000-01-01");
//!
//! // Inclusive ranges
//! let window = DateRange::new(start, start.add_days(364)).unwrap();
//! assert_eq!(window.len_days(), 365);
//!
//! // Contiguous series
//! let series = DailySeries::new(start, vec![0.0, 2.5, 11.0]);
//! assert_eq!(series.value_on(start.add_days(2)), Some(11.0));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `doy` | Day-of-year newtype and circular distance |
//! | `date` | No-leap date with year context, ISO I/O, chrono bridge |
//! | `range` | Inclusive date ranges (reference and prediction windows) |
//! | `sequence` | Date sequence generation |
//! | `series` | Gap-free daily precipitation series |
//! | `error` | Error types |

mod date;
mod doy;
mod error;
mod range;
mod sequence;
mod series;

pub use date::NoLeapDate;
pub use doy::{DAYS_PER_YEAR, Doy};
pub use error::CalendarError;
pub use range::DateRange;
pub use sequence::noleap_sequence;
pub use series::{DailyRecord, DailySeries};
