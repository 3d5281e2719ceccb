//! Reading daily precipitation series from Parquet.

use std::path::Path;

use pluvio_calendar::{DailyRecord, DailySeries, NoLeapDate};
use tracing::{debug, info};

use crate::error::IoError;
use crate::parquet_read;
use crate::validate::validate_records;

/// Column names of a daily precipitation table.
///
/// The [`Default`] expects `date` and `precip`; climate-model extracts
/// usually name the value column `pr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    date_column: String,
    precip_column: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            date_column: "date".into(),
            precip_column: "precip".into(),
        }
    }
}

impl ReaderConfig {
    /// Set the date column name.
    pub fn with_date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = name.into();
        self
    }

    /// Set the precipitation column name.
    pub fn with_precip_column(mut self, name: impl Into<String>) -> Self {
        self.precip_column = name.into();
        self
    }

    /// Date column name.
    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    /// Precipitation column name.
    pub fn precip_column(&self) -> &str {
        &self.precip_column
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if a name is empty or both names are
    /// the same.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.date_column.is_empty() || self.precip_column.is_empty() {
            return Err(IoError::Validation {
                count: 1,
                details: "column names must not be empty".to_string(),
            });
        }
        if self.date_column == self.precip_column {
            return Err(IoError::Validation {
                count: 1,
                details: format!("date and precip both use column '{}'", self.date_column),
            });
        }
        Ok(())
    }
}

/// Reads a daily precipitation series from a Parquet file.
///
/// Dates may be stored as `Date32` or ISO strings, on any Gregorian-style
/// calendar: 29 February is dropped and the remaining days are placed on the
/// no-leap calendar. Rows may come in any order; the result is sorted.
/// Values are returned as stored, with no unit conversion.
///
/// # Errors
///
/// [`IoError::MissingColumn`] for absent columns, [`IoError::Validation`]
/// for null dates, duplicate dates, negative or missing values, and
/// [`IoError::Calendar`] if the days left are not contiguous.
#[tracing::instrument(skip(config), fields(path = %path.display()))]
pub fn read_daily_series(path: &Path, config: &ReaderConfig) -> Result<DailySeries, IoError> {
    config.validate()?;
    let batches = parquet_read::read_batches(path)?;

    let mut records = Vec::new();
    let mut n_leap = 0usize;
    let mut n_null_dates = 0usize;
    for batch in &batches {
        let dates = parquet_read::date_values(
            parquet_read::column(batch, &config.date_column, path)?,
            &config.date_column,
        )?;
        let values = parquet_read::float_values(
            parquet_read::column(batch, &config.precip_column, path)?,
            &config.precip_column,
        )?;
        for (date, precip) in dates.into_iter().zip(values) {
            let Some(date) = date else {
                n_null_dates += 1;
                continue;
            };
            match NoLeapDate::from_naive(date) {
                Some(date) => records.push(DailyRecord { date, precip }),
                None => n_leap += 1,
            }
        }
    }

    if n_null_dates > 0 {
        return Err(IoError::Validation {
            count: n_null_dates,
            details: format!("{n_null_dates} row(s) with a null date"),
        });
    }
    if n_leap > 0 {
        debug!(n_leap, "dropped 29 February rows");
    }

    records.sort_by_key(|r| r.date);
    validate_records(&records).finish()?;
    let series = DailySeries::from_records(&records)?;
    info!(
        start = %series.start(),
        end = %series.end(),
        n_days = series.len(),
        "daily series loaded"
    );
    Ok(series)
}
