//! Low-level Parquet reading and column extraction.

use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, RecordBatch};
use arrow::datatypes::{Date32Type, Float32Type, Float64Type};
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::dates::date32_to_naive;
use crate::error::IoError;

/// Reads all record batches from a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist, or
/// [`IoError::Parquet`] if the file cannot be opened or read.
pub(crate) fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::File {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let batches: Vec<RecordBatch> = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(batches)
}

/// Looks a column up by name.
pub(crate) fn column<'a>(
    batch: &'a RecordBatch,
    name: &str,
    path: &Path,
) -> Result<&'a ArrayRef, IoError> {
    batch.column_by_name(name).ok_or_else(|| IoError::MissingColumn {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// Extracts a date column stored as `Date32` or as ISO `YYYY-MM-DD` strings.
/// Nulls become `None`.
pub(crate) fn date_values(array: &ArrayRef, name: &str) -> Result<Vec<Option<NaiveDate>>, IoError> {
    if let Some(arr) = array.as_primitive_opt::<Date32Type>() {
        return (0..arr.len())
            .map(|i| {
                if arr.is_null(i) {
                    Ok(None)
                } else {
                    date32_to_naive(arr.value(i)).map(Some)
                }
            })
            .collect();
    }
    if let Some(arr) = array.as_string_opt::<i32>() {
        return (0..arr.len())
            .map(|i| {
                if arr.is_null(i) {
                    return Ok(None);
                }
                let s = arr.value(i);
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map(Some)
                    .map_err(|e| IoError::InvalidDate {
                        reason: format!("'{s}' in column '{name}': {e}"),
                    })
            })
            .collect();
    }
    Err(IoError::Validation {
        count: 1,
        details: format!(
            "column '{name}' must be date32 or utf8, got {}",
            array.data_type()
        ),
    })
}

/// Extracts a float column (`Float64` or `Float32`). Nulls become NaN.
pub(crate) fn float_values(array: &ArrayRef, name: &str) -> Result<Vec<f64>, IoError> {
    if let Some(arr) = array.as_primitive_opt::<Float64Type>() {
        return Ok((0..arr.len())
            .map(|i| if arr.is_null(i) { f64::NAN } else { arr.value(i) })
            .collect());
    }
    if let Some(arr) = array.as_primitive_opt::<Float32Type>() {
        return Ok((0..arr.len())
            .map(|i| if arr.is_null(i) { f64::NAN } else { arr.value(i) as f64 })
            .collect());
    }
    Err(IoError::Validation {
        count: 1,
        details: format!(
            "column '{name}' must be float64 or float32, got {}",
            array.data_type()
        ),
    })
}
