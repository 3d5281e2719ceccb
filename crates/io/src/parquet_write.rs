//! Low-level Parquet column building.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, Float64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use pluvio_bootstrap::BootstrapMapping;
use pluvio_calendar::{DailySeries, NoLeapDate};
use pluvio_extremes::ExtremeSample;

use crate::dates::noleap_to_date32;
use crate::error::IoError;

/// Schema of a downscaled series: `date`, `precip`.
pub(crate) fn series_schema() -> Schema {
    Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("precip", DataType::Float64, false),
    ])
}

/// Schema of the bootstrap diagnostic table.
///
/// The `next_*` columns are null on the last row.
pub(crate) fn mapping_schema() -> Schema {
    Schema::new(vec![
        Field::new("target_date", DataType::Date32, false),
        Field::new("historic_date", DataType::Date32, false),
        Field::new("historic_precip", DataType::Float64, false),
        Field::new("wet_state", DataType::Utf8, false),
        Field::new("next_wet_state", DataType::Utf8, true),
        Field::new("next_historic_date", DataType::Date32, true),
    ])
}

/// Schema of the extreme-sample table.
pub(crate) fn extremes_schema() -> Schema {
    Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("historic_sample", DataType::Float64, false),
        Field::new("forecast_sample", DataType::Float64, false),
        Field::new("shape", DataType::Float64, false),
        Field::new("scale", DataType::Float64, false),
        Field::new("threshold", DataType::Float64, false),
    ])
}

fn date_column(dates: impl Iterator<Item = NoLeapDate>) -> Result<ArrayRef, IoError> {
    let days = dates.map(noleap_to_date32).collect::<Result<Vec<_>, _>>()?;
    Ok(Arc::new(Date32Array::from(days)))
}

fn optional_date_column(
    dates: impl Iterator<Item = Option<NoLeapDate>>,
) -> Result<ArrayRef, IoError> {
    let days = dates
        .map(|d| d.map(noleap_to_date32).transpose())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Arc::new(Date32Array::from(days)))
}

fn float_column(values: impl Iterator<Item = f64>) -> ArrayRef {
    Arc::new(Float64Array::from_iter_values(values))
}

/// Converts a daily series into a [`RecordBatch`] with [`series_schema`].
pub(crate) fn series_to_record_batch(
    series: &DailySeries,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let columns = vec![
        date_column(series.records().map(|r| r.date))?,
        float_column(series.values().iter().copied()),
    ];
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Converts a bootstrap mapping into a [`RecordBatch`] with
/// [`mapping_schema`].
pub(crate) fn mapping_to_record_batch(
    mapping: &BootstrapMapping,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let rows = mapping.rows();
    let wet_state: ArrayRef = Arc::new(StringArray::from_iter_values(
        rows.iter().map(|r| r.wet_state.label()),
    ));
    let next_wet_state: ArrayRef = Arc::new(
        rows.iter()
            .map(|r| r.next_wet_state.map(|s| s.label()))
            .collect::<StringArray>(),
    );
    let columns = vec![
        date_column(rows.iter().map(|r| r.target_date))?,
        date_column(rows.iter().map(|r| r.historic_date))?,
        float_column(rows.iter().map(|r| r.historic_precip)),
        wet_state,
        next_wet_state,
        optional_date_column(rows.iter().map(|r| r.next_historic_date))?,
    ];
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Converts extreme samples into a [`RecordBatch`] with
/// [`extremes_schema`].
pub(crate) fn extremes_to_record_batch(
    samples: &[ExtremeSample],
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let columns = vec![
        date_column(samples.iter().map(|s| s.date))?,
        float_column(samples.iter().map(|s| s.historic_sample)),
        float_column(samples.iter().map(|s| s.forecast_sample)),
        float_column(samples.iter().map(|s| s.shape)),
        float_column(samples.iter().map(|s| s.scale)),
        float_column(samples.iter().map(|s| s.threshold)),
    ];
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`IoError::File`] if the file cannot be created, or
/// [`IoError::Parquet`] if batch writing or file finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::File {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}
