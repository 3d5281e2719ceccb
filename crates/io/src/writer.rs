//! High-level Parquet writer configuration and orchestration.

use std::path::Path;
use std::str::FromStr;

use arrow::array::RecordBatch;
use arrow::datatypes::Schema;
use parquet::file::properties::WriterProperties;
use pluvio_bootstrap::BootstrapMapping;
use pluvio_calendar::DailySeries;
use pluvio_extremes::ExtremeSample;
use tracing::debug;

use crate::error::IoError;
use crate::parquet_write;

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level =
                    parquet::basic::ZstdLevel::try_new(3).map_err(|e| IoError::Parquet {
                        reason: e.to_string(),
                    })?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

impl FromStr for Compression {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "uncompressed" => Ok(Self::None),
            "snappy" => Ok(Self::Snappy),
            "zstd" => Ok(Self::Zstd),
            other => Err(IoError::Validation {
                count: 1,
                details: format!("unknown compression '{other}', expected none, snappy or zstd"),
            }),
        }
    }
}

/// Configuration for writing run artifacts to Parquet.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Compression algorithm to use.
    compression: Compression,
    /// Maximum number of rows per row group.
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Compression algorithm.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `row_group_size` is zero.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.row_group_size == 0 {
            return Err(IoError::Validation {
                count: 1,
                details: "row_group_size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn properties(&self) -> Result<WriterProperties, IoError> {
        self.validate()?;
        Ok(WriterProperties::builder()
            .set_compression(self.compression.to_parquet()?)
            .set_max_row_group_size(self.row_group_size)
            .build())
    }
}

fn write_single(
    path: &Path,
    batch: &RecordBatch,
    schema: &Schema,
    config: &WriterConfig,
) -> Result<(), IoError> {
    let props = config.properties()?;
    parquet_write::write_batches(path, std::slice::from_ref(batch), schema, props)?;
    debug!(path = %path.display(), n_rows = batch.num_rows(), "parquet written");
    Ok(())
}

/// Writes a downscaled series as a `date`, `precip` table.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration is invalid,
/// [`IoError::InvalidDate`] for dates without a Gregorian equivalent, or
/// [`IoError::File`]/[`IoError::Parquet`] if writing fails.
pub fn write_series(
    path: &Path,
    series: &DailySeries,
    config: &WriterConfig,
) -> Result<(), IoError> {
    let schema = parquet_write::series_schema();
    let batch = parquet_write::series_to_record_batch(series, &schema)?;
    write_single(path, &batch, &schema, config)
}

/// Writes the bootstrap diagnostic table.
///
/// # Errors
///
/// As for [`write_series`].
pub fn write_mapping(
    path: &Path,
    mapping: &BootstrapMapping,
    config: &WriterConfig,
) -> Result<(), IoError> {
    let schema = parquet_write::mapping_schema();
    let batch = parquet_write::mapping_to_record_batch(mapping, &schema)?;
    write_single(path, &batch, &schema, config)
}

/// Writes the extreme-sample table. An empty slice produces a valid file
/// with no rows.
///
/// # Errors
///
/// As for [`write_series`].
pub fn write_extremes(
    path: &Path,
    samples: &[ExtremeSample],
    config: &WriterConfig,
) -> Result<(), IoError> {
    let schema = parquet_write::extremes_schema();
    let batch = parquet_write::extremes_to_record_batch(samples, &schema)?;
    write_single(path, &batch, &schema, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_from_str() {
        assert_eq!("zstd".parse::<Compression>().unwrap(), Compression::Zstd);
        assert_eq!("Snappy".parse::<Compression>().unwrap(), Compression::Snappy);
        assert_eq!("none".parse::<Compression>().unwrap(), Compression::None);
        assert!("lz4".parse::<Compression>().is_err());
    }

    #[test]
    fn zero_row_group_rejected() {
        let err = WriterConfig::default()
            .with_row_group_size(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, IoError::Validation { .. }));
    }

    #[test]
    fn every_compression_builds_properties() {
        for c in [Compression::None, Compression::Snappy, Compression::Zstd] {
            assert!(WriterConfig::default().with_compression(c).properties().is_ok());
        }
    }
}
