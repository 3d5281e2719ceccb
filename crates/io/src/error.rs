//! Error types for pluvio-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the pluvio-io crate.
///
/// Covers file-system failures, Parquet and JSON format errors, calendar
/// conversion issues and data validation problems met when reading inputs
/// or writing run artifacts.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps a file-system failure.
    #[error("i/o error on {}: {reason}", path.display())]
    File {
        /// Path being accessed.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Wraps a JSON (de)serialisation failure.
    #[error("manifest error: {reason}")]
    Manifest {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps an error originating from the pluvio-calendar crate.
    #[error("calendar error: {reason}")]
    Calendar {
        /// Description of the underlying calendar failure.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a required column is not present in a file.
    #[error("column '{name}' not found in {}", path.display())]
    MissingColumn {
        /// Name of the missing column.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a date value cannot be parsed or is out of range.
    #[error("invalid date: {reason}")]
    InvalidDate {
        /// Description of the date issue.
        reason: String,
    },
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Manifest {
            reason: e.to_string(),
        }
    }
}

impl From<pluvio_calendar::CalendarError> for IoError {
    fn from(e: pluvio_calendar::CalendarError) -> Self {
        IoError::Calendar {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.parquet"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.parquet");
    }

    #[test]
    fn display_validation() {
        let err = IoError::Validation {
            count: 2,
            details: "negative precipitation on 2001-03-04: -1; duplicate date 2001-03-05"
                .to_string(),
        };
        assert_eq!(
            err.to_string(),
            "2 validation error(s): negative precipitation on 2001-03-04: -1; duplicate date 2001-03-05"
        );
    }

    #[test]
    fn display_missing_column() {
        let err = IoError::MissingColumn {
            name: "pr".to_string(),
            path: PathBuf::from("/data/obs.parquet"),
        };
        assert_eq!(err.to_string(), "column 'pr' not found in /data/obs.parquet");
    }

    #[test]
    fn from_parquet_error() {
        let pq_err = parquet::errors::ParquetError::General("test pq error".to_string());
        let err: IoError = pq_err.into();
        assert!(matches!(err, IoError::Parquet { .. }));
        assert!(err.to_string().contains("test pq error"));
    }

    #[test]
    fn from_calendar_error() {
        let cal_err = pluvio_calendar::CalendarError::InvalidDoy { doy: 0 };
        let err: IoError = cal_err.into();
        assert!(matches!(err, IoError::Calendar { .. }));
        assert!(err.to_string().contains("calendar error"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
