//! # pluvio-io
//!
//! Read daily precipitation series from Parquet and write the artifacts of a
//! downscaling run: the downscaled series, the bootstrap diagnostic table,
//! the extreme-sample table, and a JSON manifest marking the run complete.
//!
//! Dates are stored as Arrow `Date32`. Inputs on a Gregorian calendar lose
//! 29 February on the way in; outputs are always on the no-leap calendar.

mod dates;
mod error;
mod manifest;
mod parquet_read;
mod parquet_write;
mod reader;
mod validate;
mod writer;

pub use error::IoError;
pub use manifest::{ArtifactPaths, RunManifest, read_manifest, write_manifest};
pub use reader::{ReaderConfig, read_daily_series};
pub use writer::{Compression, WriterConfig, write_extremes, write_mapping, write_series};
