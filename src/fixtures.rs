//! Synthetic inputs and configs shared by the command tests.

use std::path::{Path, PathBuf};

use pluvio_calendar::DailySeries;
use pluvio_io::{Compression, WriterConfig, write_series};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PluvioConfig;

pub fn synthetic(start: &str, years: usize, mean_wet: f64, seed: u64) -> DailySeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let values = (0..365 * years)
        .map(|_| {
            if rng.random_bool(0.45) {
                let u: f64 = rng.random_range(0.0..1.0);
                -mean_wet * (1.0 - u).ln()
            } else {
                0.0
            }
        })
        .collect();
    DailySeries::new(start.parse().expect("valid date"), values)
}

fn write_input(dir: &Path, name: &str, series: &DailySeries) -> PathBuf {
    let path = dir.join(name);
    let cfg = WriterConfig::default().with_compression(Compression::None);
    write_series(&path, series, &cfg).expect("write input");
    path
}

/// Observed 1990-2010, one MIROC6/ssp245 combination whose projection covers
/// 2040-2046, hindcast enabled, prediction window `start..=end`.
pub fn setup(dir: &Path, extra: &str, start: &str, end: &str) -> PluvioConfig {
    let observed = write_input(dir, "obs.parquet", &synthetic("1990-01-01", 21, 8.0, 1));
    let hist = write_input(dir, "hist.parquet", &synthetic("1990-01-01", 21, 8.0, 2));
    let proj = write_input(dir, "proj.parquet", &synthetic("2040-01-01", 7, 10.0, 3));
    let text = format!(
        r#"
        hindcast = true
        {extra}

        [reference]
        start = "1990-01-01"
        end = "2010-12-31"

        [prediction]
        start = "{start}"
        end = "{end}"

        [io]
        observed = "{obs}"
        output_dir = "{out}"

        [[combination]]
        model = "MIROC6"
        experiment = "ssp245"
        historical = "{hist}"
        projected = "{proj}"
        precip_column = "precip"
        "#,
        obs = observed.display(),
        out = dir.join("out").display(),
        hist = hist.display(),
        proj = proj.display(),
    );
    toml::from_str(&text).expect("valid config")
}
