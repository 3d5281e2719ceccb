//! Turning the configuration into planned combinations and loading their
//! data.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use pluvio_calendar::DailySeries;
use pluvio_io::{ArtifactPaths, read_daily_series};
use pluvio_pipeline::{
    Combination, Fingerprint, GcmInput, HINDCAST_ID, Units, output_name, projection_id,
};

use crate::config::{CombinationToml, PluvioConfig};
use crate::convert;

/// A combination named in the configuration, before its data is read.
pub struct Planned<'a> {
    pub id: String,
    pub source: Source<'a>,
}

pub enum Source<'a> {
    Hindcast,
    Model(&'a CombinationToml),
}

/// Hindcast first when enabled, then `[[combination]]` entries in file
/// order.
pub fn plan(config: &PluvioConfig) -> Vec<Planned<'_>> {
    let hindcast = config.hindcast.then(|| Planned {
        id: HINDCAST_ID.to_string(),
        source: Source::Hindcast,
    });
    hindcast
        .into_iter()
        .chain(config.combinations.iter().map(|c| Planned {
            id: projection_id(&c.model, &c.experiment),
            source: Source::Model(c),
        }))
        .collect()
}

impl Planned<'_> {
    /// Where this combination's artifacts go.
    pub fn artifacts(&self, output_dir: &Path) -> ArtifactPaths {
        ArtifactPaths::new(output_dir, output_name(&self.id))
    }

    /// Digest of everything that determines this combination's outputs.
    pub fn fingerprint(&self, config: &PluvioConfig, seed: u64) -> Result<String> {
        let mut fp = Fingerprint::new()
            .field("version", env!("CARGO_PKG_VERSION"))
            .field("combination", &self.id)
            .field("seed", seed)
            .field("reference", toml::to_string(&config.reference)?)
            .field("thresholds", toml::to_string(&config.thresholds)?)
            .field("bootstrap", toml::to_string(&config.bootstrap)?)
            .field("shift", toml::to_string(&config.shift)?)
            .field("gpd", toml::to_string(&config.gpd)?)
            .field("observed", config.io.observed.display())
            .field("observed_column", &config.io.precip_column);
        if let Source::Model(c) = self.source {
            if let Some(ref p) = config.prediction {
                fp = fp.field("prediction", toml::to_string(p)?);
            }
            fp = fp.field("model", toml::to_string(c)?);
        }
        Ok(fp.finish())
    }

    /// Reads the climate-model inputs and builds the pipeline combination.
    pub fn load(&self, config: &PluvioConfig) -> Result<Combination> {
        match self.source {
            Source::Hindcast => Ok(Combination::Hindcast),
            Source::Model(c) => {
                let reader = convert::build_model_reader(&config.io, c)?;
                let historical = read_daily_series(&c.historical, &reader).with_context(|| {
                    format!("failed to read historical run: {}", c.historical.display())
                })?;
                let projected = read_daily_series(&c.projected, &reader).with_context(|| {
                    format!("failed to read projection: {}", c.projected.display())
                })?;
                let units = if c.flux_units {
                    Units::KgPerM2PerS
                } else {
                    Units::MmPerDay
                };
                Ok(Combination::Projection(
                    GcmInput::new(&c.model, &c.experiment, historical, projected)
                        .with_units(units),
                ))
            }
        }
    }
}

/// Reads the observed series named in `[io]`.
pub fn load_observed(config: &PluvioConfig) -> Result<DailySeries> {
    let reader = convert::build_observed_reader(&config.io)?;
    let path = &config.io.observed;
    info!(path = %path.display(), "reading observed series");
    read_daily_series(path, &reader)
        .with_context(|| format!("failed to read observed series: {}", path.display()))
}
