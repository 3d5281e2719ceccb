//! Pure conversion functions: TOML config structs -> crate API config types.

use std::sync::Arc;

use anyhow::{Context, Result, bail};

use pluvio_bootstrap::{AnalogScorer, CalendarKernelScorer, KnnScorer, Sampling, UniformScorer};
use pluvio_calendar::DateRange;
use pluvio_extremes::GpdConfig;
use pluvio_io::{Compression, ReaderConfig, WriterConfig};
use pluvio_markov::{MarkovConfig, ShiftConfig, ShiftPolicy};
use pluvio_pipeline::PipelineConfig;

use crate::config::*;

/// Parses a `[start, end]` window.
pub fn parse_window(name: &str, w: &WindowToml) -> Result<DateRange> {
    DateRange::parse(&w.start, &w.end).with_context(|| format!("invalid [{name}] window"))
}

/// Parses a KNN sampling strategy name string into the corresponding enum variant.
pub fn parse_sampling(s: &str) -> Result<Sampling> {
    match s.to_lowercase().as_str() {
        "uniform" => Ok(Sampling::Uniform),
        "rank" => Ok(Sampling::Rank),
        "gaussian" => Ok(Sampling::Gaussian { bandwidth: None }),
        other => bail!("unknown sampling method: {other:?}"),
    }
}

/// Parses a shift policy name.
pub fn parse_policy(s: &str) -> Result<ShiftPolicy> {
    match s.to_lowercase().as_str() {
        "multiplicative" => Ok(ShiftPolicy::Multiplicative),
        "additive" => Ok(ShiftPolicy::Additive),
        "none" => Ok(ShiftPolicy::None),
        other => bail!("unknown shift policy: {other:?}"),
    }
}

/// Builds the analog scorer named by `[bootstrap].scorer`.
pub fn build_scorer(b: &BootstrapToml) -> Result<Arc<dyn AnalogScorer>> {
    match b.scorer.to_lowercase().as_str() {
        "knn" => {
            let mut scorer = KnnScorer::new()
                .with_sampling(parse_sampling(&b.sampling)?)
                .with_weights(b.calendar_weight, b.precip_weight);
            if let Some(k) = b.k {
                scorer = scorer.with_k(k);
            }
            scorer.validate()?;
            Ok(Arc::new(scorer))
        }
        "calendar" => {
            let mut scorer = CalendarKernelScorer::new();
            if let Some(bw) = b.bandwidth {
                scorer = scorer.with_bandwidth(bw);
            }
            scorer.validate()?;
            Ok(Arc::new(scorer))
        }
        "uniform" => Ok(Arc::new(UniformScorer)),
        other => bail!("unknown scorer: {other:?}"),
    }
}

/// Builds the [`PipelineConfig`] shared by every combination.
///
/// `seed` is the resolved base seed, not the optional one from the file.
pub fn build_pipeline_config(config: &PluvioConfig, seed: u64) -> Result<PipelineConfig> {
    let reference = parse_window("reference", &config.reference)?;
    let markov = MarkovConfig::new()
        .with_lower_threshold(config.thresholds.lower)
        .with_upper_percentile(config.thresholds.upper_percentile)
        .with_radii(config.bootstrap.narrow_radius, config.bootstrap.wide_radius);
    let shift = ShiftConfig::new()
        .with_policy(parse_policy(&config.shift.policy)?)
        .with_half_window(config.shift.half_window)
        .with_pseudo_count(config.shift.pseudo_count);
    let gpd = GpdConfig::new()
        .with_min_exceedances(config.gpd.min_exceedances)
        .with_max_iters(config.gpd.max_iters);

    let mut cfg = PipelineConfig::new(reference)
        .with_markov(markov)
        .with_shift(shift)
        .with_gpd(gpd)
        .with_scorer(build_scorer(&config.bootstrap)?)
        .with_seed(seed)
        .with_workers(config.n_workers);
    if let Some(ref w) = config.prediction {
        cfg = cfg.with_prediction(parse_window("prediction", w)?);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds the [`ReaderConfig`] for the observed series.
pub fn build_observed_reader(io: &IoToml) -> Result<ReaderConfig> {
    let cfg = ReaderConfig::default()
        .with_date_column(&io.date_column)
        .with_precip_column(&io.precip_column);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds the [`ReaderConfig`] for one climate-model combination.
pub fn build_model_reader(io: &IoToml, c: &CombinationToml) -> Result<ReaderConfig> {
    let cfg = ReaderConfig::default()
        .with_date_column(&io.date_column)
        .with_precip_column(&c.precip_column);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`WriterConfig`] from the TOML I/O configuration.
pub fn build_writer_config(io: &IoToml) -> Result<WriterConfig> {
    let compression: Compression = io.compression.parse()?;
    let cfg = WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(io.row_group_size);
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(extra: &str) -> PluvioConfig {
        let text = format!(
            r#"
            {extra}
            [reference]
            start = "1981-01-01"
            end = "2010-12-31"

            [prediction]
            start = "2041-01-01"
            end = "2070-12-31"

            [io]
            observed = "obs.parquet"
            "#
        );
        toml::from_str(&text).expect("parses")
    }

    #[test]
    fn defaults_build() {
        let cfg = build_pipeline_config(&config(""), 7).expect("valid");
        assert_eq!(cfg.seed(), 7);
        assert_eq!(cfg.markov().narrow_radius(), 7);
        assert_eq!(cfg.shift().policy(), ShiftPolicy::Multiplicative);
        assert!(cfg.prediction().is_some());
    }

    #[test]
    fn names_are_parsed() {
        assert_eq!(parse_policy("None").unwrap(), ShiftPolicy::None);
        assert!(parse_policy("quantile").is_err());
        assert_eq!(
            parse_sampling("gaussian").unwrap(),
            Sampling::Gaussian { bandwidth: None }
        );
        assert!(parse_sampling("nearest").is_err());
    }

    #[test]
    fn bad_values_fail_eagerly() {
        assert!(build_pipeline_config(&config("n_workers = 0"), 1).is_err());
        let mut cfg = config("");
        cfg.bootstrap.scorer = "random-forest".to_string();
        assert!(build_pipeline_config(&cfg, 1).is_err());
        cfg.bootstrap.scorer = "knn".to_string();
        cfg.bootstrap.k = Some(0);
        assert!(build_pipeline_config(&cfg, 1).is_err());
        cfg.bootstrap.k = None;
        cfg.thresholds.upper_percentile = 101.0;
        assert!(build_pipeline_config(&cfg, 1).is_err());
    }

    #[test]
    fn writer_compression() {
        let mut cfg = config("");
        cfg.io.compression = "zstd".to_string();
        let w = build_writer_config(&cfg.io).expect("valid");
        assert_eq!(w.compression(), Compression::Zstd);
        cfg.io.compression = "brotli".to_string();
        assert!(build_writer_config(&cfg.io).is_err());
    }
}
