use anyhow::{Context, Result, bail};
use tracing::warn;

use pluvio_pipeline::{
    Combination, PROJECTION_BUFFER_DAYS, PipelineConfig, ReferenceStatistics,
    is_known_experiment, is_known_model,
};

use crate::cli::CheckArgs;
use crate::config::{self, PluvioConfig};
use crate::convert;
use crate::inputs;

/// Validate configuration, inputs and date coverage without running.
pub fn run(args: CheckArgs) -> Result<()> {
    let config = config::load(&args.config)?;
    check(&config)
}

fn check(config: &PluvioConfig) -> Result<()> {
    let pipeline_cfg = convert::build_pipeline_config(config, config.seed.unwrap_or_default())?;
    convert::build_writer_config(&config.io)?;

    let observed = inputs::load_observed(config)?;
    let observed_range = observed.range()?;
    println!("observed    {observed_range} ({} days)", observed.len());

    let stats = ReferenceStatistics::compute(&observed, &pipeline_cfg)
        .context("reference statistics")?;
    let t = stats.thresholds();
    let tail = stats.tail().params();
    println!(
        "reference   {} lower={:.2} upper={:.2} very_wet={:.2} shape={:.3} scale={:.2}",
        stats.reference(),
        t.lower(),
        t.upper(),
        t.very_wet(),
        tail.shape(),
        tail.scale()
    );

    let planned = inputs::plan(config);
    if planned.is_empty() {
        warn!("no combinations configured");
    }
    let mut n_bad = 0;
    for p in &planned {
        let verdict = p
            .load(config)
            .and_then(|c| coverage(&c, &pipeline_cfg));
        match verdict {
            Ok(()) => println!("{:<40} ready", p.id),
            Err(e) => {
                n_bad += 1;
                println!("{:<40} error: {e:#}", p.id);
            }
        }
    }
    if n_bad > 0 {
        bail!("{n_bad} of {} combination(s) cannot run", planned.len());
    }
    Ok(())
}

/// Checks that a loaded combination's data covers the configured windows.
fn coverage(combination: &Combination, config: &PipelineConfig) -> Result<()> {
    match combination {
        // Spans the observed record.
        Combination::Hindcast => {}
        Combination::Projection(gcm) => {
            if !is_known_model(gcm.model()) {
                warn!(model = gcm.model(), "model not in the known catalogue");
            }
            if !is_known_experiment(gcm.experiment()) {
                warn!(experiment = gcm.experiment(), "experiment not in the known catalogue");
            }
            let Some(prediction) = config.prediction() else {
                bail!("projection runs need a [prediction] window");
            };
            let historical = gcm.historical().range()?;
            if !historical.contains_range(config.reference()) {
                bail!(
                    "reference {} is outside the historical run {historical}",
                    config.reference()
                );
            }
            let needed = prediction.widen(PROJECTION_BUFFER_DAYS as i64);
            let projected = gcm.projected().range()?;
            if !projected.contains_range(&needed) {
                bail!("projection {projected} does not cover {needed}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::setup;

    #[test]
    fn buffered_window_passes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = setup(dir.path(), "", "2041-01-01", "2045-12-31");
        check(&config).expect("hindcast and projection are both covered");
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn window_inside_the_buffer_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        // Projection data starts 2040-01-01, five days before the window.
        let config = setup(dir.path(), "", "2040-01-06", "2045-12-31");
        let err = check(&config).unwrap_err();
        assert!(err.to_string().contains("1 of 2"), "{err:#}");
    }
}
