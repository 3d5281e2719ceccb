//! Per-combination runs and the worker pool that schedules them.

use pluvio_bootstrap::{BootstrapMapping, bootstrap_dates};
use pluvio_calendar::{DailySeries, DateRange};
use pluvio_extremes::{ExtremeSample, GpdParams, ProjectionDelta, fit_gpd, synthesize_extremes};
use pluvio_markov::{ShiftPolicy, ShiftSignal, StateThresholds};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use crate::catalogue::{is_known_experiment, is_known_model};
use crate::combination::{Combination, GcmInput};
use crate::config::{PROJECTION_BUFFER_DAYS, PipelineConfig};
use crate::error::PipelineError;
use crate::reference::{ReferenceStatistics, require_within, slice_within};

/// Everything one successful combination produces.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinationOutput {
    /// Combination id.
    pub id: String,
    /// Seed the combination ran with.
    pub seed: u64,
    /// Window that was synthesised.
    pub prediction: DateRange,
    /// Final downscaled series.
    pub series: DailySeries,
    /// Target-to-analog date mapping.
    pub mapping: BootstrapMapping,
    /// Resampled very-wet days.
    pub extremes: Vec<ExtremeSample>,
    /// Tail the very-wet days were drawn from.
    pub tail: GpdParams,
}

/// Result of one combination, success or failure.
#[derive(Debug, Clone)]
pub struct CombinationOutcome {
    /// Combination id.
    pub id: String,
    /// Output or the error that stopped this combination.
    pub result: Result<CombinationOutput, PipelineError>,
}

/// Inputs validated and resolved before any random draw.
struct Prepared {
    prediction: DateRange,
    shift: Option<ShiftSignal>,
    projected_tail: Option<GpdParams>,
}

/// Runs classification, bootstrap and extreme synthesis for one combination.
///
/// Date ranges and inputs are validated before the random number generator
/// is created. The generator is seeded with `combination.seed(base_seed)`.
///
/// # Errors
///
/// [`PipelineError`] of kind `DateRangeError` or `InvalidInput` from
/// validation, `InsufficientData` from the analog walk, `FitFailure` from the
/// climate-model tail fits.
#[tracing::instrument(skip_all, fields(combination = %combination.id()))]
pub fn run_combination(
    observed: &DailySeries,
    stats: &ReferenceStatistics,
    combination: &Combination,
    config: &PipelineConfig,
    base_seed: u64,
) -> Result<CombinationOutput, PipelineError> {
    let prepared = match combination {
        Combination::Hindcast => prepare_hindcast(observed)?,
        Combination::Projection(gcm) => prepare_projection(gcm, stats, config)?,
    };

    let seed = combination.seed(base_seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let targets = prepared.prediction.dates();
    let mapping = bootstrap_dates(
        &targets,
        stats.table(),
        prepared.shift.as_ref(),
        config.scorer(),
        &mut rng,
    )?;
    let observed_tail = stats.tail().params();
    let synthesis = synthesize_extremes(
        &mapping,
        observed_tail,
        prepared.projected_tail.as_ref(),
        &mut rng,
    )?;

    Ok(CombinationOutput {
        id: combination.id(),
        seed,
        prediction: prepared.prediction,
        series: synthesis.series,
        mapping,
        extremes: synthesis.samples,
        tail: prepared.projected_tail.unwrap_or(*observed_tail),
    })
}

/// The hindcast always spans the whole observed record.
fn prepare_hindcast(observed: &DailySeries) -> Result<Prepared, PipelineError> {
    let prediction = observed.range()?;
    Ok(Prepared {
        prediction,
        shift: None,
        projected_tail: None,
    })
}

fn prepare_projection(
    gcm: &GcmInput,
    stats: &ReferenceStatistics,
    config: &PipelineConfig,
) -> Result<Prepared, PipelineError> {
    let prediction = *config
        .prediction()
        .ok_or_else(|| PipelineError::InvalidInput {
            reason: "projection runs need a prediction window".to_string(),
        })?;
    if !is_known_model(gcm.model()) {
        warn!(model = gcm.model(), "model not in the known catalogue");
    }
    if !is_known_experiment(gcm.experiment()) {
        warn!(experiment = gcm.experiment(), "experiment not in the known catalogue");
    }

    let historical = gcm.units().series_to_mm_day(gcm.historical());
    let projected = gcm.units().series_to_mm_day(gcm.projected());
    let reference = stats.reference();
    let hist_ref = slice_within(&historical, reference, "reference", "climate-model historical run")?;
    let buffered = prediction.widen(PROJECTION_BUFFER_DAYS as i64);
    require_within(
        &format!("prediction ±{PROJECTION_BUFFER_DAYS} days"),
        &buffered,
        &projected.range()?,
        "climate-model projection",
    )?;
    let proj_window = slice_within(&projected, &prediction, "prediction", "climate-model projection")?;

    let (shift, gcm_thresholds) = if config.shift().policy() == ShiftPolicy::None {
        let t = StateThresholds::from_reference(hist_ref.values(), config.markov())?;
        (None, t)
    } else {
        let signal = ShiftSignal::estimate(
            &historical,
            &projected,
            reference,
            &prediction,
            config.markov(),
            config.shift(),
        )?;
        let t = *signal.gcm_thresholds();
        (Some(signal), t)
    };

    let hist_fit = fit_gpd(hist_ref.values(), gcm_thresholds.very_wet(), config.gpd())?;
    let proj_fit = fit_gpd(proj_window.values(), gcm_thresholds.very_wet(), config.gpd())?;
    let delta = ProjectionDelta::between(&hist_fit, &proj_fit);
    debug!(
        scale_ratio = delta.scale_ratio,
        shape_delta = delta.shape_delta,
        rate_ratio = delta.rate_ratio,
        "climate-model tail change"
    );
    let projected_tail = delta.apply(stats.tail().params())?;

    Ok(Prepared {
        prediction,
        shift,
        projected_tail: Some(projected_tail),
    })
}

/// Runs every combination against statistics computed once from
/// `observed`.
///
/// With one worker the combinations run sequentially; otherwise on a rayon
/// pool of `config.n_workers()` threads. Outcomes come back in input order,
/// and a failed combination never stops its siblings. Every combination
/// derives its seed from `config.seed()`.
///
/// # Errors
///
/// Only failures shared by all combinations: configuration, reference
/// statistics, worker pool start-up.
#[tracing::instrument(skip_all, fields(n_combinations = combinations.len(), n_workers = config.n_workers()))]
pub fn run_all(
    observed: &DailySeries,
    combinations: &[Combination],
    config: &PipelineConfig,
) -> Result<Vec<CombinationOutcome>, PipelineError> {
    let stats = ReferenceStatistics::compute(observed, config)?;
    let base_seed = config.seed();

    let run_one = |combination: &Combination| {
        let id = combination.id();
        let _span = info_span!("combination", id = %id).entered();
        let result = run_combination(observed, &stats, combination, config, base_seed);
        match &result {
            Ok(out) => info!(n_extremes = out.extremes.len(), "combination complete"),
            Err(e) => warn!(kind = %e.kind(), error = %e, "combination failed"),
        }
        CombinationOutcome { id, result }
    };

    if config.n_workers() <= 1 || combinations.len() <= 1 {
        return Ok(combinations.iter().map(&run_one).collect());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.n_workers())
        .build()
        .map_err(|e| PipelineError::InvalidInput {
            reason: format!("cannot start worker pool: {e}"),
        })?;
    Ok(pool.install(|| combinations.par_iter().map(&run_one).collect()))
}
