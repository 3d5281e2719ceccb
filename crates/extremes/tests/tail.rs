use pluvio_bootstrap::{BootstrapMapping, KnnScorer, MappingEntry, bootstrap_dates};
use pluvio_calendar::{DailySeries, DateRange, NoLeapDate};
use pluvio_extremes::{
    ExtremeError, GpdConfig, GpdParams, ProjectionDelta, fit_gpd, synthesize_extremes,
};
use pluvio_markov::{MarkovConfig, PrecipState, StateThresholds, TransitionTable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn date(s: &str) -> NoLeapDate {
    s.parse().unwrap()
}

/// Daily series with ~40% wet days and exponential amounts.
fn synthetic(start: &str, years: usize, mean_wet: f64, seed: u64) -> DailySeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let values = (0..365 * years)
        .map(|_| {
            if rng.random_bool(0.4) {
                let u: f64 = rng.random_range(0.0..1.0);
                -mean_wet * (1.0 - u).ln()
            } else {
                0.0
            }
        })
        .collect();
    DailySeries::new(date(start), values)
}

#[test]
fn synthesized_exceedance_rates_match_the_tail() {
    let params = GpdParams::new(0.15, 10.0, 30.0).unwrap();
    let start = date("2060-01-01");
    let all_very_wet = BootstrapMapping::from_entries(
        (0..365)
            .map(|i| MappingEntry {
                target: start.add_days(i),
                source: date("2000-01-01"),
                source_index: 0,
                precip: 31.0,
                state: PrecipState::VeryWet,
                radius: 7,
            })
            .collect(),
    );

    let mut values = Vec::new();
    for seed in 0..60 {
        let mut rng = StdRng::seed_from_u64(seed);
        let out = synthesize_extremes(&all_very_wet, &params, None, &mut rng).unwrap();
        values.extend_from_slice(out.series.values());
    }
    let n = values.len() as f64;
    for p in [0.5, 0.9, 0.99] {
        let level = params.quantile(p);
        let empirical = values.iter().filter(|&&v| v > level).count() as f64 / n;
        let expected = params.survival(level);
        assert!(
            (empirical - expected).abs() < 0.012,
            "level {level}: empirical {empirical}, expected {expected}"
        );
    }
}

#[test]
fn hindcast_and_projection_end_to_end() {
    let observed = synthetic("1990-01-01", 21, 8.0, 1);
    let reference = DateRange::parse("1990-01-01", "2010-12-31").unwrap();
    let config = MarkovConfig::new();
    let thresholds = StateThresholds::from_reference(observed.values(), &config).unwrap();
    let table = TransitionTable::build(&observed, &reference, &thresholds, &config).unwrap();
    let observed_fit = fit_gpd(observed.values(), thresholds.very_wet(), &GpdConfig::new()).unwrap();

    let targets = DateRange::parse("2041-01-01", "2045-12-31").unwrap().dates();
    let mut rng = StdRng::seed_from_u64(3);
    let mapping = bootstrap_dates(&targets, &table, None, &KnnScorer::new(), &mut rng).unwrap();

    // Wetter model tail: same threshold, exponential amounts 75% larger.
    let gcm_hist = synthetic("1990-01-01", 21, 8.0, 10);
    let gcm_proj = synthetic("2040-01-01", 7, 14.0, 11);
    let gcm_threshold = thresholds.very_wet();
    let hist_fit = fit_gpd(gcm_hist.values(), gcm_threshold, &GpdConfig::new()).unwrap();
    let proj_fit = fit_gpd(gcm_proj.values(), gcm_threshold, &GpdConfig::new()).unwrap();
    let delta = ProjectionDelta::between(&hist_fit, &proj_fit);
    assert!(delta.scale_ratio > 1.0, "{delta:?}");
    let projected = delta.apply(observed_fit.params()).unwrap();

    let hindcast = synthesize_extremes(&mapping, observed_fit.params(), None, &mut rng).unwrap();
    let future =
        synthesize_extremes(&mapping, observed_fit.params(), Some(&projected), &mut rng).unwrap();

    for out in [&hindcast, &future] {
        assert_eq!(out.series.len(), targets.len());
        assert_eq!(out.series.start(), targets[0]);
        let n_very_wet = mapping
            .entries()
            .iter()
            .filter(|e| e.state == PrecipState::VeryWet)
            .count();
        assert_eq!(out.samples.len(), n_very_wet);
        assert!(out.samples.iter().all(|s| s.forecast_sample > thresholds.very_wet()));
        for (entry, &v) in mapping.entries().iter().zip(out.series.values()) {
            if entry.state != PrecipState::VeryWet {
                assert_eq!(v, entry.precip);
            }
        }
    }
    let mean = |s: &[pluvio_extremes::ExtremeSample]| {
        s.iter().map(|x| x.forecast_sample).sum::<f64>() / s.len() as f64
    };
    assert!(mean(&future.samples) > mean(&hindcast.samples) * 0.9);
}

#[test]
fn degenerate_model_tail_fails_the_fit() {
    // A model that almost never exceeds the observed very-wet threshold.
    let dry_model = DailySeries::new(date("2040-01-01"), vec![0.5; 365 * 7]);
    let err = fit_gpd(dry_model.values(), 30.0, &GpdConfig::new()).unwrap_err();
    assert!(matches!(err, ExtremeError::FitFailure { n_exceedances: 0, .. }));
}
