use pluvio_bootstrap::{
    AnalogScorer, BootstrapError, CalendarKernelScorer, KnnScorer, Sampling, UniformScorer,
    bootstrap_dates,
};
use pluvio_calendar::{DailySeries, DateRange, NoLeapDate};
use pluvio_markov::{
    MarkovConfig, MarkovError, PrecipState, ShiftConfig, ShiftSignal, StateThresholds,
    TransitionTable,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn date(s: &str) -> NoLeapDate {
    s.parse().unwrap()
}

/// Synthetic daily precipitation: ~55% dry days, gamma-ish wet amounts with
/// a seasonal cycle.
fn synthetic(start: &str, years: usize, wet_prob: f64, seed: u64) -> DailySeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let values = (0..365 * years)
        .map(|i| {
            let season = 1.0 + 0.5 * (2.0 * std::f64::consts::PI * (i % 365) as f64 / 365.0).sin();
            if rng.random_bool(wet_prob) {
                let u: f64 = rng.random_range(0.0..1.0);
                -8.0 * season * (1.0 - u).ln()
            } else {
                0.0
            }
        })
        .collect();
    DailySeries::new(date(start), values)
}

struct Fixture {
    table: TransitionTable,
    thresholds: StateThresholds,
    observed: DailySeries,
}

fn fixture() -> Fixture {
    let observed = synthetic("1990-01-01", 21, 0.45, 1);
    let reference = DateRange::parse("1990-01-01", "2010-12-31").unwrap();
    let config = MarkovConfig::new().with_lower_threshold(1.0).with_upper_percentile(90.0);
    let thresholds = StateThresholds::from_reference(observed.values(), &config).unwrap();
    let table = TransitionTable::build(&observed, &reference, &thresholds, &config).unwrap();
    Fixture {
        table,
        thresholds,
        observed,
    }
}

fn targets() -> Vec<NoLeapDate> {
    DateRange::parse("2041-01-01", "2045-12-31").unwrap().dates()
}

#[test]
fn same_seed_same_mapping() {
    let f = fixture();
    let targets = targets();
    let scorer = KnnScorer::new();
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        bootstrap_dates(&targets, &f.table, None, &scorer, &mut rng).unwrap()
    };
    assert_eq!(run(2024), run(2024));
    assert_ne!(run(2024).source_dates(), run(2025).source_dates());
}

#[test]
fn analog_states_match_classification_and_calendar() {
    let f = fixture();
    let targets = targets();
    let mut rng = StdRng::seed_from_u64(9);
    let mapping = bootstrap_dates(&targets, &f.table, None, &KnnScorer::new(), &mut rng).unwrap();

    assert_eq!(mapping.len(), targets.len());
    for (entry, &target) in mapping.entries().iter().zip(&targets) {
        assert_eq!(entry.target, target);
        assert_eq!(f.observed.value_on(entry.source), Some(entry.precip));
        assert_eq!(f.thresholds.classify(entry.precip).unwrap(), entry.state);
        let gap = entry.source.doy().circular_distance(target.doy());
        assert!(gap <= entry.radius, "{target}: analog {} is {gap} days off", entry.source);
    }
}

#[test]
fn every_scorer_produces_a_full_mapping() {
    let f = fixture();
    let targets = targets();
    let scorers: Vec<Box<dyn AnalogScorer>> = vec![
        Box::new(KnnScorer::new()),
        Box::new(KnnScorer::new().with_sampling(Sampling::Gaussian { bandwidth: None })),
        Box::new(KnnScorer::new().with_k(1).with_sampling(Sampling::Uniform)),
        Box::new(CalendarKernelScorer::new()),
        Box::new(UniformScorer),
    ];
    for scorer in &scorers {
        let mut rng = StdRng::seed_from_u64(5);
        let mapping = bootstrap_dates(&targets, &f.table, None, scorer.as_ref(), &mut rng).unwrap();
        assert_eq!(mapping.len(), targets.len(), "{scorer:?}");
    }
}

#[test]
fn wetter_projection_shifts_state_frequencies() {
    let f = fixture();
    let reference = DateRange::parse("1990-01-01", "2010-12-31").unwrap();
    let prediction = DateRange::parse("2041-01-01", "2045-12-31").unwrap();
    let gcm_hist = synthetic("1990-01-01", 21, 0.45, 21);
    let gcm_proj = synthetic("2040-01-01", 7, 0.75, 22);
    let signal = ShiftSignal::estimate(
        &gcm_hist,
        &gcm_proj,
        &reference,
        &prediction,
        &MarkovConfig::new(),
        &ShiftConfig::new(),
    )
    .unwrap();

    let targets = prediction.dates();
    let dry_share = |shift: Option<&ShiftSignal>| {
        let mut rng = StdRng::seed_from_u64(77);
        let m = bootstrap_dates(&targets, &f.table, shift, &UniformScorer, &mut rng).unwrap();
        m.entries()
            .iter()
            .filter(|e| e.state == PrecipState::Dry)
            .count() as f64
            / m.len() as f64
    };
    let plain = dry_share(None);
    let shifted = dry_share(Some(&signal));
    assert!(
        shifted < plain - 0.05,
        "dry share {shifted} not clearly below unshifted {plain}"
    );
}

#[test]
fn storm_on_last_record_day_has_no_successor_analog() {
    // One year of record; the only very-wet day is its final day, so no
    // analog exists for "the day after a very-wet day".
    let start = date("2001-01-01");
    let mut values = vec![0.0; 365];
    values[364] = 80.0;
    let observed = DailySeries::new(start, values);
    let reference = observed.range().unwrap();
    let thresholds = StateThresholds::new(1.0, 5.0, 20.0).unwrap();
    let table =
        TransitionTable::build(&observed, &reference, &thresholds, &MarkovConfig::new()).unwrap();

    let targets = [date("2050-12-31"), date("2051-01-01")];
    let mut failures = 0;
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        match bootstrap_dates(&targets, &table, None, &UniformScorer, &mut rng) {
            Ok(mapping) => assert_ne!(mapping.entries()[0].state, PrecipState::VeryWet),
            Err(BootstrapError::NoAnalog { target, source }) => {
                assert_eq!(target, "2051-01-01");
                assert!(matches!(
                    source,
                    MarkovError::InsufficientData {
                        doy: 1,
                        prior: Some(PrecipState::VeryWet),
                        narrow_radius: 7,
                        wide_radius: 14,
                    }
                ));
                failures += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert!(failures > 0);
}

#[test]
fn empty_targets_rejected() {
    let f = fixture();
    let mut rng = StdRng::seed_from_u64(1);
    assert!(matches!(
        bootstrap_dates(&[], &f.table, None, &UniformScorer, &mut rng),
        Err(BootstrapError::EmptyTarget)
    ));
}
