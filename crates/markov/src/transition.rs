//! Day-of-year analog transition statistics.
//!
//! For every day-of-year and prior-day state the table holds the reference
//! days inside a circular calendar window whose predecessor had that state.
//! Their own states form the empirical next-state distribution; the days
//! themselves are the analog candidates.

use pluvio_calendar::{DAYS_PER_YEAR, DailySeries, DateRange, Doy, NoLeapDate};
use tracing::{debug, info};

use crate::config::MarkovConfig;
use crate::error::MarkovError;
use crate::state::{N_STATES, PrecipState};
use crate::threshold::StateThresholds;

/// Slots per day-of-year: one per prior state plus the unconditional slot.
const SLOTS: usize = N_STATES + 1;

/// A historical day eligible as an analog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Position in the observed series.
    pub index: usize,
    /// Calendar date of the candidate.
    pub date: NoLeapDate,
    /// Signed day-of-year offset from the context day (`-radius..=radius`).
    pub offset: i16,
    /// State of the candidate day.
    pub state: PrecipState,
    /// Precipitation on the candidate day.
    pub precip: f64,
    /// Precipitation on the day before, if the observed record has it.
    pub prior_precip: Option<f64>,
    /// State of the day before, if the observed record has it.
    pub prior_state: Option<PrecipState>,
}

/// Candidates for one (day-of-year, prior state) context.
#[derive(Debug, Clone, Default)]
pub struct ContextCandidates {
    radius: u16,
    candidates: Vec<Candidate>,
    counts: [usize; N_STATES],
}

impl ContextCandidates {
    fn new(radius: u16, candidates: Vec<Candidate>) -> Self {
        let mut counts = [0usize; N_STATES];
        for c in &candidates {
            counts[c.state.as_index()] += 1;
        }
        Self {
            radius,
            candidates,
            counts,
        }
    }

    /// Calendar radius these candidates were gathered with.
    pub fn radius(&self) -> u16 {
        self.radius
    }

    /// All candidates.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Whether the context has no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of candidates in `state`.
    pub fn count(&self, state: PrecipState) -> usize {
        self.counts[state.as_index()]
    }

    /// Empirical next-state distribution. Sums to 1 for a non-empty context;
    /// every state with positive probability has at least one candidate.
    pub fn next_probs(&self) -> [f64; N_STATES] {
        let total = self.candidates.len() as f64;
        let mut probs = [0.0; N_STATES];
        if total > 0.0 {
            for (p, &c) in probs.iter_mut().zip(self.counts.iter()) {
                *p = c as f64 / total;
            }
        }
        probs
    }

    /// Which states have at least one candidate.
    pub fn available(&self) -> [bool; N_STATES] {
        self.counts.map(|c| c > 0)
    }

    /// Candidates whose own state is `state`.
    pub fn with_state(&self, state: PrecipState) -> impl Iterator<Item = &Candidate> + '_ {
        self.candidates.iter().filter(move |c| c.state == state)
    }
}

/// Analog transition table for one reference window.
///
/// Built once per reference window and shared read-only by every
/// combination that uses that window.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    thresholds: StateThresholds,
    reference: DateRange,
    narrow_radius: u16,
    wide_radius: u16,
    precip_scale: f64,
    contexts: Vec<ContextCandidates>,
}

impl TransitionTable {
    /// Builds the table from an observed series.
    ///
    /// Candidates are reference-window days whose day-of-year lies within
    /// `narrow_radius` of the context day; contexts left empty are rebuilt
    /// with `wide_radius`. Contexts still empty are kept and reported as
    /// [`MarkovError::InsufficientData`] only when looked up.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::WindowNotCovered`] if `reference` is not inside
    /// the observed record, or [`MarkovError::InvalidInput`] if a reference
    /// value (or the day before the window) is negative or non-finite.
    #[tracing::instrument(skip(observed, reference, thresholds, config), fields(reference = %reference))]
    pub fn build(
        observed: &DailySeries,
        reference: &DateRange,
        thresholds: &StateThresholds,
        config: &MarkovConfig,
    ) -> Result<Self, MarkovError> {
        config.validate()?;
        let (lo, hi) = match (
            observed.index_of(reference.start()),
            observed.index_of(reference.end()),
        ) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => {
                return Err(MarkovError::WindowNotCovered {
                    what: "reference",
                    requested: reference.to_string(),
                    available: describe(observed),
                });
            }
        };

        let values = observed.values();
        let first = lo.saturating_sub(1);
        let states = thresholds.classify_series(&values[first..=hi])?;
        let state_at = |i: usize| states[i - first];

        // Reference indices bucketed by day-of-year.
        let mut by_doy: Vec<Vec<usize>> = vec![Vec::new(); DAYS_PER_YEAR as usize];
        for i in lo..=hi {
            by_doy[observed.date_at(i).doy().index()].push(i);
        }

        let gather = |doy: Doy, radius: u16| -> Vec<Candidate> {
            let r = radius as i32;
            let mut out = Vec::new();
            for off in -r..=r {
                for &i in &by_doy[doy.wrapping_add(off).index()] {
                    let prior = (i > first).then(|| i - 1);
                    out.push(Candidate {
                        index: i,
                        date: observed.date_at(i),
                        offset: off as i16,
                        state: state_at(i),
                        precip: values[i],
                        prior_precip: prior.map(|p| values[p]),
                        prior_state: prior.map(state_at),
                    });
                }
            }
            out
        };

        let narrow = config.narrow_radius();
        let wide = config.wide_radius();
        let mut contexts = Vec::with_capacity(DAYS_PER_YEAR as usize * SLOTS);
        let mut n_widened = 0usize;
        let mut n_empty = 0usize;

        for d in 0..DAYS_PER_YEAR as usize {
            let doy = Doy::from_index(d);
            let pool = gather(doy, narrow);
            let mut wide_pool: Option<Vec<Candidate>> = None;

            for slot in 0..SLOTS {
                let prior = PrecipState::from_index(slot);
                let mut ctx = ContextCandidates::new(narrow, select(&pool, prior));
                if ctx.is_empty() && wide > narrow {
                    let wp = wide_pool.get_or_insert_with(|| gather(doy, wide));
                    ctx = ContextCandidates::new(wide, select(wp, prior));
                    n_widened += 1;
                    debug!(
                        doy = doy.get(),
                        prior = prior.map(PrecipState::label).unwrap_or("any"),
                        narrow,
                        wide,
                        found = ctx.candidates.len(),
                        "narrow window empty: widened"
                    );
                }
                if ctx.is_empty() {
                    n_empty += 1;
                }
                contexts.push(ctx);
            }
        }

        let reference_values = &values[lo..=hi];
        let precip_scale = std_dev(reference_values);
        info!(
            days = reference_values.len(),
            widened = n_widened,
            empty = n_empty,
            "transition table built"
        );

        Ok(Self {
            thresholds: *thresholds,
            reference: *reference,
            narrow_radius: narrow,
            wide_radius: wide,
            precip_scale: if precip_scale > 0.0 { precip_scale } else { 1.0 },
            contexts,
        })
    }

    /// Returns the candidates for a day-of-year given the prior-day state
    /// (`None` for the unconditional, first-day context).
    ///
    /// # Errors
    ///
    /// [`MarkovError::InsufficientData`] if the context is empty after the
    /// wide-window fallback.
    pub fn lookup(
        &self,
        doy: Doy,
        prior: Option<PrecipState>,
    ) -> Result<&ContextCandidates, MarkovError> {
        let slot = prior.map_or(N_STATES, PrecipState::as_index);
        let ctx = &self.contexts[doy.index() * SLOTS + slot];
        if ctx.is_empty() {
            return Err(MarkovError::InsufficientData {
                doy: doy.get(),
                prior,
                narrow_radius: self.narrow_radius,
                wide_radius: self.wide_radius,
            });
        }
        Ok(ctx)
    }

    /// Thresholds the table was classified with.
    pub fn thresholds(&self) -> &StateThresholds {
        &self.thresholds
    }

    /// Reference window.
    pub fn reference(&self) -> &DateRange {
        &self.reference
    }

    /// Narrow and wide radii.
    pub fn radii(&self) -> (u16, u16) {
        (self.narrow_radius, self.wide_radius)
    }

    /// Standard deviation of reference-window precipitation (1.0 if zero).
    pub fn precip_scale(&self) -> f64 {
        self.precip_scale
    }
}

fn select(pool: &[Candidate], prior: Option<PrecipState>) -> Vec<Candidate> {
    match prior {
        None => pool.to_vec(),
        Some(s) => pool
            .iter()
            .filter(|c| c.prior_state == Some(s))
            .copied()
            .collect(),
    }
}

fn std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n < 2.0 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}

fn describe(series: &DailySeries) -> String {
    series
        .range()
        .map(|r| r.to_string())
        .unwrap_or_else(|_| "(empty)".to_string())
}

/// Normalizes a probability vector in-place, using a fallback if the sum is zero.
///
/// 1. Replaces non-finite and negative values with 0.0.
/// 2. If the sum is positive, divides each element by the sum.
/// 3. Otherwise, copies `fallback` into `probs`.
pub fn normalize_probs(probs: &mut [f64; N_STATES], fallback: [f64; N_STATES]) {
    for p in probs.iter_mut() {
        if !p.is_finite() || *p < 0.0 {
            *p = 0.0;
        }
    }
    let s: f64 = probs.iter().sum();
    if s > 0.0 {
        for p in probs.iter_mut() {
            *p /= s;
        }
    } else {
        *probs = fallback;
    }
}

/// Samples a state from a probability vector using its cumulative CDF.
///
/// States with zero probability are never returned unless every entry is
/// zero, in which case the result is [`PrecipState::Dry`].
pub fn sample_state(probs: &[f64; N_STATES], rng: &mut impl rand::Rng) -> PrecipState {
    let u: f64 = rng.random();
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for state in PrecipState::ALL {
        let p = probs[state.as_index()];
        if p <= 0.0 {
            continue;
        }
        cumulative += p;
        last_positive = Some(state);
        if cumulative >= u {
            return state;
        }
    }
    // Floating-point shortfall.
    last_positive.unwrap_or(PrecipState::Dry)
}
