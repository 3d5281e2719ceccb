//! Climate-model state-shift signal.
//!
//! Compares how often the driving climate model sits in each precipitation
//! state during its historical run (over the reference years, per
//! day-of-year) and during its projection (around each target date), then
//! biases analog next-state probabilities by that change.

use pluvio_calendar::{DAYS_PER_YEAR, DailySeries, DateRange, NoLeapDate};
use tracing::info;

use crate::config::MarkovConfig;
use crate::error::MarkovError;
use crate::state::{N_STATES, PrecipState};
use crate::threshold::StateThresholds;
use crate::transition::normalize_probs;

/// How the shift signal perturbs transition probabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShiftPolicy {
    /// `p' = p * f_proj / f_hist`, renormalised.
    #[default]
    Multiplicative,
    /// `p' = max(p + f_proj - f_hist, 0)`, renormalised.
    Additive,
    /// Leave probabilities unchanged.
    None,
}

/// Configuration for shift-signal estimation.
///
/// # Example
///
/// ```
/// use pluvio_markov::{ShiftConfig, ShiftPolicy};
///
/// let config = ShiftConfig::new()
///     .with_policy(ShiftPolicy::Additive)
///     .with_half_window(10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftConfig {
    policy: ShiftPolicy,
    half_window: u16,
    pseudo_count: f64,
}

impl ShiftConfig {
    /// Defaults: multiplicative policy, ±15-day windows, pseudo-count 0.5.
    pub fn new() -> Self {
        Self {
            policy: ShiftPolicy::Multiplicative,
            half_window: 15,
            pseudo_count: 0.5,
        }
    }

    /// Sets the perturbation policy.
    pub fn with_policy(mut self, policy: ShiftPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the half-width (days) of the frequency windows.
    pub fn with_half_window(mut self, days: u16) -> Self {
        self.half_window = days;
        self
    }

    /// Sets the per-state pseudo-count added before normalising frequencies.
    pub fn with_pseudo_count(mut self, count: f64) -> Self {
        self.pseudo_count = count;
        self
    }

    /// Returns the perturbation policy.
    pub fn policy(&self) -> ShiftPolicy {
        self.policy
    }

    /// Returns the frequency window half-width.
    pub fn half_window(&self) -> u16 {
        self.half_window
    }

    /// Returns the pseudo-count.
    pub fn pseudo_count(&self) -> f64 {
        self.pseudo_count
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), MarkovError> {
        if !self.pseudo_count.is_finite() || self.pseudo_count <= 0.0 {
            return Err(MarkovError::InvalidThreshold {
                reason: format!("pseudo-count must be positive, got {}", self.pseudo_count),
            });
        }
        if self.half_window > DAYS_PER_YEAR / 2 {
            return Err(MarkovError::InvalidThreshold {
                reason: format!("shift half-window {} exceeds half a year", self.half_window),
            });
        }
        Ok(())
    }
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-target-day state frequencies of a climate model, historical vs
/// projected.
#[derive(Debug, Clone)]
pub struct ShiftSignal {
    policy: ShiftPolicy,
    gcm_thresholds: StateThresholds,
    start: NoLeapDate,
    historical: Vec<[f64; N_STATES]>,
    projected: Vec<[f64; N_STATES]>,
}

impl ShiftSignal {
    /// Estimates the signal for every date of `prediction`.
    ///
    /// The model's own thresholds are resolved from its historical run over
    /// `reference` with the same configuration as the observed thresholds.
    ///
    /// # Errors
    ///
    /// [`MarkovError::WindowNotCovered`] if the historical run does not cover
    /// `reference` or the projection does not cover `prediction` widened by
    /// the half-window; [`MarkovError::InvalidInput`] for bad values.
    #[tracing::instrument(skip_all, fields(prediction = %prediction))]
    pub fn estimate(
        gcm_historical: &DailySeries,
        gcm_projected: &DailySeries,
        reference: &DateRange,
        prediction: &DateRange,
        markov: &MarkovConfig,
        config: &ShiftConfig,
    ) -> Result<Self, MarkovError> {
        config.validate()?;
        let hw = config.half_window() as i64;
        let pseudo = config.pseudo_count();

        let hist = covered(gcm_historical, reference, "climate-model historical")?;
        let gcm_thresholds = StateThresholds::from_reference(hist.values(), markov)?;

        // Historical state counts per day-of-year over the reference years.
        let mut doy_counts = vec![[0.0_f64; N_STATES]; DAYS_PER_YEAR as usize];
        for rec in hist.records() {
            let s = gcm_thresholds.classify(rec.precip)?;
            doy_counts[rec.date.doy().index()][s.as_index()] += 1.0;
        }

        let window = prediction.widen(hw);
        let proj = covered(gcm_projected, &window, "climate-model projection")?;
        let proj_states = gcm_thresholds.classify_series(proj.values())?;

        let n = prediction.len_days();
        let mut historical = Vec::with_capacity(n);
        let mut projected = Vec::with_capacity(n);
        // Historical frequencies are smoothed at the projection window's
        // sample size.
        let m = (2 * hw + 1) as f64;
        for (i, date) in prediction.dates().into_iter().enumerate() {
            let mut h = [0.0; N_STATES];
            for off in -hw..=hw {
                let counts = &doy_counts[date.doy().wrapping_add(off as i32).index()];
                for (acc, c) in h.iter_mut().zip(counts) {
                    *acc += c;
                }
            }
            let h = to_freq(h).map(|f| f * m + pseudo);
            historical.push(to_freq(h));

            // `i + hw` is the target's position in the widened window.
            let mut p = [pseudo; N_STATES];
            for s in &proj_states[i..=i + 2 * hw as usize] {
                p[s.as_index()] += 1.0;
            }
            projected.push(to_freq(p));
        }

        let mean = |v: &[[f64; N_STATES]], k: usize| v.iter().map(|f| f[k]).sum::<f64>() / n as f64;
        info!(
            policy = ?config.policy(),
            hist_very_wet = mean(&historical, PrecipState::VeryWet.as_index()),
            proj_very_wet = mean(&projected, PrecipState::VeryWet.as_index()),
            hist_dry = mean(&historical, PrecipState::Dry.as_index()),
            proj_dry = mean(&projected, PrecipState::Dry.as_index()),
            "shift signal estimated"
        );

        Ok(Self {
            policy: config.policy(),
            gcm_thresholds,
            start: prediction.start(),
            historical,
            projected,
        })
    }

    /// Perturbation policy in effect.
    pub fn policy(&self) -> ShiftPolicy {
        self.policy
    }

    /// Thresholds resolved from the climate model's historical run.
    pub fn gcm_thresholds(&self) -> &StateThresholds {
        &self.gcm_thresholds
    }

    /// `(historical, projected)` state frequencies for `date`, if inside the
    /// prediction window.
    pub fn frequencies(&self, date: NoLeapDate) -> Option<([f64; N_STATES], [f64; N_STATES])> {
        let i = usize::try_from(self.start.days_until(date)).ok()?;
        Some((*self.historical.get(i)?, *self.projected.get(i)?))
    }

    /// Applies the signal to base next-state probabilities for `date`.
    ///
    /// Returns `base` unchanged outside the prediction window or under
    /// [`ShiftPolicy::None`]. The result is renormalised, falling back to
    /// `base` if every entry is driven to zero.
    pub fn adjust(&self, date: NoLeapDate, base: &[f64; N_STATES]) -> [f64; N_STATES] {
        let Some((hist, proj)) = self.frequencies(date) else {
            return *base;
        };
        let mut out = *base;
        match self.policy {
            ShiftPolicy::None => return out,
            ShiftPolicy::Multiplicative => {
                for k in 0..N_STATES {
                    out[k] *= proj[k] / hist[k];
                }
            }
            ShiftPolicy::Additive => {
                for k in 0..N_STATES {
                    // States absent from the analog pool stay absent.
                    if base[k] > 0.0 {
                        out[k] = (base[k] + proj[k] - hist[k]).max(0.0);
                    }
                }
            }
        }
        normalize_probs(&mut out, *base);
        out
    }
}

fn covered(series: &DailySeries, window: &DateRange, what: &'static str) -> Result<DailySeries, MarkovError> {
    series.slice(window).ok_or_else(|| MarkovError::WindowNotCovered {
        what,
        requested: window.to_string(),
        available: series
            .range()
            .map(|r| r.to_string())
            .unwrap_or_else(|_| "(empty)".to_string()),
    })
}

fn to_freq(counts: [f64; N_STATES]) -> [f64; N_STATES] {
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return [1.0 / N_STATES as f64; N_STATES];
    }
    counts.map(|c| c / total)
}
