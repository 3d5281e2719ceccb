//! State threshold computation.
//!
//! Resolves the dry/middle, middle/wet and wet/very-wet boundaries from a
//! reference window and classifies daily precipitation into [`PrecipState`]
//! values.

use crate::config::MarkovConfig;
use crate::error::MarkovError;
use crate::state::PrecipState;

/// Percentile of the reference distribution above which a day is very wet.
pub const VERY_WET_PERCENTILE: f64 = 98.0;

/// Resolved precipitation thresholds for state classification.
///
/// Invariant: `lower <= upper <= very_wet`, all finite and non-negative.
/// Once resolved, thresholds are frozen for the run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateThresholds {
    lower: f64,
    upper: f64,
    very_wet: f64,
}

impl StateThresholds {
    /// Builds thresholds from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidThreshold`] unless all values are finite,
    /// non-negative and ordered `lower <= upper <= very_wet`.
    pub fn new(lower: f64, upper: f64, very_wet: f64) -> Result<Self, MarkovError> {
        let ok = [lower, upper, very_wet]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0);
        if !ok || lower > upper || upper > very_wet {
            return Err(MarkovError::InvalidThreshold {
                reason: format!(
                    "thresholds must be finite, non-negative and ordered, got {lower} / {upper} / {very_wet}"
                ),
            });
        }
        Ok(Self {
            lower,
            upper,
            very_wet,
        })
    }

    /// Resolves thresholds from reference-window precipitation.
    ///
    /// The upper bound is the configured percentile of all reference days
    /// (zeros included), raised to the lower bound if it falls below it. The
    /// very-wet bound is the 98th percentile, raised to the upper bound if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError`] if `precip` is empty, holds a negative or
    /// non-finite value, or the configuration fails validation.
    pub fn from_reference(precip: &[f64], config: &MarkovConfig) -> Result<Self, MarkovError> {
        config.validate()?;
        if precip.is_empty() {
            return Err(MarkovError::EmptyData);
        }
        if let Some(&bad) = precip.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(MarkovError::InvalidInput { value: bad });
        }

        let mut sorted = precip.to_vec();
        sorted.sort_by(f64::total_cmp);

        let lower = config.lower_threshold();
        let upper = quantile_type7(&sorted, config.upper_percentile() / 100.0).max(lower);
        let very_wet = quantile_type7(&sorted, VERY_WET_PERCENTILE / 100.0).max(upper);

        Ok(Self {
            lower,
            upper,
            very_wet,
        })
    }

    /// Classifies a single precipitation value.
    ///
    /// `v < lower` is dry, `v <= upper` middle, `v <= very_wet` wet, anything
    /// larger very wet.
    ///
    /// # Errors
    ///
    /// [`MarkovError::InvalidInput`] for negative or non-finite values.
    #[inline]
    pub fn classify(&self, precip: f64) -> Result<PrecipState, MarkovError> {
        if !precip.is_finite() || precip < 0.0 {
            return Err(MarkovError::InvalidInput { value: precip });
        }
        Ok(if precip < self.lower {
            PrecipState::Dry
        } else if precip <= self.upper {
            PrecipState::Middle
        } else if precip <= self.very_wet {
            PrecipState::Wet
        } else {
            PrecipState::VeryWet
        })
    }

    /// Classifies a series of precipitation values.
    pub fn classify_series(&self, precip: &[f64]) -> Result<Vec<PrecipState>, MarkovError> {
        precip.iter().map(|&p| self.classify(p)).collect()
    }

    /// Returns the dry/middle boundary.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Returns the middle/wet boundary (inclusive upper end of middle).
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Returns the wet/very-wet boundary, also the GPD threshold.
    pub fn very_wet(&self) -> f64 {
        self.very_wet
    }
}

/// R's default quantile algorithm (type = 7), `p` in `[0, 1]`.
///
/// **Expects pre-sorted, non-empty input** (caller's responsibility).
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty(), "quantile_type7: input must not be empty");
    let n = sorted.len();
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}
