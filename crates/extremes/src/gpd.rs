//! Generalized Pareto distribution parameter type.

use rand::Rng;
use rand_distr::{Distribution, Open01};

/// Shape magnitudes below this are treated as the exponential limit.
const SHAPE_EPS: f64 = 1e-9;

/// Validated parameters for a Generalized Pareto distribution over the
/// excess `x - threshold`.
///
/// `shape` (ξ) and `threshold` (u) must be finite, `scale` (σ) finite and
/// strictly positive. For `ξ < 0` the support is bounded above by
/// `u - σ / ξ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpdParams {
    shape: f64,
    scale: f64,
    threshold: f64,
}

impl GpdParams {
    /// Returns `None` unless all three values are finite and `scale > 0`.
    pub fn new(shape: f64, scale: f64, threshold: f64) -> Option<Self> {
        if shape.is_finite() && scale.is_finite() && scale > 0.0 && threshold.is_finite() {
            Some(Self {
                shape,
                scale,
                threshold,
            })
        } else {
            None
        }
    }

    /// Method-of-moments estimate from the mean and variance of excesses.
    ///
    /// - ξ = (1 - m² / s²) / 2
    /// - σ = m (m² / s² + 1) / 2
    ///
    /// Returns `None` if `mean` or `var` are not finite and positive.
    pub fn from_moments(mean: f64, var: f64, threshold: f64) -> Option<Self> {
        if !mean.is_finite() || mean <= 0.0 || !var.is_finite() || var <= 0.0 {
            return None;
        }
        let ratio = mean * mean / var;
        Self::new(0.5 * (1.0 - ratio), 0.5 * mean * (ratio + 1.0), threshold)
    }

    /// Shape parameter ξ.
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Scale parameter σ.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Location (threshold) u.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Upper end of the support, finite only for ξ < 0.
    pub fn upper_bound(&self) -> f64 {
        if self.shape < -SHAPE_EPS {
            self.threshold - self.scale / self.shape
        } else {
            f64::INFINITY
        }
    }

    /// Distribution mean, infinite for ξ ≥ 1.
    pub fn mean(&self) -> f64 {
        if self.shape >= 1.0 {
            f64::INFINITY
        } else {
            self.threshold + self.scale / (1.0 - self.shape)
        }
    }

    /// `P(X > x)`; 1 at or below the threshold.
    pub fn survival(&self, x: f64) -> f64 {
        let y = x - self.threshold;
        if y <= 0.0 {
            return 1.0;
        }
        let z = y / self.scale;
        if self.shape.abs() < SHAPE_EPS {
            (-z).exp()
        } else {
            let base = 1.0 + self.shape * z;
            if base <= 0.0 {
                0.0
            } else {
                base.powf(-1.0 / self.shape)
            }
        }
    }

    /// `P(X ≤ x)`.
    pub fn cdf(&self, x: f64) -> f64 {
        1.0 - self.survival(x)
    }

    /// Inverse CDF for `p` in `[0, 1)`.
    pub fn quantile(&self, p: f64) -> f64 {
        let tail = (1.0 - p).max(f64::MIN_POSITIVE);
        let excess = if self.shape.abs() < SHAPE_EPS {
            -self.scale * tail.ln()
        } else {
            self.scale / self.shape * (tail.powf(-self.shape) - 1.0)
        };
        self.threshold + excess
    }

    /// Log density of one excess `y = x - u`; `None` outside the support.
    pub fn ln_pdf_excess(&self, y: f64) -> Option<f64> {
        if y < 0.0 {
            return None;
        }
        let z = y / self.scale;
        if self.shape.abs() < SHAPE_EPS {
            return Some(-self.scale.ln() - z);
        }
        let base = 1.0 + self.shape * z;
        if base <= 0.0 {
            return None;
        }
        Some(-self.scale.ln() - (1.0 + 1.0 / self.shape) * base.ln())
    }

    /// Draws one value above the threshold by inverse-CDF sampling.
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        let u: f64 = Open01.sample(rng);
        self.quantile(u)
    }
}
