//! Climate-model change factors for the GPD tail.

use tracing::warn;

use crate::error::ExtremeError;
use crate::fit::GpdFit;
use crate::gpd::GpdParams;

/// Projected shapes are clamped to `[-SHAPE_LIMIT, SHAPE_LIMIT]`.
pub const SHAPE_LIMIT: f64 = 0.5;

/// Change in the tail between a GCM's historical and projected fits, both
/// taken above the same GCM threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionDelta {
    /// Projected scale over historical scale.
    pub scale_ratio: f64,
    /// Projected shape minus historical shape.
    pub shape_delta: f64,
    /// Projected exceedance rate over historical exceedance rate.
    pub rate_ratio: f64,
}

impl ProjectionDelta {
    /// Compares two fits of the same model.
    pub fn between(historical: &GpdFit, projected: &GpdFit) -> Self {
        let h = historical.params();
        let p = projected.params();
        let rate_ratio = if historical.exceedance_rate() > 0.0 {
            projected.exceedance_rate() / historical.exceedance_rate()
        } else {
            1.0
        };
        Self {
            scale_ratio: p.scale() / h.scale(),
            shape_delta: p.shape() - h.shape(),
            rate_ratio,
        }
    }

    /// No change.
    pub fn identity() -> Self {
        Self {
            scale_ratio: 1.0,
            shape_delta: 0.0,
            rate_ratio: 1.0,
        }
    }

    /// Applies this change to the observed tail, keeping its threshold.
    ///
    /// The shape is clamped to [`SHAPE_LIMIT`] in magnitude.
    ///
    /// # Errors
    ///
    /// [`ExtremeError::InvalidParams`] if the result is not a valid GPD.
    pub fn apply(&self, observed: &GpdParams) -> Result<GpdParams, ExtremeError> {
        let raw_shape = observed.shape() + self.shape_delta;
        let shape = raw_shape.clamp(-SHAPE_LIMIT, SHAPE_LIMIT);
        if shape != raw_shape {
            warn!(raw_shape, shape, "projected GPD shape clamped");
        }
        let scale = observed.scale() * self.scale_ratio;
        GpdParams::new(shape, scale, observed.threshold()).ok_or(ExtremeError::InvalidParams {
            shape,
            scale,
            threshold: observed.threshold(),
        })
    }
}

impl Default for ProjectionDelta {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::{GpdConfig, fit_gpd};
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample_fit(shape: f64, scale: f64, n_exc: usize, n_below: usize, seed: u64) -> GpdFit {
        let params = GpdParams::new(shape, scale, 10.0).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut values = vec![1.0; n_below];
        values.extend((0..n_exc).map(|_| params.sample(&mut rng)));
        fit_gpd(&values, 10.0, &GpdConfig::new()).unwrap()
    }

    #[test]
    fn identity_is_a_no_op() {
        let obs = GpdParams::new(0.1, 7.0, 25.0).unwrap();
        assert_eq!(ProjectionDelta::identity().apply(&obs).unwrap(), obs);
    }

    #[test]
    fn heavier_projection_scales_observed_tail() {
        let hist = sample_fit(0.1, 5.0, 3000, 3000, 1);
        let proj = sample_fit(0.1, 7.5, 3000, 1000, 2);
        let delta = ProjectionDelta::between(&hist, &proj);
        assert!((delta.scale_ratio - 1.5).abs() < 0.15, "{delta:?}");
        assert!(delta.shape_delta.abs() < 0.1, "{delta:?}");
        assert_relative_eq!(delta.rate_ratio, 0.75 / 0.5, epsilon = 1e-12);

        let obs = GpdParams::new(0.05, 8.0, 40.0).unwrap();
        let projected = delta.apply(&obs).unwrap();
        assert_eq!(projected.threshold(), 40.0);
        assert_relative_eq!(projected.scale(), 8.0 * delta.scale_ratio);
        assert!(projected.mean() > obs.mean());
    }

    #[test]
    fn shape_is_clamped() {
        let delta = ProjectionDelta {
            scale_ratio: 1.0,
            shape_delta: 0.9,
            rate_ratio: 1.0,
        };
        let obs = GpdParams::new(0.2, 8.0, 40.0).unwrap();
        assert_eq!(delta.apply(&obs).unwrap().shape(), SHAPE_LIMIT);
    }

    #[test]
    fn non_positive_scale_is_invalid() {
        let delta = ProjectionDelta {
            scale_ratio: 0.0,
            shape_delta: 0.0,
            rate_ratio: 1.0,
        };
        let obs = GpdParams::new(0.2, 8.0, 40.0).unwrap();
        assert!(matches!(
            delta.apply(&obs),
            Err(ExtremeError::InvalidParams { .. })
        ));
    }
}
