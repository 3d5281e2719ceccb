//! Maximum-likelihood GPD fitting via Nelder-Mead.
//!
//! The optimiser works on `(ξ, ln σ)` so the scale stays positive. It is
//! started from the method-of-moments estimate; infeasible points (samples
//! outside the support, `ξ ≤ -1`) cost `f64::MAX`.

use argmin::core::{CostFunction, Executor};
use argmin::solver::neldermead::NelderMead;
use tracing::debug;

use crate::error::ExtremeError;
use crate::gpd::GpdParams;

/// Fit settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GpdConfig {
    min_exceedances: usize,
    max_iters: u64,
}

impl GpdConfig {
    /// Defaults: at least 10 exceedances, 1000 Nelder-Mead iterations.
    pub fn new() -> Self {
        Self {
            min_exceedances: 10,
            max_iters: 1000,
        }
    }

    /// Sets the smallest exceedance count a fit is attempted with.
    pub fn with_min_exceedances(mut self, n: usize) -> Self {
        self.min_exceedances = n;
        self
    }

    /// Sets the optimiser iteration cap.
    pub fn with_max_iters(mut self, n: u64) -> Self {
        self.max_iters = n;
        self
    }

    /// Minimum exceedance count.
    pub fn min_exceedances(&self) -> usize {
        self.min_exceedances
    }

    /// Iteration cap.
    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), ExtremeError> {
        if self.min_exceedances < 3 {
            return Err(ExtremeError::InvalidConfig {
                reason: format!(
                    "min_exceedances must be >= 3, got {}",
                    self.min_exceedances
                ),
            });
        }
        if self.max_iters == 0 {
            return Err(ExtremeError::InvalidConfig {
                reason: "max_iters must be >= 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for GpdConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A fitted GPD with the sample it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpdFit {
    params: GpdParams,
    n_exceedances: usize,
    n_total: usize,
    log_likelihood: f64,
}

impl GpdFit {
    /// Fitted parameters.
    pub fn params(&self) -> &GpdParams {
        &self.params
    }

    /// Number of values above the threshold.
    pub fn n_exceedances(&self) -> usize {
        self.n_exceedances
    }

    /// Number of values the fit was given.
    pub fn n_total(&self) -> usize {
        self.n_total
    }

    /// Fraction of values above the threshold.
    pub fn exceedance_rate(&self) -> f64 {
        self.n_exceedances as f64 / self.n_total as f64
    }

    /// Log-likelihood of the exceedances at the fitted parameters.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }
}

/// Fits a GPD to the values of `values` strictly above `threshold`.
///
/// # Errors
///
/// [`ExtremeError::InvalidData`] for negative or non-finite input,
/// [`ExtremeError::FitFailure`] when there are fewer than
/// `config.min_exceedances()` exceedances, the exceedances are constant, or
/// the optimiser does not reach a finite likelihood with a positive scale.
#[tracing::instrument(skip(values, config), fields(n = values.len()))]
pub fn fit_gpd(values: &[f64], threshold: f64, config: &GpdConfig) -> Result<GpdFit, ExtremeError> {
    config.validate()?;
    if let Some(&bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
        return Err(ExtremeError::InvalidData { value: bad });
    }

    let excesses: Vec<f64> = values
        .iter()
        .filter(|&&v| v > threshold)
        .map(|&v| v - threshold)
        .collect();
    let n = excesses.len();
    let failure = |reason: &str| ExtremeError::FitFailure {
        reason: reason.to_string(),
        n_exceedances: n,
    };

    if n < config.min_exceedances {
        return Err(ExtremeError::FitFailure {
            reason: format!(
                "too few exceedances above {threshold:.3} (need {})",
                config.min_exceedances
            ),
            n_exceedances: n,
        });
    }

    let mean = excesses.iter().sum::<f64>() / n as f64;
    let var = excesses.iter().map(|y| (y - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let start = GpdParams::from_moments(mean, var, threshold)
        .ok_or_else(|| failure("exceedances are constant"))?;
    let shape0 = start.shape().clamp(-0.4, 0.8);
    let log_scale0 = start.scale().ln();
    debug!(shape0, scale0 = start.scale(), "moment estimate");

    let simplex = vec![
        vec![shape0, log_scale0],
        vec![shape0 + 0.1, log_scale0],
        vec![shape0, log_scale0 + 0.2],
    ];
    let cost = GpdCost {
        excesses: &excesses,
    };
    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(1e-10)
        .map_err(|_| failure("optimiser setup failed"))?;
    let result = Executor::new(cost, solver)
        .configure(|state| state.max_iters(config.max_iters))
        .run()
        .map_err(|_| failure("optimiser did not run to completion"))?;
    let best = result
        .state()
        .best_param
        .as_ref()
        .ok_or_else(|| failure("optimiser returned no parameters"))?;

    let params = GpdParams::new(best[0], best[1].exp(), threshold)
        .ok_or_else(|| failure("non-finite shape or non-positive scale"))?;
    let log_likelihood = log_likelihood(&params, &excesses)
        .ok_or_else(|| failure("likelihood is not finite at the optimum"))?;

    debug!(
        shape = params.shape(),
        scale = params.scale(),
        n_exceedances = n,
        log_likelihood,
        "GPD fit"
    );
    Ok(GpdFit {
        params,
        n_exceedances: n,
        n_total: values.len(),
        log_likelihood,
    })
}

fn log_likelihood(params: &GpdParams, excesses: &[f64]) -> Option<f64> {
    if params.shape() <= -1.0 {
        return None;
    }
    let mut ll = 0.0;
    for &y in excesses {
        ll += params.ln_pdf_excess(y)?;
    }
    ll.is_finite().then_some(ll)
}

/// Cost function for argmin: negative log-likelihood over `(ξ, ln σ)`.
struct GpdCost<'a> {
    excesses: &'a [f64],
}

impl CostFunction for GpdCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let nll = GpdParams::new(params[0], params[1].exp(), 0.0)
            .and_then(|p| log_likelihood(&p, self.excesses))
            .map(|ll| -ll);
        Ok(nll.unwrap_or(f64::MAX))
    }
}
