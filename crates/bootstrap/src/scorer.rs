//! Pluggable analog scoring strategies.
//!
//! A scorer turns the candidate analogs for one target day into relative
//! selection weights. The walk in [`crate::bootstrap_dates`] draws one
//! candidate with probability proportional to its weight.

use std::fmt;

use pluvio_calendar::NoLeapDate;
use pluvio_markov::Candidate;

use crate::error::BootstrapError;
use crate::sample::{Sampling, k_lall_sharma, neighbour_probs};

/// What a scorer knows about the day being filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogQuery {
    /// Target date.
    pub target: NoLeapDate,
    /// Precipitation of the analog chosen for the previous target day
    /// (`None` on the first day).
    pub prior_precip: Option<f64>,
    /// Calendar radius the candidates were gathered with.
    pub radius: u16,
    /// Spread of reference precipitation, for scaling precipitation gaps.
    pub precip_scale: f64,
}

/// Scores candidate analog dates.
///
/// Returned weights must be non-negative, one per candidate, and need not
/// sum to one. A zero weight excludes the candidate.
pub trait AnalogScorer: Send + Sync + fmt::Debug {
    /// Scores `candidates` for `query`.
    fn score(&self, query: &AnalogQuery, candidates: &[&Candidate]) -> Vec<f64>;
}

/// k-nearest-neighbour scorer on calendar offset and prior-day precipitation.
///
/// Distance is `sqrt(w_c * (offset / radius)^2 + w_p * (Δprior / scale)^2)`
/// where `Δprior` compares each candidate's preceding day with the analog
/// chosen for the previous target day. The precipitation term is dropped
/// when either side has no prior day. Only the `k` nearest candidates get
/// weight, distributed by the [`Sampling`] scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnScorer {
    k: Option<usize>,
    sampling: Sampling,
    calendar_weight: f64,
    precip_weight: f64,
}

impl KnnScorer {
    /// Defaults: `k = floor(sqrt(n))`, rank sampling, both feature weights 1.
    pub fn new() -> Self {
        Self {
            k: None,
            sampling: Sampling::Rank,
            calendar_weight: 1.0,
            precip_weight: 1.0,
        }
    }

    /// Fixes the neighbour count instead of the `sqrt(n)` heuristic.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    /// Sets the neighbour weighting scheme.
    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Sets the calendar-offset and prior-precipitation feature weights.
    pub fn with_weights(mut self, calendar: f64, precip: f64) -> Self {
        self.calendar_weight = calendar;
        self.precip_weight = precip;
        self
    }

    /// Returns the configured neighbour count, if fixed.
    pub fn k(&self) -> Option<usize> {
        self.k
    }

    /// Returns the sampling scheme.
    pub fn sampling(&self) -> &Sampling {
        &self.sampling
    }

    /// Validates this scorer.
    pub fn validate(&self) -> Result<(), BootstrapError> {
        if self.k == Some(0) {
            return Err(BootstrapError::InvalidConfig {
                reason: "k must be >= 1".to_string(),
            });
        }
        for (name, w) in [
            ("calendar_weight", self.calendar_weight),
            ("precip_weight", self.precip_weight),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(BootstrapError::InvalidConfig {
                    reason: format!("{name} must be finite and non-negative, got {w}"),
                });
            }
        }
        if let Sampling::Gaussian {
            bandwidth: Some(bw),
        } = self.sampling
            && (!bw.is_finite() || bw <= 0.0)
        {
            return Err(BootstrapError::InvalidConfig {
                reason: format!("gaussian bandwidth must be positive, got {bw}"),
            });
        }
        Ok(())
    }

    fn distance(&self, query: &AnalogQuery, c: &Candidate) -> f64 {
        let cal = c.offset as f64 / query.radius.max(1) as f64;
        let mut d2 = self.calendar_weight * cal * cal;
        if let (Some(q), Some(p)) = (query.prior_precip, c.prior_precip) {
            let dp = (p - q) / query.precip_scale;
            d2 += self.precip_weight * dp * dp;
        }
        d2.sqrt()
    }
}

impl Default for KnnScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalogScorer for KnnScorer {
    fn score(&self, query: &AnalogQuery, candidates: &[&Candidate]) -> Vec<f64> {
        let n = candidates.len();
        let mut weights = vec![0.0; n];
        if n == 0 {
            return weights;
        }
        let dists: Vec<f64> = candidates.iter().map(|c| self.distance(query, c)).collect();
        let mut order: Vec<usize> = (0..n).collect();
        // Stable sort keeps candidate order among ties.
        order.sort_by(|&a, &b| dists[a].total_cmp(&dists[b]));

        let k = self.k.unwrap_or_else(|| k_lall_sharma(n)).clamp(1, n);
        let nn_dists: Vec<f64> = order[..k].iter().map(|&i| dists[i]).collect();
        let mut probs = Vec::with_capacity(k);
        neighbour_probs(&nn_dists, &self.sampling, &mut probs);
        for (&i, &p) in order[..k].iter().zip(&probs) {
            weights[i] = p;
        }
        weights
    }
}

/// Gaussian kernel on calendar offset only.
///
/// Weight `exp(-offset^2 / (2 * bw^2))`; the bandwidth defaults to half the
/// window radius.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarKernelScorer {
    bandwidth: Option<f64>,
}

impl CalendarKernelScorer {
    /// Kernel with bandwidth tied to the window radius.
    pub fn new() -> Self {
        Self { bandwidth: None }
    }

    /// Fixes the kernel bandwidth in days.
    pub fn with_bandwidth(mut self, days: f64) -> Self {
        self.bandwidth = Some(days);
        self
    }

    /// Validates this scorer.
    pub fn validate(&self) -> Result<(), BootstrapError> {
        match self.bandwidth {
            Some(bw) if !bw.is_finite() || bw <= 0.0 => Err(BootstrapError::InvalidConfig {
                reason: format!("calendar bandwidth must be positive, got {bw}"),
            }),
            _ => Ok(()),
        }
    }
}

impl AnalogScorer for CalendarKernelScorer {
    fn score(&self, query: &AnalogQuery, candidates: &[&Candidate]) -> Vec<f64> {
        let bw = self
            .bandwidth
            .unwrap_or_else(|| (query.radius as f64 / 2.0).max(1.0));
        let two_bw_sq = 2.0 * bw * bw;
        candidates
            .iter()
            .map(|c| {
                let d = c.offset as f64;
                (-d * d / two_bw_sq).exp()
            })
            .collect()
    }
}

/// Every candidate equally likely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniformScorer;

impl AnalogScorer for UniformScorer {
    fn score(&self, _query: &AnalogQuery, candidates: &[&Candidate]) -> Vec<f64> {
        vec![1.0; candidates.len()]
    }
}
