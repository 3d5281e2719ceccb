//! Neighbour weighting schemes and weighted draws.

use rand::Rng;

/// Probability weighting scheme for the k nearest analogs.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Sampling {
    /// All k neighbours have equal probability 1/k.
    Uniform,
    /// Rank-based: closest neighbour gets weight 1/1, second 1/2, third 1/3, etc.
    /// Normalised to sum to 1. (Lall & Sharma 1996)
    #[default]
    Rank,
    /// Gaussian kernel: `exp(-dist^2 / (2 * bandwidth^2)) + epsilon`.
    ///
    /// If `bandwidth` is `None`, uses the median of k-nearest distances.
    Gaussian {
        /// Optional fixed bandwidth.
        bandwidth: Option<f64>,
    },
}

/// Floor added to Gaussian weights so distant neighbours keep a small chance.
pub(crate) const GAUSSIAN_EPSILON: f64 = 1e-8;

/// Heuristic neighbour count: `floor(sqrt(n_candidates)).max(1)`.
pub fn k_lall_sharma(n_candidates: usize) -> usize {
    (n_candidates as f64).sqrt().floor().max(1.0) as usize
}

/// Computes selection probabilities for sorted nearest-neighbour distances.
///
/// | Mode | Formula |
/// |------|---------|
/// | Uniform | `1 / k` for all |
/// | Rank | `(1/i) / H_k` where `H_k = Σ 1/j` (harmonic) |
/// | Gaussian | `exp(-d² / 2bw²) + ε`, normalised; auto-bandwidth via median |
///
/// Gaussian falls back to uniform if bandwidth is non-finite or <= 0.
pub(crate) fn neighbour_probs(nn_dists: &[f64], sampling: &Sampling, probs: &mut Vec<f64>) {
    let k = nn_dists.len();
    probs.clear();
    if k == 0 {
        return;
    }

    match sampling {
        Sampling::Uniform => probs.resize(k, 1.0 / k as f64),
        Sampling::Rank => {
            let harmonic_sum: f64 = (1..=k).map(|j| 1.0 / j as f64).sum();
            probs.extend((1..=k).map(|j| (1.0 / j as f64) / harmonic_sum));
        }
        Sampling::Gaussian { bandwidth } => {
            let bw = bandwidth.unwrap_or_else(|| median_of(nn_dists));
            if !bw.is_finite() || bw <= 0.0 {
                probs.resize(k, 1.0 / k as f64);
            } else {
                let two_bw_sq = 2.0 * bw * bw;
                probs.extend(
                    nn_dists
                        .iter()
                        .map(|&d| (-d * d / two_bw_sq).exp() + GAUSSIAN_EPSILON),
                );
                let sum: f64 = probs.iter().sum();
                for p in probs.iter_mut() {
                    *p /= sum;
                }
            }
        }
    }
}

/// Draws one index with probability proportional to `weights`.
///
/// Builds a CDF and binary-searches it (`partition_point`). Non-finite and
/// negative weights count as zero. Returns `None` if no weight is positive.
pub fn weighted_index(weights: &[f64], rng: &mut impl Rng) -> Option<usize> {
    let mut cdf = Vec::with_capacity(weights.len());
    let mut acc = 0.0;
    for &w in weights {
        if w.is_finite() && w > 0.0 {
            acc += w;
        }
        cdf.push(acc);
    }
    if acc <= 0.0 {
        return None;
    }
    let u: f64 = rng.random::<f64>() * acc;
    // First entry strictly above u; never lands on a zero-weight slot.
    let idx = cdf.partition_point(|&c| c <= u).min(weights.len() - 1);
    Some(idx)
}

/// Median of a slice; 0.0 for empty input.
fn median_of(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}
