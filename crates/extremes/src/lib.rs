//! Generalized Pareto tail fitting and extreme-day resynthesis.
//!
//! Days whose analog falls in the very-wet state get a fresh magnitude drawn
//! from a GPD fitted above the very-wet threshold. In projection runs the
//! observed tail is first moved by the change between a climate model's
//! historical and projected tails.
//!
//! # Example
//!
//! ```
//! use pluvio_extremes::{GpdConfig, GpdParams, fit_gpd};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let truth = GpdParams::new(0.1, 8.0, 25.0).unwrap();
//! let mut rng = StdRng::seed_from_u64(1);
//! let values: Vec<f64> = (0..500).map(|_| truth.sample(&mut rng)).collect();
//! let fit = fit_gpd(&values, 25.0, &GpdConfig::new()).unwrap();
//! assert!(fit.params().scale() > 0.0);
//! ```

mod delta;
mod error;
mod fit;
mod gpd;
mod synth;

pub use delta::{ProjectionDelta, SHAPE_LIMIT};
pub use error::ExtremeError;
pub use fit::{GpdConfig, GpdFit, fit_gpd};
pub use gpd::GpdParams;
pub use synth::{ExtremeSample, Synthesis, synthesize_extremes};
