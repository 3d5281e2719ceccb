//! Four-state precipitation classification and day-of-year analog
//! transition statistics.
//!
//! Every day of an observed record is tagged dry, middle, wet or very-wet
//! using thresholds frozen from a reference window. For each day-of-year and
//! prior-day state, the [`TransitionTable`] lists the historical analog days
//! whose predecessor shares that state, giving both the empirical next-state
//! distribution and the candidate pool the bootstrapper draws from. A
//! [`ShiftSignal`] compares climate-model historical and projected state
//! frequencies and biases those next-state probabilities.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//!  │  threshold    │────▶│  transition    │────▶│      shift       │
//!  │  (classify)   │     │  (candidates)  │     │  (bias probs)    │
//!  └──────────────┘     └────────────────┘     └──────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use pluvio_markov::{MarkovConfig, PrecipState, StateThresholds};
//!
//! let config = MarkovConfig::new()
//!     .with_lower_threshold(1.0)
//!     .with_upper_percentile(90.0);
//! assert!(config.validate().is_ok());
//!
//! let reference: Vec<f64> = (0..100).map(|i| i as f64 / 5.0).collect();
//! let thresholds = StateThresholds::from_reference(&reference, &config).unwrap();
//! assert_eq!(thresholds.classify(0.2).unwrap(), PrecipState::Dry);
//! assert_eq!(thresholds.classify(50.0).unwrap(), PrecipState::VeryWet);
//! ```

pub mod config;
pub mod error;
pub mod shift;
pub mod state;
pub mod threshold;
pub mod transition;

pub use config::MarkovConfig;
pub use error::MarkovError;
pub use shift::{ShiftConfig, ShiftPolicy, ShiftSignal};
pub use state::{N_STATES, PrecipState};
pub use threshold::{StateThresholds, VERY_WET_PERCENTILE, quantile_type7};
pub use transition::{
    Candidate, ContextCandidates, TransitionTable, normalize_probs, sample_state,
};
