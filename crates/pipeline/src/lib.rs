//! Orchestration of downscaling runs.
//!
//! A run computes [`ReferenceStatistics`] once from the observed record and
//! then executes one [`Combination`] per (model, experiment) pair, or a
//! single hindcast. Each combination validates its date ranges, estimates
//! the climate-model shift and tail change, walks the analog bootstrap and
//! resamples very-wet days. Combinations share nothing mutable and are
//! seeded independently, so outcomes do not depend on scheduling.
//!
//! # Example
//!
//! ```
//! use pluvio_calendar::{DailySeries, NoLeapDate};
//! use pluvio_pipeline::{Combination, PipelineConfig, run_all};
//! use rand::rngs::StdRng;
//! use rand::{Rng, SeedableRng};
//!
//! // Thirty years of synthetic observations: 40% wet days, exponential amounts.
//! let mut rng = StdRng::seed_from_u64(0);
//! let values = (0..30 * 365)
//!     .map(|_| if rng.random_bool(0.4) { -8.0 * (1.0 - rng.random::<f64>()).ln() } else { 0.0 })
//!     .collect();
//! let start: NoLeapDate = "1981-01-01".parse().unwrap();
//! let observed = DailySeries::new(start, values);
//! let config = PipelineConfig::new(observed.range().unwrap()).with_seed(1);
//!
//! let outcomes = run_all(&observed, &[Combination::Hindcast], &config).unwrap();
//! let out = outcomes[0].result.as_ref().unwrap();
//! assert_eq!(out.series.len(), observed.len());
//! ```

mod catalogue;
mod combination;
mod config;
mod error;
mod reference;
mod run;
mod seed;
mod units;

pub use catalogue::{KNOWN_EXPERIMENTS, KNOWN_MODELS, is_known_experiment, is_known_model};
pub use combination::{Combination, GcmInput, HINDCAST_ID, output_name, projection_id};
pub use config::{MIN_REFERENCE_YEARS, PROJECTION_BUFFER_DAYS, PipelineConfig};
pub use error::{ErrorKind, PipelineError};
pub use reference::ReferenceStatistics;
pub use run::{CombinationOutcome, CombinationOutput, run_all, run_combination};
pub use seed::{Fingerprint, derive_seed};
pub use units::{KG_M2_S_TO_MM_DAY, Units};
