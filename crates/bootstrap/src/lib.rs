//! Markov-chain analog bootstrap.
//!
//! Reshuffles historical dates into a synthetic sequence: each target day
//! gets an observed analog day whose state follows the day-of-year transition
//! statistics (optionally shifted toward a climate projection), picked among
//! same-state candidates by a pluggable [`AnalogScorer`].
//!
//! # Quick start
//!
//! ```rust
//! use pluvio_bootstrap::{KnnScorer, Sampling, bootstrap_dates};
//! use pluvio_calendar::{DailySeries, DateRange, NoLeapDate};
//! use pluvio_markov::{MarkovConfig, StateThresholds, TransitionTable};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let start: NoLeapDate = "1991-01-01".parse().unwrap();
//! let values: Vec<f64> = (0..365 * 4).map(|i| ((i * 7) % 13) as f64).collect();
//! let observed = DailySeries::new(start, values);
//! let reference = observed.range().unwrap();
//!
//! let config = MarkovConfig::new();
//! let thresholds = StateThresholds::from_reference(observed.values(), &config).unwrap();
//! let table = TransitionTable::build(&observed, &reference, &thresholds, &config).unwrap();
//!
//! let targets = DateRange::parse("2050-01-01", "2050-03-31").unwrap().dates();
//! let scorer = KnnScorer::new().with_sampling(Sampling::Rank);
//! let mut rng = StdRng::seed_from_u64(42);
//! let mapping = bootstrap_dates(&targets, &table, None, &scorer, &mut rng).unwrap();
//! assert_eq!(mapping.len(), targets.len());
//! ```

mod bootstrap;
mod error;
mod mapping;
mod sample;
mod scorer;

pub use bootstrap::bootstrap_dates;
pub use error::BootstrapError;
pub use mapping::{BootstrapMapping, MappingEntry, MappingRow};
pub use sample::{Sampling, k_lall_sharma, weighted_index};
pub use scorer::{AnalogQuery, AnalogScorer, CalendarKernelScorer, KnnScorer, UniformScorer};
