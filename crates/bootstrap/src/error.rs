//! Error types for the pluvio-bootstrap crate.

use pluvio_markov::MarkovError;

/// Error type for all fallible operations in the pluvio-bootstrap crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BootstrapError {
    /// Returned when there are no target dates to fill.
    #[error("no target dates to bootstrap")]
    EmptyTarget,

    /// Returned when a scorer parameter is invalid.
    #[error("invalid scorer configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a target date has no analog after the window fallback.
    #[error("no analog for target date {target}: {source}")]
    NoAnalog {
        /// Target date (ISO).
        target: String,
        /// Underlying lookup failure.
        source: MarkovError,
    },

    /// Returned when a scorer assigns zero weight to every candidate.
    #[error("scorer gave zero weight to all {n_candidates} candidates for {target}")]
    DegenerateWeights {
        /// Target date (ISO).
        target: String,
        /// Number of candidates scored.
        n_candidates: usize,
    },

    /// Classification or table failure.
    #[error(transparent)]
    Markov(#[from] MarkovError),
}
