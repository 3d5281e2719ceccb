//! Error types for the pluvio-pipeline crate.

use std::fmt;

use pluvio_bootstrap::BootstrapError;
use pluvio_calendar::{CalendarError, DateRange};
use pluvio_extremes::ExtremeError;
use pluvio_markov::MarkovError;

/// Error type for all fallible operations in the pluvio-pipeline crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    /// Returned for malformed or out-of-domain configuration and inputs.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a requested window lies outside the data available
    /// for it.
    #[error("{what} window {requested} is outside the available data {available}")]
    DateRange {
        /// Which window and which data.
        what: String,
        /// The window that had to be covered, buffers included.
        requested: DateRange,
        /// The data's full extent.
        available: DateRange,
    },

    /// Calendar error.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// State classification or transition statistics error.
    #[error(transparent)]
    Markov(#[from] MarkovError),

    /// Analog walk error.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    /// Tail fitting or synthesis error.
    #[error(transparent)]
    Extreme(#[from] ExtremeError),
}

/// Coarse failure class reported per combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-domain values.
    InvalidInput,
    /// No analog for a required context after the window fallback.
    InsufficientData,
    /// GPD fit failed or produced an invalid tail.
    FitFailure,
    /// A requested period lies outside its source data.
    DateRangeError,
}

impl ErrorKind {
    /// Stable lower-case label.
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::InsufficientData => "insufficient_data",
            ErrorKind::FitFailure => "fit_failure",
            ErrorKind::DateRangeError => "date_range",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl PipelineError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::InvalidInput { .. } | PipelineError::Calendar(_) => {
                ErrorKind::InvalidInput
            }
            PipelineError::DateRange { .. } => ErrorKind::DateRangeError,
            PipelineError::Markov(e) => markov_kind(e),
            PipelineError::Bootstrap(e) => match e {
                BootstrapError::NoAnalog { .. } | BootstrapError::DegenerateWeights { .. } => {
                    ErrorKind::InsufficientData
                }
                BootstrapError::Markov(m) => markov_kind(m),
                BootstrapError::EmptyTarget | BootstrapError::InvalidConfig { .. } => {
                    ErrorKind::InvalidInput
                }
            },
            PipelineError::Extreme(e) => match e {
                ExtremeError::FitFailure { .. } | ExtremeError::InvalidParams { .. } => {
                    ErrorKind::FitFailure
                }
                ExtremeError::InvalidConfig { .. }
                | ExtremeError::InvalidData { .. }
                | ExtremeError::EmptyMapping => ErrorKind::InvalidInput,
            },
        }
    }
}

fn markov_kind(e: &MarkovError) -> ErrorKind {
    match e {
        MarkovError::InsufficientData { .. } => ErrorKind::InsufficientData,
        MarkovError::WindowNotCovered { .. } => ErrorKind::DateRangeError,
        MarkovError::EmptyData
        | MarkovError::InvalidInput { .. }
        | MarkovError::InvalidThreshold { .. }
        | MarkovError::Calendar(_) => ErrorKind::InvalidInput,
    }
}
