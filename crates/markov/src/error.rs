//! Error types for the pluvio-markov crate.

use pluvio_calendar::CalendarError;

use crate::state::PrecipState;

/// Error type for all fallible operations in the pluvio-markov crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MarkovError {
    /// Returned when input data is empty.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when a precipitation value is negative or non-finite.
    #[error("invalid precipitation value {value} (must be finite and >= 0)")]
    InvalidInput {
        /// The rejected value.
        value: f64,
    },

    /// Returned when a threshold or configuration value is invalid.
    #[error("invalid threshold: {reason}")]
    InvalidThreshold {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when no analog candidates exist for a calendar context even
    /// after widening the window.
    #[error(
        "no analog candidates for day-of-year {doy} after {} day (tried ±{narrow_radius} and ±{wide_radius} days)",
        prior_label(.prior)
    )]
    InsufficientData {
        /// Day-of-year of the context (1..=365).
        doy: u16,
        /// Prior-day state, or `None` for the unconditional context.
        prior: Option<PrecipState>,
        /// Narrow window radius tried first.
        narrow_radius: u16,
        /// Wide window radius tried second.
        wide_radius: u16,
    },

    /// Returned when a required date window is not covered by a series.
    #[error("{what} window {requested} is not covered by series {available}")]
    WindowNotCovered {
        /// Which window.
        what: &'static str,
        /// Requested range.
        requested: String,
        /// Series range.
        available: String,
    },

    /// Calendar failure.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

fn prior_label(prior: &Option<PrecipState>) -> &'static str {
    match prior {
        Some(s) => s.label(),
        None => "any",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_insufficient_data_names_context() {
        let e = MarkovError::InsufficientData {
            doy: 45,
            prior: Some(PrecipState::VeryWet),
            narrow_radius: 7,
            wide_radius: 14,
        };
        assert_eq!(
            e.to_string(),
            "no analog candidates for day-of-year 45 after very_wet day (tried ±7 and ±14 days)"
        );
    }

    #[test]
    fn error_invalid_input() {
        let e = MarkovError::InvalidInput { value: -0.5 };
        assert_eq!(
            e.to_string(),
            "invalid precipitation value -0.5 (must be finite and >= 0)"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<MarkovError>();
    }
}
