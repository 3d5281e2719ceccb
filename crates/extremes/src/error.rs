//! Error types for the pluvio-extremes crate.

/// Error type for all fallible operations in the pluvio-extremes crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtremeError {
    /// Returned when a GPD fit cannot be produced.
    #[error("GPD fit failed with {n_exceedances} exceedances: {reason}")]
    FitFailure {
        /// What went wrong.
        reason: String,
        /// Number of exceedances available to the fit.
        n_exceedances: usize,
    },

    /// Returned when GPD parameters are non-finite or the scale is not positive.
    #[error("invalid GPD parameters: shape {shape}, scale {scale}, threshold {threshold}")]
    InvalidParams {
        /// Shape ξ.
        shape: f64,
        /// Scale σ.
        scale: f64,
        /// Threshold u.
        threshold: f64,
    },

    /// Returned when a fit configuration value is invalid.
    #[error("invalid GPD configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when there are no days to synthesise.
    #[error("bootstrap mapping is empty")]
    EmptyMapping,

    /// Returned when input values are negative or non-finite.
    #[error("input data contains invalid value {value}")]
    InvalidData {
        /// The rejected value.
        value: f64,
    },
}
