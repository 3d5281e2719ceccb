//! Configuration for state classification and transition statistics.

use crate::error::MarkovError;
use pluvio_calendar::DAYS_PER_YEAR;

/// Configuration for threshold resolution and analog window sizes.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use pluvio_markov::MarkovConfig;
///
/// let config = MarkovConfig::new()
///     .with_upper_percentile(85.0)
///     .with_radii(5, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MarkovConfig {
    lower_threshold: f64,
    upper_percentile: f64,
    narrow_radius: u16,
    wide_radius: u16,
}

impl MarkovConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `lower_threshold = 1.0` mm, `upper_percentile = 90.0`,
    /// `narrow_radius = 7`, `wide_radius = 14` days.
    pub fn new() -> Self {
        Self {
            lower_threshold: 1.0,
            upper_percentile: 90.0,
            narrow_radius: 7,
            wide_radius: 14,
        }
    }

    /// Sets the fixed dry/middle boundary in mm.
    pub fn with_lower_threshold(mut self, mm: f64) -> Self {
        self.lower_threshold = mm;
        self
    }

    /// Sets the percentile (0–100) of the reference distribution that
    /// separates middle from wet.
    pub fn with_upper_percentile(mut self, percentile: f64) -> Self {
        self.upper_percentile = percentile;
        self
    }

    /// Sets the calendar window radii (days) tried for analog candidates.
    pub fn with_radii(mut self, narrow: u16, wide: u16) -> Self {
        self.narrow_radius = narrow;
        self.wide_radius = wide;
        self
    }

    /// Returns the lower threshold in mm.
    pub fn lower_threshold(&self) -> f64 {
        self.lower_threshold
    }

    /// Returns the upper percentile (0–100).
    pub fn upper_percentile(&self) -> f64 {
        self.upper_percentile
    }

    /// Returns the narrow window radius.
    pub fn narrow_radius(&self) -> u16 {
        self.narrow_radius
    }

    /// Returns the wide (fallback) window radius.
    pub fn wide_radius(&self) -> u16 {
        self.wide_radius
    }

    /// Validates this configuration.
    ///
    /// The lower threshold must be finite and non-negative, the percentile in
    /// the open interval (0, 100), and `narrow <= wide <= 182`.
    pub fn validate(&self) -> Result<(), MarkovError> {
        if !self.lower_threshold.is_finite() || self.lower_threshold < 0.0 {
            return Err(MarkovError::InvalidThreshold {
                reason: format!(
                    "lower threshold must be finite and non-negative, got {}",
                    self.lower_threshold
                ),
            });
        }
        let p = self.upper_percentile;
        if !p.is_finite() || p <= 0.0 || p >= 100.0 {
            return Err(MarkovError::InvalidThreshold {
                reason: format!("upper percentile must be in (0, 100), got {p}"),
            });
        }
        if self.narrow_radius > self.wide_radius {
            return Err(MarkovError::InvalidThreshold {
                reason: format!(
                    "narrow radius {} exceeds wide radius {}",
                    self.narrow_radius, self.wide_radius
                ),
            });
        }
        if self.wide_radius > DAYS_PER_YEAR / 2 {
            return Err(MarkovError::InvalidThreshold {
                reason: format!("wide radius {} exceeds half a year", self.wide_radius),
            });
        }
        Ok(())
    }
}

impl Default for MarkovConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = MarkovConfig::new();
        assert_eq!(cfg.lower_threshold(), 1.0);
        assert_eq!(cfg.upper_percentile(), 90.0);
        assert_eq!((cfg.narrow_radius(), cfg.wide_radius()), (7, 14));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_bad_lower() {
        for v in [-0.1, f64::NAN, f64::INFINITY] {
            assert!(
                MarkovConfig::new()
                    .with_lower_threshold(v)
                    .validate()
                    .is_err(),
                "lower {v} accepted"
            );
        }
    }

    #[test]
    fn validate_bad_percentile() {
        for p in [0.0, 100.0, -5.0, 120.0, f64::NAN] {
            assert!(
                MarkovConfig::new()
                    .with_upper_percentile(p)
                    .validate()
                    .is_err(),
                "percentile {p} accepted"
            );
        }
    }

    #[test]
    fn validate_radii() {
        assert!(MarkovConfig::new().with_radii(14, 7).validate().is_err());
        assert!(MarkovConfig::new().with_radii(7, 200).validate().is_err());
        assert!(MarkovConfig::new().with_radii(0, 0).validate().is_ok());
    }
}
