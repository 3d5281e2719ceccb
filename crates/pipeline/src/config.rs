//! Run-wide configuration.

use std::sync::Arc;

use pluvio_bootstrap::{AnalogScorer, KnnScorer};
use pluvio_calendar::DateRange;
use pluvio_extremes::GpdConfig;
use pluvio_markov::{MarkovConfig, ShiftConfig};

use crate::error::PipelineError;

/// Days of climate-model projection required beyond each end of the
/// prediction window.
pub const PROJECTION_BUFFER_DAYS: u16 = 15;

/// Reference windows shorter than this many years log a warning.
pub const MIN_REFERENCE_YEARS: f64 = 30.0;

/// Settings shared by every combination of one run.
///
/// # Example
///
/// ```
/// use pluvio_calendar::DateRange;
/// use pluvio_pipeline::PipelineConfig;
///
/// let reference = DateRange::parse("1990-01-01", "2010-12-31").unwrap();
/// let prediction = DateRange::parse("2041-01-01", "2060-12-31").unwrap();
/// let config = PipelineConfig::new(reference)
///     .with_prediction(prediction)
///     .with_seed(7)
///     .with_workers(4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    reference: DateRange,
    prediction: Option<DateRange>,
    markov: MarkovConfig,
    shift: ShiftConfig,
    gpd: GpdConfig,
    scorer: Arc<dyn AnalogScorer>,
    seed: u64,
    n_workers: usize,
}

impl PipelineConfig {
    /// Defaults: no prediction window, default state, shift and GPD
    /// settings, [`KnnScorer`], base seed 0, one worker.
    pub fn new(reference: DateRange) -> Self {
        Self {
            reference,
            prediction: None,
            markov: MarkovConfig::new(),
            shift: ShiftConfig::new(),
            gpd: GpdConfig::new(),
            scorer: Arc::new(KnnScorer::new()),
            seed: 0,
            n_workers: 1,
        }
    }

    /// Sets the window projections synthesise.
    pub fn with_prediction(mut self, prediction: DateRange) -> Self {
        self.prediction = Some(prediction);
        self
    }

    /// Sets threshold and analog-window settings.
    pub fn with_markov(mut self, markov: MarkovConfig) -> Self {
        self.markov = markov;
        self
    }

    /// Sets the climate-model shift settings.
    pub fn with_shift(mut self, shift: ShiftConfig) -> Self {
        self.shift = shift;
        self
    }

    /// Sets the GPD fit settings.
    pub fn with_gpd(mut self, gpd: GpdConfig) -> Self {
        self.gpd = gpd;
        self
    }

    /// Sets the analog scoring strategy.
    pub fn with_scorer(mut self, scorer: Arc<dyn AnalogScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Sets the base seed combinations derive theirs from.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of combinations run concurrently.
    pub fn with_workers(mut self, n: usize) -> Self {
        self.n_workers = n;
        self
    }

    /// Reference window.
    pub fn reference(&self) -> &DateRange {
        &self.reference
    }

    /// Projection prediction window, if set. Hindcasts always cover the
    /// observed record.
    pub fn prediction(&self) -> Option<&DateRange> {
        self.prediction.as_ref()
    }

    /// State and analog-window settings.
    pub fn markov(&self) -> &MarkovConfig {
        &self.markov
    }

    /// Shift settings.
    pub fn shift(&self) -> &ShiftConfig {
        &self.shift
    }

    /// GPD settings.
    pub fn gpd(&self) -> &GpdConfig {
        &self.gpd
    }

    /// Analog scorer.
    pub fn scorer(&self) -> &dyn AnalogScorer {
        self.scorer.as_ref()
    }

    /// Base seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Worker count.
    pub fn n_workers(&self) -> usize {
        self.n_workers
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidInput`] for single-day windows or zero
    /// workers, or any error from the nested configurations.
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.markov.validate()?;
        self.shift.validate()?;
        self.gpd.validate()?;
        require_span("reference", &self.reference)?;
        if let Some(prediction) = &self.prediction {
            require_span("prediction", prediction)?;
        }
        if self.n_workers == 0 {
            return Err(PipelineError::InvalidInput {
                reason: "n_workers must be >= 1".to_string(),
            });
        }
        Ok(())
    }
}

fn require_span(what: &str, range: &DateRange) -> Result<(), PipelineError> {
    if range.end() <= range.start() {
        return Err(PipelineError::InvalidInput {
            reason: format!("{what} end must be after its start, got {range}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> DateRange {
        DateRange::parse("1990-01-01", "2010-12-31").unwrap()
    }

    #[test]
    fn defaults_validate() {
        let c = PipelineConfig::new(reference());
        assert!(c.validate().is_ok());
        assert_eq!(c.n_workers(), 1);
        assert_eq!(c.seed(), 0);
        assert!(c.prediction().is_none());
    }

    #[test]
    fn single_day_window_rejected() {
        let day = DateRange::parse("2050-01-01", "2050-01-01").unwrap();
        let err = PipelineConfig::new(reference())
            .with_prediction(day)
            .validate()
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput { .. }));
    }

    #[test]
    fn nested_configs_are_checked() {
        let bad = MarkovConfig::new().with_upper_percentile(120.0);
        assert!(PipelineConfig::new(reference()).with_markov(bad).validate().is_err());
        assert!(PipelineConfig::new(reference()).with_workers(0).validate().is_err());
    }
}
