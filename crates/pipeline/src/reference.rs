//! Statistics computed once per reference window and shared read-only by
//! every combination.

use pluvio_calendar::{DailySeries, DateRange};
use pluvio_extremes::{GpdFit, fit_gpd};
use pluvio_markov::{StateThresholds, TransitionTable};
use tracing::{info, warn};

use crate::config::{MIN_REFERENCE_YEARS, PipelineConfig};
use crate::error::PipelineError;

/// Frozen thresholds, transition table and observed tail fit.
#[derive(Debug, Clone)]
pub struct ReferenceStatistics {
    reference: DateRange,
    thresholds: StateThresholds,
    table: TransitionTable,
    tail: GpdFit,
}

impl ReferenceStatistics {
    /// Computes the statistics of `observed` over the configured reference
    /// window.
    ///
    /// # Errors
    ///
    /// [`PipelineError::DateRange`] if the window is not inside the observed
    /// record; classification, transition or fit errors otherwise.
    #[tracing::instrument(skip_all, fields(reference = %config.reference()))]
    pub fn compute(
        observed: &DailySeries,
        config: &PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let reference = *config.reference();
        if reference.years() < MIN_REFERENCE_YEARS {
            warn!(
                years = reference.years(),
                "reference window shorter than {MIN_REFERENCE_YEARS} years"
            );
        }

        let window = slice_within(observed, &reference, "reference", "observed record")?;
        let thresholds = StateThresholds::from_reference(window.values(), config.markov())?;
        let table = TransitionTable::build(observed, &reference, &thresholds, config.markov())?;
        let tail = fit_gpd(window.values(), thresholds.very_wet(), config.gpd())?;

        info!(
            lower = thresholds.lower(),
            upper = thresholds.upper(),
            very_wet = thresholds.very_wet(),
            shape = tail.params().shape(),
            scale = tail.params().scale(),
            "reference statistics frozen"
        );
        Ok(Self {
            reference,
            thresholds,
            table,
            tail,
        })
    }

    /// Window the statistics describe.
    pub fn reference(&self) -> &DateRange {
        &self.reference
    }

    /// State thresholds.
    pub fn thresholds(&self) -> &StateThresholds {
        &self.thresholds
    }

    /// Analog transition table.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// GPD fit of the observed values above the very-wet threshold.
    pub fn tail(&self) -> &GpdFit {
        &self.tail
    }
}

/// Fails with [`PipelineError::DateRange`] unless `available` contains
/// `requested`.
pub(crate) fn require_within(
    what: &str,
    requested: &DateRange,
    available: &DateRange,
    source: &str,
) -> Result<(), PipelineError> {
    if available.contains_range(requested) {
        Ok(())
    } else {
        Err(PipelineError::DateRange {
            what: format!("{what} in {source}"),
            requested: *requested,
            available: *available,
        })
    }
}

/// Cuts `requested` out of `series`, failing with
/// [`PipelineError::DateRange`] when the series does not cover it.
pub(crate) fn slice_within(
    series: &DailySeries,
    requested: &DateRange,
    what: &str,
    source: &str,
) -> Result<DailySeries, PipelineError> {
    let available = series.range()?;
    require_within(what, requested, &available, source)?;
    series.slice(requested).ok_or(PipelineError::DateRange {
        what: format!("{what} in {source}"),
        requested: *requested,
        available,
    })
}
