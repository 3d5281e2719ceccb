//! The units of work a run is split into.

use pluvio_calendar::DailySeries;

use crate::seed::derive_seed;
use crate::units::Units;

/// Climate-model input for one (model, experiment) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct GcmInput {
    model: String,
    experiment: String,
    historical: DailySeries,
    projected: DailySeries,
    units: Units,
}

impl GcmInput {
    /// Area-averaged model series, assumed to be in mm/day.
    pub fn new(
        model: impl Into<String>,
        experiment: impl Into<String>,
        historical: DailySeries,
        projected: DailySeries,
    ) -> Self {
        Self {
            model: model.into(),
            experiment: experiment.into(),
            historical,
            projected,
            units: Units::MmPerDay,
        }
    }

    /// Declares the units both series are stored in.
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Experiment name.
    pub fn experiment(&self) -> &str {
        &self.experiment
    }

    /// Historical run, native units.
    pub fn historical(&self) -> &DailySeries {
        &self.historical
    }

    /// Projected run, native units.
    pub fn projected(&self) -> &DailySeries {
        &self.projected
    }

    /// Native units.
    pub fn units(&self) -> Units {
        self.units
    }
}

/// Id of the observed-driven hindcast.
pub const HINDCAST_ID: &str = "hindcast";

/// Id of a projection run: `{model}_{experiment}`.
pub fn projection_id(model: &str, experiment: &str) -> String {
    format!("{model}_{experiment}")
}

/// Base name of the downscaled-series artifact for combination `id`.
pub fn output_name(id: &str) -> String {
    format!("downscaled_precip_{id}")
}

/// One independent pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum Combination {
    /// Observations stand in for the climate model; no shift, observed tail.
    Hindcast,
    /// Future projection driven by one model and experiment.
    Projection(GcmInput),
}

impl Combination {
    /// `hindcast` or `{model}_{experiment}`.
    pub fn id(&self) -> String {
        match self {
            Combination::Hindcast => HINDCAST_ID.to_string(),
            Combination::Projection(gcm) => projection_id(&gcm.model, &gcm.experiment),
        }
    }

    /// Base name of the downscaled-series artifact.
    pub fn output_name(&self) -> String {
        output_name(&self.id())
    }

    /// Seed for this combination derived from the run's base seed.
    pub fn seed(&self, base: u64) -> u64 {
        match self {
            Combination::Hindcast => derive_seed(base, HINDCAST_ID, ""),
            Combination::Projection(gcm) => derive_seed(base, &gcm.model, &gcm.experiment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(model: &str, experiment: &str) -> Combination {
        let s = DailySeries::new("2000-01-01".parse().unwrap(), vec![0.0; 3]);
        Combination::Projection(GcmInput::new(model, experiment, s.clone(), s))
    }

    #[test]
    fn naming() {
        assert_eq!(Combination::Hindcast.id(), "hindcast");
        assert_eq!(
            Combination::Hindcast.output_name(),
            "downscaled_precip_hindcast"
        );
        assert_eq!(
            projection("GFDL-ESM4", "ssp370").output_name(),
            "downscaled_precip_GFDL-ESM4_ssp370"
        );
    }

    #[test]
    fn seeds_are_per_combination() {
        let a = projection("MIROC6", "ssp126");
        let b = projection("MIROC6", "ssp585");
        assert_eq!(a.seed(1), a.clone().seed(1));
        assert_ne!(a.seed(1), b.seed(1));
        assert_ne!(a.seed(1), Combination::Hindcast.seed(1));
    }
}
