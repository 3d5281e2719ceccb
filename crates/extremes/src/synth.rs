//! Resampling of very-wet days from the fitted tail.

use pluvio_bootstrap::BootstrapMapping;
use pluvio_calendar::{DailySeries, NoLeapDate};
use pluvio_markov::PrecipState;
use rand::Rng;
use rand_distr::{Distribution, Open01};
use tracing::info;

use crate::error::ExtremeError;
use crate::gpd::GpdParams;

/// One resampled very-wet day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremeSample {
    /// Target date.
    pub date: NoLeapDate,
    /// Draw from the observed tail.
    pub historic_sample: f64,
    /// Draw from the projected tail at the same probability level; equal to
    /// `historic_sample` when no projected tail is given.
    pub forecast_sample: f64,
    /// Shape of the tail the final value came from.
    pub shape: f64,
    /// Scale of the tail the final value came from.
    pub scale: f64,
    /// Threshold of the tail the final value came from.
    pub threshold: f64,
}

/// Downscaled series plus the extreme-day diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    /// Final daily series over the mapping's target dates.
    pub series: DailySeries,
    /// One row per very-wet day, in date order.
    pub samples: Vec<ExtremeSample>,
}

/// Replaces the magnitude of every very-wet analog day with a GPD draw.
///
/// One uniform variate per very-wet day feeds both the observed and (if
/// given) projected inverse CDFs, so the two samples share a probability
/// level. The series takes the projected value when `projected` is set,
/// otherwise the observed one. Other days keep their analog's magnitude.
///
/// # Errors
///
/// [`ExtremeError::EmptyMapping`] if the mapping is empty.
#[tracing::instrument(skip_all, fields(n_days = mapping.len(), projected = projected.is_some()))]
pub fn synthesize_extremes(
    mapping: &BootstrapMapping,
    observed: &GpdParams,
    projected: Option<&GpdParams>,
    rng: &mut impl Rng,
) -> Result<Synthesis, ExtremeError> {
    let first = mapping
        .entries()
        .first()
        .ok_or(ExtremeError::EmptyMapping)?;
    let used = projected.unwrap_or(observed);

    let mut values = Vec::with_capacity(mapping.len());
    let mut samples = Vec::new();
    for entry in mapping.entries() {
        if entry.state != PrecipState::VeryWet {
            values.push(entry.precip);
            continue;
        }
        let u: f64 = Open01.sample(rng);
        let historic_sample = observed.quantile(u);
        let forecast_sample = projected.map_or(historic_sample, |p| p.quantile(u));
        values.push(forecast_sample);
        samples.push(ExtremeSample {
            date: entry.target,
            historic_sample,
            forecast_sample,
            shape: used.shape(),
            scale: used.scale(),
            threshold: used.threshold(),
        });
    }

    info!(n_extremes = samples.len(), "extreme days resampled");
    Ok(Synthesis {
        series: DailySeries::new(first.target, values),
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluvio_bootstrap::MappingEntry;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn entry(target: &str, precip: f64, state: PrecipState) -> MappingEntry {
        MappingEntry {
            target: target.parse().unwrap(),
            source: "1999-07-01".parse().unwrap(),
            source_index: 0,
            precip,
            state,
            radius: 7,
        }
    }

    fn mapping() -> BootstrapMapping {
        BootstrapMapping::from_entries(vec![
            entry("2050-07-01", 0.0, PrecipState::Dry),
            entry("2050-07-02", 55.0, PrecipState::VeryWet),
            entry("2050-07-03", 4.0, PrecipState::Middle),
            entry("2050-07-04", 61.0, PrecipState::VeryWet),
        ])
    }

    #[test]
    fn only_very_wet_days_change() {
        let observed = GpdParams::new(0.1, 12.0, 40.0).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let out = synthesize_extremes(&mapping(), &observed, None, &mut rng).unwrap();
        let v = out.series.values();
        assert_eq!(v[0], 0.0);
        assert_eq!(v[2], 4.0);
        assert!(v[1] > 40.0 && v[3] > 40.0);
        assert_eq!(out.samples.len(), 2);
        assert_eq!(out.samples[0].date, "2050-07-02".parse().unwrap());
        assert_eq!(out.samples[1].forecast_sample, v[3]);
        // Hindcast: both columns hold the same draw.
        assert!(out.samples.iter().all(|s| s.historic_sample == s.forecast_sample));
    }

    #[test]
    fn projected_tail_shares_probability_level() {
        let observed = GpdParams::new(0.1, 12.0, 40.0).unwrap();
        let projected = GpdParams::new(0.1, 18.0, 40.0).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let out = synthesize_extremes(&mapping(), &observed, Some(&projected), &mut rng).unwrap();
        for s in &out.samples {
            let excess_ratio = (s.forecast_sample - 40.0) / (s.historic_sample - 40.0);
            assert!((excess_ratio - 1.5).abs() < 1e-9);
            assert_eq!(s.scale, 18.0);
        }
        assert_eq!(out.series.values()[1], out.samples[0].forecast_sample);
    }

    #[test]
    fn empty_mapping_rejected() {
        let observed = GpdParams::new(0.1, 12.0, 40.0).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        assert!(matches!(
            synthesize_extremes(&BootstrapMapping::default(), &observed, None, &mut rng),
            Err(ExtremeError::EmptyMapping)
        ));
    }
}
