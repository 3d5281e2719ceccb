//! Precipitation unit conversion.

use pluvio_calendar::DailySeries;

/// Seconds per day: 1 kg m⁻² s⁻¹ of water is 86 400 mm/day.
pub const KG_M2_S_TO_MM_DAY: f64 = 86_400.0;

/// Units a precipitation series arrives in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Units {
    /// Millimetres per day (observations).
    #[default]
    MmPerDay,
    /// Mass flux, kg m⁻² s⁻¹ (climate-model native).
    KgPerM2PerS,
}

impl Units {
    /// Converts one value to mm/day.
    pub fn to_mm_day(self, value: f64) -> f64 {
        match self {
            Units::MmPerDay => value,
            Units::KgPerM2PerS => value * KG_M2_S_TO_MM_DAY,
        }
    }

    /// Converts one mm/day value back to these units.
    pub fn from_mm_day(self, value: f64) -> f64 {
        match self {
            Units::MmPerDay => value,
            Units::KgPerM2PerS => value / KG_M2_S_TO_MM_DAY,
        }
    }

    /// Converts a whole series to mm/day.
    pub fn series_to_mm_day(self, series: &DailySeries) -> DailySeries {
        match self {
            Units::MmPerDay => series.clone(),
            Units::KgPerM2PerS => series.map_values(|v| self.to_mm_day(v)),
        }
    }
}
