//! Target-to-source date mapping produced by the bootstrap walk.

use pluvio_calendar::{DailySeries, NoLeapDate};
use pluvio_markov::PrecipState;

/// One bootstrapped day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingEntry {
    /// Day being synthesised.
    pub target: NoLeapDate,
    /// Historical analog date.
    pub source: NoLeapDate,
    /// Position of `source` in the observed series.
    pub source_index: usize,
    /// Observed precipitation on `source`.
    pub precip: f64,
    /// State of `source`, equal to the state the walk required.
    pub state: PrecipState,
    /// Calendar radius the analog was found with.
    pub radius: u16,
}

/// One row of the bootstrap diagnostic table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingRow {
    /// Target date.
    pub target_date: NoLeapDate,
    /// Analog date.
    pub historic_date: NoLeapDate,
    /// Observed precipitation on the analog date.
    pub historic_precip: f64,
    /// State of the analog day.
    pub wet_state: PrecipState,
    /// State of the next row's analog (none on the last row).
    pub next_wet_state: Option<PrecipState>,
    /// Next row's analog date (none on the last row).
    pub next_historic_date: Option<NoLeapDate>,
}

/// Ordered `target -> source` pairs, one per requested day.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BootstrapMapping {
    entries: Vec<MappingEntry>,
}

impl BootstrapMapping {
    /// Wraps entries already in target order.
    pub fn from_entries(entries: Vec<MappingEntry>) -> Self {
        Self { entries }
    }

    /// All entries in target order.
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source dates in target order.
    pub fn source_dates(&self) -> Vec<NoLeapDate> {
        self.entries.iter().map(|e| e.source).collect()
    }

    /// The bootstrapped series: each target day carries its analog's
    /// observed precipitation.
    pub fn to_series(&self) -> Option<DailySeries> {
        let first = self.entries.first()?;
        Some(DailySeries::new(
            first.target,
            self.entries.iter().map(|e| e.precip).collect(),
        ))
    }

    /// Diagnostic rows pairing each day with its successor's analog.
    pub fn rows(&self) -> Vec<MappingRow> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let next = self.entries.get(i + 1);
                MappingRow {
                    target_date: e.target,
                    historic_date: e.source,
                    historic_precip: e.precip,
                    wet_state: e.state,
                    next_wet_state: next.map(|n| n.state),
                    next_historic_date: next.map(|n| n.source),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(target: &str, source: &str, precip: f64, state: PrecipState) -> MappingEntry {
        MappingEntry {
            target: target.parse().unwrap(),
            source: source.parse().unwrap(),
            source_index: 0,
            precip,
            state,
            radius: 7,
        }
    }

    #[test]
    fn rows_link_successor_and_end_with_none() {
        let m = BootstrapMapping::from_entries(vec![
            entry("2050-01-01", "1995-01-03", 0.0, PrecipState::Dry),
            entry("2050-01-02", "2001-12-30", 12.0, PrecipState::Wet),
        ]);
        let rows = m.rows();
        assert_eq!(rows[0].next_wet_state, Some(PrecipState::Wet));
        assert_eq!(rows[0].next_historic_date, Some("2001-12-30".parse().unwrap()));
        assert_eq!(rows[1].next_wet_state, None);
        assert_eq!(rows[1].next_historic_date, None);
    }

    #[test]
    fn to_series_starts_at_first_target() {
        let m = BootstrapMapping::from_entries(vec![
            entry("2050-01-01", "1995-01-03", 0.5, PrecipState::Dry),
            entry("2050-01-02", "2001-12-30", 12.0, PrecipState::Wet),
        ]);
        let s = m.to_series().unwrap();
        assert_eq!(s.start(), "2050-01-01".parse().unwrap());
        assert_eq!(s.values(), &[0.5, 12.0]);
        assert!(BootstrapMapping::default().to_series().is_none());
    }
}
