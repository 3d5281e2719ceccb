//! Precipitation states for the four-state analog chain.

use std::fmt;

/// Number of precipitation states.
pub const N_STATES: usize = 4;

/// Four-state precipitation classification.
///
/// Ordered from driest to wettest, so `Dry < Middle < Wet < VeryWet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PrecipState {
    /// Below the lower threshold.
    Dry = 0,
    /// From the lower threshold up to and including the upper threshold.
    Middle = 1,
    /// Above the upper threshold, up to and including the very-wet threshold.
    Wet = 2,
    /// Above the very-wet (98th percentile) threshold.
    VeryWet = 3,
}

impl PrecipState {
    /// All four states in index order.
    pub const ALL: [PrecipState; N_STATES] =
        [Self::Dry, Self::Middle, Self::Wet, Self::VeryWet];

    /// Returns the zero-based index of this state (matches the `#[repr(u8)]` discriminant).
    pub fn as_index(self) -> usize {
        self as usize
    }

    /// Inverse of [`PrecipState::as_index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lower-case label used in diagnostic tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dry => "dry",
            Self::Middle => "middle",
            Self::Wet => "wet",
            Self::VeryWet => "very_wet",
        }
    }
}

impl fmt::Display for PrecipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_index_values() {
        assert_eq!(PrecipState::Dry.as_index(), 0);
        assert_eq!(PrecipState::Middle.as_index(), 1);
        assert_eq!(PrecipState::Wet.as_index(), 2);
        assert_eq!(PrecipState::VeryWet.as_index(), 3);
    }

    #[test]
    fn from_index_roundtrip() {
        for s in PrecipState::ALL {
            assert_eq!(PrecipState::from_index(s.as_index()), Some(s));
        }
        assert_eq!(PrecipState::from_index(4), None);
    }

    #[test]
    fn ordering_is_dry_to_very_wet() {
        assert!(PrecipState::Dry < PrecipState::Middle);
        assert!(PrecipState::Middle < PrecipState::Wet);
        assert!(PrecipState::Wet < PrecipState::VeryWet);
    }

    #[test]
    fn labels() {
        assert_eq!(PrecipState::VeryWet.to_string(), "very_wet");
        assert_eq!(PrecipState::Dry.to_string(), "dry");
    }
}
