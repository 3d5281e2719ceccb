//! Deterministic seed derivation and run fingerprints.
//!
//! Seeds hash with 64-bit FNV-1a; fingerprints are SHA-256 digests.

use std::fmt;

use sha2::{Digest, Sha256};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Seed for one (model, experiment) run, independent of run order and
/// worker count.
pub fn derive_seed(base: u64, model: &str, experiment: &str) -> u64 {
    let mut h = fnv1a(FNV_OFFSET, &base.to_le_bytes());
    h = fnv1a(h, model.as_bytes());
  /// Accumulates `key=value` pairs into a SHA-256 hex digest.
///
/// Used to decide whether existing outputs were produced by an identical
/// run. Each value is length-prefixed, so no value can spill into the next
/// field.
#[derive(Debug, Clone, Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    /// Empty fingerprint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one field. Order matters.
    pub fn field(mut self, key: &str, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        self.hasher.update(key.as_bytes());
        self.hasher.update(b"=");
        self.hasher.update((value.len() as u64).to_le_bytes());
        self.hasher.update(value.as_bytes());
        self
    }

    /// Lowercase hex digest, 64 characters.
    pub fn finish(self) -> String {
        format!("{:x}", self.hasher.finalize())
    }
}

print {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_known_vector() {
        // FNV-1a 64 of "a".
        assert_eq!(fnv1a(FNV_OFFSET, b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn seeds_differ_per_combination() {
        let a = derive_seed(42, "MIROC6", "ssp245");
        assert_eq!(a, derive_seed(42, "MIROC6", "ssp245"));
        assert_ne!(a, derive_seed(42, "MIROC6", "ssp585"));
        assert_ne!(a, derive_seed(43, "MIROC6", "ssp245"));
        // The separator keeps ("ab", "c") and ("a", "bc") apart.
        assert_ne!(derive_seed(1, "ab", "c"), derive_seed(1, "a", "bc"));
    }

    #[test]
    fn fingerprint_depends_on_every_field() {
        let base = Fingerprint::new().field("seed", 42).field("model", "CESM2").finish();
        assert_eq!(base, Fingerprint::new().field("seed", 42).field("model", "CESM2").finish());
        assert_ne!(base, Fingerprint::new().field("seed", 43).field("model", "CESM2").finish());
        assert_eq!(base.len(), 64);
        assert!(base.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn empty_fingerprint_is_sha256_of_nothing() {
        assert_eq!(
            Fingerprint::new().finish(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn values_cannot_run_into_the_next_field() {
        let a = Fingerprint::new().field("a", "1\nb=2").finish();
        let b = Fingerprint::new().field("a", "1").field("b", "2").finish();
        assert_ne!(a, b);
    }
}
