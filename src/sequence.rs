//! Per-eAxC sequence-id generator (spec §4.6, component C6).
//!
//! Grounded on `srsran::ofh::sequence_identifier_generator`
//! (`examples/original_source/lib/ofh/transmitter/sequence_identifier_generator.h`):
//! an array of relaxed atomic `u8` counters, one per eAxC, each wrapping at
//! 256.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::constants::MAX_SUPPORTED_EAXC_ID_VALUE;
use crate::error::FatalOfhError;

const TABLE_LEN: usize = MAX_SUPPORTED_EAXC_ID_VALUE as usize;

/// Generates monotonically-increasing (mod 256) sequence identifiers, one
/// independent counter per eAxC.
pub struct SequenceIdentifierGenerator {
    counters: [AtomicU8; TABLE_LEN],
}

impl Default for SequenceIdentifierGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceIdentifierGenerator {
    pub fn new() -> Self {
        Self { counters: [const { AtomicU8::new(0) }; TABLE_LEN] }
    }

    /// Returns the pre-increment counter value for `eaxc`, wrapping at 256.
    ///
    /// `eaxc >= MAX_SUPPORTED_EAXC_ID_VALUE` is a programming error (spec
    /// §7, "Invalid eAxC").
    pub fn generate(&self, eaxc: u32) -> Result<u8, FatalOfhError> {
        let counter = self
            .counters
            .get(eaxc as usize)
            .ok_or(FatalOfhError::InvalidEaxc { eaxc, max: MAX_SUPPORTED_EAXC_ID_VALUE })?;
        Ok(counter.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_256_with_no_gaps() {
        let gen = SequenceIdentifierGenerator::new();
        for expected in 0u16..300 {
            let got = gen.generate(3).unwrap();
            assert_eq!(u16::from(got), expected % 256);
        }
    }

    #[test]
    fn counters_are_independent_per_eaxc() {
        let gen = SequenceIdentifierGenerator::new();
        assert_eq!(gen.generate(0).unwrap(), 0);
        assert_eq!(gen.generate(0).unwrap(), 1);
        assert_eq!(gen.generate(1).unwrap(), 0);
    }

    #[test]
    fn rejects_out_of_range_eaxc() {
        let gen = SequenceIdentifierGenerator::new();
        let err = gen.generate(MAX_SUPPORTED_EAXC_ID_VALUE).unwrap_err();
        assert!(matches!(err, FatalOfhError::InvalidEaxc { .. }));
    }
}
