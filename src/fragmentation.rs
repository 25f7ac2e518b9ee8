//! PRB fragmentation calculator (spec §4.4, component C4).
//!
//! Grounded on `srsran::ofh::ofh_uplane_fragment_size_calculator`
//! (`examples/original_source/lib/ofh/transmitter/ofh_uplane_fragment_size_calculator.{h,cpp}`):
//! given a PRB range and the compressed size of one PRB, repeatedly answers
//! "how many PRBs fit in the next `frame_size` bytes", covering the whole
//! range without the caller tracking fragment boundaries itself.

use crate::compression::CompressionParams;

/// One fragment of a PRB range: `[start_prb, start_prb + nof_prb)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start_prb: u32,
    pub nof_prb: u32,
    pub is_last: bool,
}

/// Splits `[start_prb, start_prb + nof_prb)` into successive fragments that
/// each fit a caller-supplied frame size, one call to [`Self::next`] per
/// frame.
///
/// Grounded on `ofh_uplane_fragment_size_calculator::calculate_fragment_size`:
/// `prb_size` is fixed for the lifetime of the calculator (one section per
/// fragment, one compression scheme per resource grid push), so each call
/// only needs the frame's available payload size.
#[derive(Debug, Clone, Copy)]
pub struct FragmentCalculator {
    start_prb: u32,
    nof_prb: u32,
    prb_size: usize,
    next_start: u32,
}

impl FragmentCalculator {
    pub fn new(start_prb: u32, nof_prb: u32, compression: CompressionParams) -> Self {
        Self { start_prb, nof_prb, prb_size: compression.compressed_prb_size_bytes(), next_start: start_prb }
    }

    /// Computes the next fragment given `frame_size` available payload
    /// bytes. Per spec §4.4: if `frame_size < prb_size`, returns
    /// `nof_prb = 0` and the caller must skip that frame without advancing.
    pub fn next(&mut self, frame_size: usize) -> Fragment {
        if frame_size < self.prb_size {
            return Fragment { start_prb: self.next_start, nof_prb: 0, is_last: false };
        }

        let fits = (frame_size / self.prb_size) as u32;
        let fragment_start = self.next_start;
        let remaining = self.nof_prb - (self.next_start - self.start_prb);

        if fits >= remaining {
            self.next_start += remaining;
            Fragment { start_prb: fragment_start, nof_prb: remaining, is_last: true }
        } else {
            self.next_start += fits;
            Fragment { start_prb: fragment_start, nof_prb: fits, is_last: false }
        }
    }

    /// Total number of fragments a symbol of `nof_prb` PRBs needs, given the
    /// frame payload available for PRB data (`frame_size` minus header
    /// overhead). Sizes the frame pool per spec §4.7.6 / §6.
    ///
    /// Grounded on `ofh_uplane_fragment_size_calculator::calculate_nof_segments`.
    pub fn calculate_nof_segments(frame_payload_size: usize, nof_prb: u32, compression: CompressionParams) -> u32 {
        let prb_size = compression.compressed_prb_size_bytes();
        let fits_per_frame = (frame_payload_size / prb_size).max(1) as u32;
        nof_prb.div_ceil(fits_per_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::CompressionType;

    #[test]
    fn fragmentation_completeness_matches_spec_example() {
        // MTU=1500, headers=36, RU PRBs=273, W=16 uncompressed (prb=48 bytes):
        // frame_payload=1464, max PRBs/frame=30, 10 fragments of which the last is 3 PRBs.
        let compression = CompressionParams::new(CompressionType::None, 16);
        assert_eq!(compression.compressed_prb_size_bytes(), 48);

        let frame_payload = 1500 - 36;
        let mut calc = FragmentCalculator::new(0, 273, compression);
        let mut fragments = Vec::new();
        loop {
            let frag = calc.next(frame_payload);
            assert_ne!(frag.nof_prb, 0, "frame_size must be able to carry at least one PRB here");
            fragments.push(frag);
            if frag.is_last {
                break;
            }
        }

        assert_eq!(fragments.len(), 10);
        for frag in &fragments[..9] {
            assert_eq!(frag.nof_prb, 30);
        }
        assert_eq!(fragments.last().unwrap().nof_prb, 3);

        let total: u32 = fragments.iter().map(|f| f.nof_prb).sum();
        assert_eq!(total, 273);

        // Contiguity.
        let mut expected_start = 0;
        for frag in &fragments {
            assert_eq!(frag.start_prb, expected_start);
            expected_start += frag.nof_prb;
        }
    }

    #[test]
    fn too_small_frame_yields_zero_prb_without_advancing() {
        let compression = CompressionParams::new(CompressionType::Bfp, 9);
        let mut calc = FragmentCalculator::new(0, 10, compression);
        let prb_size = compression.compressed_prb_size_bytes();
        let frag = calc.next(prb_size - 1);
        assert_eq!(frag.nof_prb, 0);

        // Calculator did not advance: the very next call with a large enough
        // frame still starts at PRB 0.
        let frag = calc.next(1500);
        assert_eq!(frag.start_prb, 0);
        assert_eq!(frag.nof_prb, 10);
        assert!(frag.is_last);
    }

    #[test]
    fn fragmentation_completeness_over_random_ranges() {
        let compression = CompressionParams::new(CompressionType::Bfp, 14);
        let prb_size = compression.compressed_prb_size_bytes();
        for nof_prb in [1u32, 7, 24, 51, 106, 273] {
            for frame_size in [prb_size, prb_size * 3, prb_size * 30 + 5] {
                let mut calc = FragmentCalculator::new(0, nof_prb, compression);
                let mut total = 0u32;
                loop {
                    let frag = calc.next(frame_size);
                    assert!(frag.nof_prb > 0);
                    total += frag.nof_prb;
                    if frag.is_last {
                        break;
                    }
                }
                assert_eq!(total, nof_prb);
            }
        }
    }
}
