//! Block Floating Point compression (spec §4.3.1), the only compression
//! besides [`super::params::CompressionType::None`] this crate implements.
//!
//! Grounded on `srsran::ofh::iq_compression_bfp_impl`
//! (`examples/original_source/lib/ofh/compression/iq_compression_bfp_impl.cpp`):
//! convert to Q15 fixed point, find the shared exponent from the PRB's peak
//! magnitude, shift every sample right by it, and pack the low `data_width`
//! bits of each sample.

use num_complex::Complex32;

use super::bitpack::{pack_bytes, packed_size_bytes, unpack_bits};
use super::quantizer::Quantizer;
use crate::constants::{MAX_IQ_WIDTH, NOF_SUBCARRIERS_PER_RB};

/// Number of quantized scalar samples (I and Q interleaved) in one PRB.
pub const NOF_SAMPLES_PER_PRB: usize = 2 * NOF_SUBCARRIERS_PER_RB;

/// Determines the shared exponent for a PRB given its peak magnitude.
///
/// Grounded on `iq_compression_bfp_impl::determine_exponent`: finds the
/// largest left shift that keeps `max_abs` representable in `data_width`
/// bits, expressed as `MAX_IQ_WIDTH - data_width - leading_zeros`, clamped to
/// be non-negative.
pub fn determine_exponent(max_abs: u16, data_width: u32) -> u32 {
    debug_assert!(data_width != 0 && data_width <= MAX_IQ_WIDTH);

    let max_shift = MAX_IQ_WIDTH - data_width;
    let lz_without_sign = if max_abs > 0 && max_shift > 0 {
        // `u16::leading_zeros` counts all 16 bits; drop the implicit sign bit
        // srsRAN's `__builtin_clz` on a 32-bit promotion accounts for (16 + 1 bits).
        (max_abs as u32).leading_zeros().saturating_sub(16 + 1)
    } else {
        max_shift
    };
    let raw_exp = max_shift.min(lz_without_sign);
    (MAX_IQ_WIDTH - data_width).saturating_sub(raw_exp)
}

/// Peak magnitude of a quantized PRB, counting one extra for the asymmetric
/// negative range (spec §4.3.1 step 2: `max(|max|, |min| - 1)`).
fn peak_magnitude(quantized: &[i16]) -> u16 {
    let max = *quantized.iter().max().unwrap();
    let min = *quantized.iter().min().unwrap();
    max.unsigned_abs().max(min.unsigned_abs().saturating_sub(1))
}

/// Compresses one quantized PRB (24 Q15 samples) into `out`, writing the
/// 1-byte exponent followed by the packed `data_width`-bit samples.
pub fn compress_prb(out: &mut [u8], quantized: &[i16; NOF_SAMPLES_PER_PRB], data_width: u32) {
    let exponent = determine_exponent(peak_magnitude(quantized), data_width);

    let mut shifted = [0i16; NOF_SAMPLES_PER_PRB];
    for (s, &q) in shifted.iter_mut().zip(quantized.iter()) {
        *s = q >> exponent;
    }

    out[0] = exponent as u8;
    pack_bytes(&mut out[1..], &shifted, data_width);
}

/// Decompresses one compressed PRB into 12 complex samples.
pub fn decompress_prb(out: &mut [Complex32; NOF_SUBCARRIERS_PER_RB], compressed: &[u8], data_width: u32) {
    let exponent = compressed[0];
    let scaler = 1i32 << exponent;
    let q = Quantizer::new(data_width);
    let payload = &compressed[1..];

    for (i, sample) in out.iter_mut().enumerate() {
        let bit_offset = i * 2 * data_width as usize;
        let re = q.sign_extend(unpack_bits(payload, bit_offset, data_width));
        let im = q.sign_extend(unpack_bits(payload, bit_offset + data_width as usize, data_width));
        sample.re = q.to_float(re as i32 * scaler);
        sample.im = q.to_float(im as i32 * scaler);
    }
}

/// Size in bytes of a BFP-compressed PRB: 1 exponent byte plus the packed samples.
pub const fn compressed_prb_size(data_width: u32) -> usize {
    1 + packed_size_bytes(NOF_SAMPLES_PER_PRB, data_width)
}
