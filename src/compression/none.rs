//! Uncompressed (spec §4.3.2) IQ packing: same quantize-then-pack pipeline as
//! BFP but with `exponent = 0` and no leading compression-parameter byte.
//!
//! Grounded on `srsran::ofh::iq_compression_none_impl`
//! (`examples/original_source/lib/ofh/compression/iq_compression_none_impl.cpp`).

use num_complex::Complex32;

use super::bfp::NOF_SAMPLES_PER_PRB;
use super::bitpack::{pack_bytes, packed_size_bytes, unpack_bits};
use super::quantizer::Quantizer;
use crate::constants::NOF_SUBCARRIERS_PER_RB;

/// Packs one already-quantized PRB using `data_width` bits per sample, no prefix byte.
pub fn compress_prb(out: &mut [u8], quantized: &[i16; NOF_SAMPLES_PER_PRB], data_width: u32) {
    pack_bytes(out, quantized, data_width);
}

/// Unpacks one PRB with no leading compression-parameter byte.
pub fn decompress_prb(out: &mut [Complex32; NOF_SUBCARRIERS_PER_RB], compressed: &[u8], data_width: u32) {
    let q = Quantizer::new(data_width);
    for (i, sample) in out.iter_mut().enumerate() {
        let bit_offset = i * 2 * data_width as usize;
        let re = q.sign_extend(unpack_bits(compressed, bit_offset, data_width));
        let im = q.sign_extend(unpack_bits(compressed, bit_offset + data_width as usize, data_width));
        sample.re = q.to_float(re as i32);
        sample.im = q.to_float(im as i32);
    }
}

/// Size in bytes of an uncompressed PRB at the given data width.
pub const fn compressed_prb_size(data_width: u32) -> usize {
    packed_size_bytes(NOF_SAMPLES_PER_PRB, data_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_without_prefix_byte() {
        let q = Quantizer::new(16);
        let mut quantized = [0i16; NOF_SAMPLES_PER_PRB];
        for (i, s) in quantized.iter_mut().enumerate() {
            *s = q.to_fixed_point((i as f32 / 24.0) - 0.5);
        }
        let mut buf = vec![0u8; compressed_prb_size(16)];
        compress_prb(&mut buf, &quantized, 16);
        assert_eq!(buf.len(), 48);

        let mut out = [Complex32::default(); NOF_SUBCARRIERS_PER_RB];
        decompress_prb(&mut out, &buf, 16);
        for (i, sample) in out.iter().enumerate() {
            let expected_re = q.to_float(quantized[2 * i] as i32);
            let expected_im = q.to_float(quantized[2 * i + 1] as i32);
            assert!((sample.re - expected_re).abs() < 1e-6);
            assert!((sample.im - expected_im).abs() < 1e-6);
        }
    }
}
