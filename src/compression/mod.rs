//! IQ compression/decompression engine (spec §4.3, component C3).
//!
//! Grounded on the `srsran::ofh` compression library
//! (`examples/original_source/lib/ofh/compression/`): a quantizer converts
//! brain-float IQ samples to Q15 fixed point, and one of the per-PRB
//! algorithms in [`bfp`]/[`none`] packs them onto the wire. [`CompressionType`]
//! values outside `{None, Bfp}` are accepted as configuration but are a
//! [`crate::error::FatalOfhError::UnsupportedCompression`] if ever exercised,
//! mirroring `iq_compression_death_impl`.

pub mod bfp;
pub mod bitpack;
pub mod none;
pub mod params;
pub mod quantizer;

use num_complex::Complex32;

pub use params::{CompressionParams, CompressionType};
use quantizer::Quantizer;

use crate::constants::{MAX_NOF_PRBS, NOF_SUBCARRIERS_PER_RB};
use crate::error::FatalOfhError;

const Q_BIT_WIDTH: u32 = 16;
const NOF_SAMPLES_PER_PRB: usize = 2 * NOF_SUBCARRIERS_PER_RB;

/// Quantizes `iq_scaling`-scaled brain-float complex samples into Q15
/// fixed-point values, logging the post-quantization RMS at debug level
/// (mirroring `iq_compression_bfp_impl::quantize_input`).
fn quantize_input(out: &mut [i16], iq_data: &[Complex32], iq_scaling: f32) {
    let q = Quantizer::new(Q_BIT_WIDTH);
    let floats: Vec<f32> = iq_data.iter().flat_map(|s| [s.re, s.im]).collect();
    q.to_fixed_point_seq(out, &floats, iq_scaling);

    if log::log_enabled!(log::Level::Debug) && !out.is_empty() {
        let sum_squares: f64 = out.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
        let rms = (sum_squares / out.len() as f64).sqrt();
        if rms.is_normal() {
            log::debug!("quantized IQ samples RMS value of {rms}");
        }
    }
}

/// Compresses/decompresses PRB batches for one `(type, data_width)` pair,
/// selected once per cell at construction (spec design notes §9,
/// "Polymorphism"): hot per-PRB code is monomorphic, selection happens per
/// slot/handler construction, not per PRB.
#[derive(Debug, Clone, Copy)]
pub struct IqCompression {
    params: CompressionParams,
    iq_scaling: f32,
}

impl IqCompression {
    /// Builds a compressor for `params`, failing fatally if the type is one
    /// of the unimplemented tags (spec §4.3.3).
    pub fn new(params: CompressionParams, iq_scaling: f32) -> Result<Self, FatalOfhError> {
        if !params.compression_type.is_supported() {
            return Err(FatalOfhError::UnsupportedCompression(params.compression_type));
        }
        Ok(Self { params, iq_scaling })
    }

    pub fn params(&self) -> CompressionParams {
        self.params
    }

    /// Size in bytes of one compressed PRB for this compressor's parameters.
    pub const fn compressed_prb_size(&self) -> usize {
        self.params.compressed_prb_size_bytes()
    }

    /// Compresses `iq_data` (a multiple of 12 complex samples) into `out`.
    ///
    /// `out` must be at least `nof_prbs * compressed_prb_size()` bytes.
    /// Never partially writes `out` on failure (spec §4.3.3): the type was
    /// already validated at construction, so the only remaining fatal case
    /// is a caller-side buffer-size bug.
    pub fn compress(&self, out: &mut [u8], iq_data: &[Complex32]) -> Result<(), FatalOfhError> {
        debug_assert!(iq_data.len() % NOF_SUBCARRIERS_PER_RB == 0);
        let nof_prbs = iq_data.len() / NOF_SUBCARRIERS_PER_RB;
        let prb_size = self.compressed_prb_size();

        if out.len() < nof_prbs * prb_size {
            return Err(FatalOfhError::BuilderOverrun { needed: nof_prbs * prb_size, available: out.len() });
        }

        let mut quantized = vec![0i16; NOF_SAMPLES_PER_PRB * nof_prbs.min(MAX_NOF_PRBS)];
        quantize_input(&mut quantized, iq_data, self.iq_scaling);

        for prb in 0..nof_prbs {
            let in_slice: &[i16; NOF_SAMPLES_PER_PRB] =
                quantized[prb * NOF_SAMPLES_PER_PRB..(prb + 1) * NOF_SAMPLES_PER_PRB].try_into().unwrap();
            let out_slice = &mut out[prb * prb_size..(prb + 1) * prb_size];
            match self.params.compression_type {
                CompressionType::Bfp => bfp::compress_prb(out_slice, in_slice, self.params.data_width),
                CompressionType::None => none::compress_prb(out_slice, in_slice, self.params.data_width),
                other => return Err(FatalOfhError::UnsupportedCompression(other)),
            }
        }
        Ok(())
    }

    /// Decompresses `compressed` into `out` (a multiple of 12 complex samples).
    pub fn decompress(&self, out: &mut [Complex32], compressed: &[u8]) -> Result<(), FatalOfhError> {
        debug_assert!(out.len() % NOF_SUBCARRIERS_PER_RB == 0);
        let nof_prbs = out.len() / NOF_SUBCARRIERS_PER_RB;
        let prb_size = self.compressed_prb_size();

        if compressed.len() < nof_prbs * prb_size {
            return Err(FatalOfhError::BuilderOverrun { needed: nof_prbs * prb_size, available: compressed.len() });
        }

        for prb in 0..nof_prbs {
            let in_slice = &compressed[prb * prb_size..(prb + 1) * prb_size];
            let out_slice: &mut [Complex32; NOF_SUBCARRIERS_PER_RB] =
                (&mut out[prb * NOF_SUBCARRIERS_PER_RB..(prb + 1) * NOF_SUBCARRIERS_PER_RB]).try_into().unwrap();
            match self.params.compression_type {
                CompressionType::Bfp => bfp::decompress_prb(out_slice, in_slice, self.params.data_width),
                CompressionType::None => none::decompress_prb(out_slice, in_slice, self.params.data_width),
                other => return Err(FatalOfhError::UnsupportedCompression(other)),
            }
        }
        Ok(())
    }
}
