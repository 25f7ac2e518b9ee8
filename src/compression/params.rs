//! Compression parameter tuple shared by C-Plane and U-Plane messages (spec §3).

use crate::constants::{MAX_IQ_WIDTH, NOF_SUBCARRIERS_PER_RB};

/// Compression algorithm tag carried in O-RAN C-Plane/U-Plane sections.
///
/// Grounded on `srsran::ofh::compression_type`
/// (`examples/original_source/include/srsran/ofh/compression/compression_params.h`).
/// Only [`CompressionType::None`] and [`CompressionType::Bfp`] are implemented by
/// [`crate::compression::IqCompressor`]; the others are accepted as configuration
/// values so a cell can be configured with them, but routing a PRB through one
/// is a [`crate::error::FatalOfhError::UnsupportedCompression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionType {
    None,
    Bfp,
    MuLaw,
    BlockScaling,
    Modulation,
    BfpSelective,
    ModSelective,
}

impl CompressionType {
    /// Whether a compressed PRB for this type carries a leading 1-byte
    /// compression parameter (an exponent, a mu-law index, ...).
    ///
    /// Grounded on `is_compression_param_present` in
    /// `compression_properties.h`.
    pub const fn has_compression_param(self) -> bool {
        matches!(
            self,
            CompressionType::Bfp | CompressionType::MuLaw | CompressionType::BfpSelective | CompressionType::ModSelective
        )
    }

    /// Whether this crate's compressor/decompressor implements the type.
    pub const fn is_supported(self) -> bool {
        matches!(self, CompressionType::None | CompressionType::Bfp)
    }
}

/// `(type, data_width)` pair describing how IQ samples of a PRB are packed
/// onto the wire. `data_width` is in `1..=16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressionParams {
    pub compression_type: CompressionType,
    pub data_width: u32,
}

impl CompressionParams {
    pub const fn new(compression_type: CompressionType, data_width: u32) -> Self {
        Self { compression_type, data_width }
    }

    /// Size in bytes of a single compressed PRB for these parameters,
    /// including the leading compression-parameter byte when present.
    ///
    /// Grounded on `get_compressed_prb_size` (`compression_properties.h`).
    pub const fn compressed_prb_size_bytes(self) -> usize {
        let packed_bits = self.data_width as usize * NOF_SUBCARRIERS_PER_RB * 2;
        let packed_bytes = packed_bits.div_ceil(8);
        if self.compression_type.has_compression_param() {
            packed_bytes + 1
        } else {
            packed_bytes
        }
    }
}

impl Default for CompressionParams {
    fn default() -> Self {
        Self::new(CompressionType::Bfp, MAX_IQ_WIDTH)
    }
}
