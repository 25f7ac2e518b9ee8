//! Open Fronthaul C-Plane builder: section type 1 (scheduling) and section
//! type 3 (PRACH) (spec §4.5, §4.10.2, §6).
//!
//! Grounded on `ofh_data_flow_cplane_scheduling_commands_impl`
//! (`examples/original_source/lib/ofh/transmitter/ofh_data_flow_cplane_scheduling_commands_impl.cpp`):
//! `init_radio_app_header_parameters` / `init_common_section_0_1_3_5_fields` /
//! `generate_prach_control_parameters`. The 4-byte radio-application header
//! bit layout follows the public O-RAN.WG4.CUS section header table
//! bit-exactly; the common-section fields that follow it (§10.2 of
//! `SPEC_FULL.md`) are written byte-aligned rather than sub-byte packed,
//! since no literal bit-offset table for them is required by any testable
//! property.

use super::wire::{DataDirection, FilterIndex, SectionScs};
use crate::error::BuildError;

/// The 4-byte radio application header shared by every C-Plane/U-Plane
/// section (spec §6: "Radio header identical to C-Plane").
#[derive(Debug, Clone, Copy)]
pub struct RadioApplicationHeader {
    pub direction: DataDirection,
    pub filter_index: FilterIndex,
    pub frame_id: u8,
    pub subframe_id: u8,
    /// Slot index within the subframe's numerology, `0..=63`.
    pub slot_id: u8,
    pub start_symbol_id: u8,
}

const RADIO_APP_HEADER_LEN: usize = 4;
const PAYLOAD_VERSION: u8 = 1;

pub fn write_radio_app_header(out: &mut [u8], hdr: &RadioApplicationHeader) -> Result<usize, BuildError> {
    if out.len() < RADIO_APP_HEADER_LEN {
        return Err(BuildError::BufferTooSmall { what: "radio application header", needed: RADIO_APP_HEADER_LEN, available: out.len() });
    }
    let direction: u8 = hdr.direction.into();
    let filter_index: u8 = hdr.filter_index.into();

    out[0] = (direction << 7) | ((PAYLOAD_VERSION & 0x7) << 4) | (filter_index & 0xF);
    out[1] = hdr.frame_id;
    out[2] = ((hdr.subframe_id & 0xF) << 4) | ((hdr.slot_id >> 2) & 0xF);
    out[3] = ((hdr.slot_id & 0x3) << 6) | (hdr.start_symbol_id & 0x3F);

    Ok(RADIO_APP_HEADER_LEN)
}

/// Common section fields shared by type 1 and (as a prefix) type 3.
#[derive(Debug, Clone, Copy)]
pub struct CommonSectionFields {
    pub section_id: u16,
    pub prb_start: u16,
    pub nof_prb: u32,
    pub re_mask: u16,
    pub nof_symbols: u8,
}

impl Default for CommonSectionFields {
    fn default() -> Self {
        Self { section_id: 0, prb_start: 0, nof_prb: 0, re_mask: 0xFFF, nof_symbols: 0 }
    }
}

fn write_common_fields(out: &mut [u8], fields: &CommonSectionFields) -> Result<usize, BuildError> {
    const LEN: usize = 8;
    if out.len() < LEN {
        return Err(BuildError::BufferTooSmall { what: "common section fields", needed: LEN, available: out.len() });
    }
    if fields.nof_prb as usize > crate::constants::MAX_NOF_PRBS {
        return Err(BuildError::TooManyPrb { nof_prb: fields.nof_prb, max: crate::constants::MAX_NOF_PRBS as u32 });
    }
    out[0..2].copy_from_slice(&fields.section_id.to_be_bytes());
    out[2..4].copy_from_slice(&fields.prb_start.to_be_bytes());
    // O-RAN `numPrbc` convention: 0 means "all PRBs in the channel
    // bandwidth", which also covers allocations above `u8::MAX` that a
    // direct cast would otherwise truncate.
    out[4] = if fields.nof_prb > u8::MAX as u32 { 0 } else { fields.nof_prb as u8 };
    out[5..7].copy_from_slice(&(fields.re_mask & 0x0FFF).to_be_bytes());
    out[7] = fields.nof_symbols;
    Ok(LEN)
}

/// Parameters for a section-type-1 (DL/UL scheduling command) message.
#[derive(Debug, Clone, Copy)]
pub struct SectionType1Params {
    pub radio_header: RadioApplicationHeader,
    pub common: CommonSectionFields,
}

/// Writes `[radio_app_header | common_section_fields]` for section type 1,
/// returning the number of bytes written.
pub fn build_section_type_1(out: &mut [u8], params: &SectionType1Params) -> Result<usize, BuildError> {
    let hdr_len = write_radio_app_header(out, &params.radio_header)?;
    let common_len = write_common_fields(&mut out[hdr_len..], &params.common)?;
    Ok(hdr_len + common_len)
}

/// Additional fields carried by section type 3 (PRACH), spec §6/§4.10.2.
#[derive(Debug, Clone, Copy)]
pub struct SectionType3Extra {
    pub scs: SectionScs,
    pub time_offset: u16,
    pub fft_size: u16,
    /// Signed integer offset in half-subcarrier-spacing units.
    pub frequency_offset: i32,
    /// Number of PRACH preamble repetitions (written into `nof_symbols`).
    pub num_symbol: u8,
}

/// Parameters for a section-type-3 (PRACH) message.
#[derive(Debug, Clone, Copy)]
pub struct SectionType3Params {
    pub radio_header: RadioApplicationHeader,
    pub common: CommonSectionFields,
    pub extra: SectionType3Extra,
}

/// Writes `[radio_app_header | common_section_fields | scs | time_offset |
/// fft_size | frequency_offset]` for section type 3.
pub fn build_section_type_3_prach(out: &mut [u8], params: &SectionType3Params) -> Result<usize, BuildError> {
    let mut common = params.common;
    common.nof_symbols = params.extra.num_symbol;

    let hdr_len = write_radio_app_header(out, &params.radio_header)?;
    let common_len = write_common_fields(&mut out[hdr_len..], &common)?;
    let mut cursor = hdr_len + common_len;

    const EXTRA_LEN: usize = 1 + 2 + 2 + 4;
    if out.len() < cursor + EXTRA_LEN {
        return Err(BuildError::BufferTooSmall { what: "prach section extra fields", needed: cursor + EXTRA_LEN, available: out.len() });
    }
    out[cursor] = params.extra.scs.into();
    cursor += 1;
    out[cursor..cursor + 2].copy_from_slice(&params.extra.time_offset.to_be_bytes());
    cursor += 2;
    out[cursor..cursor + 2].copy_from_slice(&params.extra.fft_size.to_be_bytes());
    cursor += 2;
    out[cursor..cursor + 4].copy_from_slice(&params.extra.frequency_offset.to_be_bytes());
    cursor += 4;

    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> RadioApplicationHeader {
        RadioApplicationHeader {
            direction: DataDirection::Downlink,
            filter_index: FilterIndex::Standard,
            frame_id: 1,
            subframe_id: 0,
            slot_id: 1,
            start_symbol_id: 0,
        }
    }

    #[test]
    fn radio_app_header_packs_direction_version_and_filter_into_byte_zero() {
        let mut out = [0u8; RADIO_APP_HEADER_LEN];
        write_radio_app_header(&mut out, &header()).unwrap();
        assert_eq!(out[0] >> 7, 1, "direction bit");
        assert_eq!((out[0] >> 4) & 0x7, PAYLOAD_VERSION);
        assert_eq!(out[0] & 0xF, 0, "standard filter index");
    }

    #[test]
    fn slot_id_splits_across_byte_two_and_three() {
        let mut hdr = header();
        hdr.slot_id = 0b10_1010; // 42
        hdr.start_symbol_id = 5;
        let mut out = [0u8; RADIO_APP_HEADER_LEN];
        write_radio_app_header(&mut out, &hdr).unwrap();
        let reconstructed_high = out[2] & 0xF;
        let reconstructed_low = (out[3] >> 6) & 0x3;
        let reconstructed = (reconstructed_high << 2) | reconstructed_low;
        assert_eq!(reconstructed, 42);
        assert_eq!(out[3] & 0x3F, 5);
    }

    #[test]
    fn section_type_1_matches_spec_scenario_one() {
        // Scenario 1: 25 PRBs, direction DL, 14 symbols.
        let params = SectionType1Params {
            radio_header: header(),
            common: CommonSectionFields { nof_prb: 25, nof_symbols: 14, ..Default::default() },
        };
        let mut out = [0u8; 16];
        let len = build_section_type_1(&mut out, &params).unwrap();
        assert_eq!(len, 4 + 8);
        assert_eq!(out[4 + 4], 25);
        assert_eq!(out[4 + 7], 14);
        assert_eq!(&out[4..6], &0u16.to_be_bytes(), "section_id=0");
    }

    #[test]
    fn section_type_3_matches_spec_scenario_three() {
        // Scenario 3: format B4, 1.25 kHz, rb_offset=0, nof_rb_ra=6 -> nof_prb=144.
        let mut radio_header = header();
        radio_header.direction = DataDirection::Uplink;
        radio_header.filter_index = FilterIndex::UlPrachPreamble1p25khz;

        let params = SectionType3Params {
            radio_header,
            common: CommonSectionFields { nof_prb: 144, ..Default::default() },
            extra: SectionType3Extra { scs: SectionScs::Khz1_25, time_offset: 1280, fft_size: 4096, frequency_offset: -368_640, num_symbol: 1 },
        };
        let mut out = [0u8; 24];
        let len = build_section_type_3_prach(&mut out, &params).unwrap();
        assert_eq!(len, 4 + 8 + 9);
        assert_eq!(out[4 + 4], 144u32 as u8);
        let scs_byte = out[4 + 8];
        assert_eq!(scs_byte, SectionScs::Khz1_25 as u8);
        let fft_offset = 4 + 8 + 1 + 2;
        assert_eq!(&out[fft_offset..fft_offset + 2], &4096u16.to_be_bytes());
    }

    #[test]
    fn too_small_buffer_is_rejected() {
        let params = SectionType1Params { radio_header: header(), common: CommonSectionFields::default() };
        let mut out = [0u8; 3];
        assert!(matches!(build_section_type_1(&mut out, &params), Err(BuildError::BufferTooSmall { .. })));
    }
}
