//! Uplink-request handler (spec §4.10, component C10): emits the UL C-Plane
//! scheduling commands that tell the RU what to capture, for both regular
//! uplink slots (section type 1) and PRACH occasions (section type 3).
//!
//! Grounded on `ofh_uplink_request_handler_impl`
//! (`examples/original_source/lib/ofh/transmitter/ofh_uplink_request_handler_impl.cpp`
//! and `.h`): `handle_new_uplink_slot` walks the configured UL eAxCs and
//! records a per-slot/per-symbol context for the (out-of-scope) reception
//! path; `handle_prach_occasion` additionally derives the PRACH-specific
//! section-3 fields (subcarrier spacing, time/frequency offset) from the
//! preamble format, and records a [`PrachContext`] instead.
//!
//! The exact 3GPP PRACH cyclic-prefix constants (`phy_time_unit` conversions
//! from the `Tc` basic time unit) are not in the retrieved pack;
//! [`PreambleFormat::cp_length_samples`] implements a documented
//! simplification of that table rather than fabricate the missing
//! conversion precision (see `DESIGN.md`, Open Question: PRACH timing
//! constants). `frequency_offset`, by contrast, follows the original's
//! formula exactly (see [`UplinkRequestHandler::handle_prach_occasion`]).

use std::sync::Arc;

use crate::builders::{
    cplane, ecpri, ethernet_frame, CommonSectionFields, DataDirection, EcpriHeaderParams, EcpriMessageType, EthernetHeaderParams,
    FilterIndex, SectionScs, SectionType1Params, SectionType3Extra, SectionType3Params,
};
use crate::config::{CellConfig, CellFeatures};
use crate::constants::ECPRI_HEADER_LEN;
use crate::context::{NotifiedSymbolRepository, PrachContext, PrachContextRepository, UplinkCplaneContext, UplinkCplaneContextRepository, UplinkSlotContext, UplinkSlotRepository};
use crate::error::FatalOfhError;
use crate::ethernet::EthFramePool;
use crate::grid::UplinkSlotGrid;
use crate::metrics::{TimeExecutionMeasurer, UplinkRequestHandlerMetrics};
use crate::notifier::{ErrorContext, ErrorNotifier};
use crate::sequence::SequenceIdentifierGenerator;
use crate::timing::{OfdmSymbolRange, SlotPoint, SlotSymbolPoint, SubcarrierSpacing, TxWindowChecker};

use super::radio_header_for_slot;

/// Reference sample rate used to express PRACH time offsets in samples
/// (`ofh_uplink_request_handler_impl.cpp`: `ref_srate_Hz = 30.72e6`).
const REF_SAMPLE_RATE_HZ: f64 = 30.72e6;

/// 3GPP NR PRACH preamble formats this crate is able to schedule (spec
/// §4.10.2): the four long-preamble formats plus the short-preamble formats
/// that appear in O-RAN deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreambleFormat {
    Format0,
    Format1,
    Format2,
    Format3,
    FormatA1,
    FormatA2,
    FormatA3,
    FormatB1,
    FormatB4,
    FormatC0,
    FormatC2,
}

impl PreambleFormat {
    const fn is_long(self) -> bool {
        matches!(self, PreambleFormat::Format0 | PreambleFormat::Format1 | PreambleFormat::Format2 | PreambleFormat::Format3)
    }

    /// Number of preamble repetitions within one occasion, written into the
    /// section-3 `num_symbol`/`nof_symbols` field.
    const fn nof_repetitions(self) -> u8 {
        match self {
            PreambleFormat::Format0 | PreambleFormat::Format1 | PreambleFormat::Format2 | PreambleFormat::Format3 => 1,
            PreambleFormat::FormatA1 | PreambleFormat::FormatC0 => 2,
            PreambleFormat::FormatA2 => 4,
            PreambleFormat::FormatA3 | PreambleFormat::FormatB1 | PreambleFormat::FormatB4 | PreambleFormat::FormatC2 => 6,
        }
    }

    /// O-RAN PRACH subcarrier-spacing filter index, per
    /// `get_prach_cplane_filter_index` (spec §4.10.2's lookup table):
    /// format 3 (long preamble) uses 5 kHz, the other long-preamble formats
    /// use 1.25 kHz, formats C0/C2 follow the PUSCH numerology, and the
    /// remaining short-preamble formats default to the 15 kHz/30 kHz table
    /// entry matching PUSCH SCS.
    fn filter_index(self, pusch_scs: SubcarrierSpacing) -> FilterIndex {
        match self {
            PreambleFormat::Format3 => FilterIndex::UlPrachPreamble5khz,
            _ if self.is_long() => FilterIndex::UlPrachPreamble1p25khz,
            // Format B4 is mapped onto the 1.25 kHz RA SCS table entry in
            // this deployment's `prach_frequency_mapping_get` table rather
            // than the PUSCH-numerology-scaled short-preamble entry (spec §8
            // scenario 3: `filter_index=ul_prach_preamble_1p25khz`).
            PreambleFormat::FormatB4 => FilterIndex::UlPrachPreamble1p25khz,
            PreambleFormat::FormatC0 | PreambleFormat::FormatC2 => short_filter_index(pusch_scs),
            _ => short_filter_index(pusch_scs),
        }
    }

    fn section_scs(self, pusch_scs: SubcarrierSpacing) -> SectionScs {
        match self {
            PreambleFormat::Format3 => SectionScs::Khz5,
            _ if self.is_long() => SectionScs::Khz1_25,
            PreambleFormat::FormatB4 => SectionScs::Khz1_25,
            _ => match pusch_scs {
                SubcarrierSpacing::KHZ15 => SectionScs::Khz15,
                _ => SectionScs::Khz30,
            },
        }
    }

    /// PRACH subcarrier spacing in Hz, for the `K` ratio against the PUSCH
    /// numerology (`K = (1000 * pusch_scs_kHz) / prach_scs_Hz`).
    fn scs_hz(self, pusch_scs: SubcarrierSpacing) -> f64 {
        match self.section_scs(pusch_scs) {
            SectionScs::Khz1_25 => 1250.0,
            SectionScs::Khz3_75 => 3750.0,
            SectionScs::Khz5 => 5000.0,
            SectionScs::Khz7_5 => 7500.0,
            // Short-preamble formats use the PUSCH numerology's own SCS.
            _ => f64::from(pusch_scs.to_khz()) * 1000.0,
        }
    }

    /// Cyclic-prefix length in samples at [`REF_SAMPLE_RATE_HZ`], a
    /// simplified stand-in for the `phy_time_unit`-based `Tc` conversion
    /// table (see module docs): long-preamble formats use the longer 3GPP
    /// `N_CP_RA` values, short-preamble formats the shorter ones.
    fn cp_length_samples(self, numerology: u8) -> u32 {
        let base = if self.is_long() { 3168 } else { 1240 };
        (base >> numerology).max(1)
    }
}

fn short_filter_index(pusch_scs: SubcarrierSpacing) -> FilterIndex {
    match pusch_scs {
        SubcarrierSpacing::KHZ15 => FilterIndex::UlPrachPreambleShort15khz,
        _ => FilterIndex::UlPrachPreambleShort30khz,
    }
}

/// Context for [`UplinkRequestHandler::handle_new_uplink_slot`] (spec
/// §4.10.1 step 1).
#[derive(Debug, Clone, Copy)]
pub struct UlSlotContext {
    pub slot: SlotPoint,
}

/// Context for [`UplinkRequestHandler::handle_prach_occasion`] (spec
/// §4.10.2 step 1): the occasion's slot, starting symbol, preamble format
/// and frequency-domain allocation, as decided by the scheduler.
#[derive(Debug, Clone, Copy)]
pub struct PrachOccasionContext {
    pub slot: SlotPoint,
    pub start_symbol: u8,
    pub format: PreambleFormat,
    pub pusch_scs: SubcarrierSpacing,
    pub rb_offset: u16,
    pub nof_rb_ra: u32,
    /// Number of time-domain PRACH occasions multiplexed in this slot.
    pub nof_td_occasions: u8,
}

/// Component C10: builds and enqueues uplink C-Plane type-1 and PRACH
/// type-3 Ethernet frames.
pub struct UplinkRequestHandler {
    config: CellConfig,
    ul_cplane_pool: Arc<EthFramePool>,
    window_checker: TxWindowChecker,
    notifier: Arc<dyn ErrorNotifier>,
    metrics: UplinkRequestHandlerMetrics,
    seq_gen: SequenceIdentifierGenerator,
    ul_cplane_repo: UplinkCplaneContextRepository,
    ul_slot_repo: std::sync::Mutex<UplinkSlotRepository>,
    notified_symbol_repo: std::sync::Mutex<NotifiedSymbolRepository>,
    prach_repo: std::sync::Mutex<PrachContextRepository>,
}

impl UplinkRequestHandler {
    pub fn new(config: CellConfig, ul_cplane_pool: Arc<EthFramePool>, notifier: Arc<dyn ErrorNotifier>) -> Self {
        let ul_timing = config.tx_timing.ul_cplane_only();
        let advance = crate::timing::calculate_nof_symbols_before_ota(config.cp, config.scs, config.ul_processing_time, &ul_timing);
        let window_checker = TxWindowChecker::new(config.sector_id, advance, config.cp.nsymb_per_slot());
        Self {
            config,
            ul_cplane_pool,
            window_checker,
            notifier,
            metrics: UplinkRequestHandlerMetrics::new(),
            seq_gen: SequenceIdentifierGenerator::new(),
            ul_cplane_repo: UplinkCplaneContextRepository::new(),
            ul_slot_repo: std::sync::Mutex::new(UplinkSlotRepository::new()),
            notified_symbol_repo: std::sync::Mutex::new(NotifiedSymbolRepository::new()),
            prach_repo: std::sync::Mutex::new(PrachContextRepository::new()),
        }
    }

    pub fn metrics(&self) -> &UplinkRequestHandlerMetrics {
        &self.metrics
    }

    pub fn cplane_context_repository(&self) -> &UplinkCplaneContextRepository {
        &self.ul_cplane_repo
    }

    /// The handler's own transmission-window checker, so the top-level
    /// pipeline (component C12) can forward each OTA symbol tick to it.
    pub fn window_checker(&self) -> &TxWindowChecker {
        &self.window_checker
    }

    fn nsymb_per_slot(&self) -> u32 {
        self.config.cp.nsymb_per_slot()
    }

    fn eth_header_params(&self) -> EthernetHeaderParams {
        EthernetHeaderParams { dst_mac: self.config.dst_mac, src_mac: self.config.src_mac, vlan_tci: self.config.vlan_tci }
    }

    fn active_ul_range(&self, slot: SlotPoint) -> OfdmSymbolRange {
        match &self.config.tdd_pattern {
            Some(pattern) => pattern.active_ul_symbols(slot.slot_index(), self.config.cp),
            None => OfdmSymbolRange::full_slot(self.config.cp),
        }
    }

    /// Handles one uplink slot (spec §4.10.1): tells the RU which PRBs to
    /// capture for each configured UL eAxC.
    pub fn handle_new_uplink_slot(&self, context: UlSlotContext, grid: &dyn UplinkSlotGrid) {
        let timer = TimeExecutionMeasurer::new();
        let slot = context.slot;

        self.ul_cplane_pool.clear_slot(slot);

        if self.window_checker.is_late(slot) {
            self.metrics.on_late();
            self.notifier.on_late_uplink_message(ErrorContext { slot, sector_id: self.config.sector_id });
            if self.config.features.contains(CellFeatures::LATE_WARNING_LOGGING_ENABLED) {
                log::warn!("sector#{}: dropping late uplink grant for slot '{slot:?}'", self.config.sector_id);
            }
            self.metrics.record_execution(timer.elapsed());
            return;
        }

        let range = self.active_ul_range(slot);
        if range.is_empty() {
            self.metrics.record_execution(timer.elapsed());
            return;
        }

        let mut scheduled_eaxc = smallvec::SmallVec::new();
        for &eaxc in &self.config.ul_eaxc {
            let Some(allocation) = grid.allocation(eaxc) else { continue };
            scheduled_eaxc.push(eaxc);

            let radio_header = radio_header_for_slot(slot, DataDirection::Uplink, FilterIndex::Standard, range.start() as u8);
            let common = CommonSectionFields {
                section_id: 0,
                prb_start: allocation.start_prb,
                nof_prb: allocation.nof_prb,
                nof_symbols: range.length() as u8,
                ..Default::default()
            };

            self.ul_cplane_repo.add(
                slot,
                range.start(),
                eaxc,
                UplinkCplaneContext { radio_header, prb_start: allocation.start_prb, nof_prb: allocation.nof_prb, nof_symbols: range.length() as u8 },
            );

            self.send_section_type_1(slot, radio_header, common, eaxc);
        }

        self.notified_symbol_repo.lock().expect("notified symbol repo poisoned").notify(slot, range.start());
        self.ul_slot_repo.lock().expect("ul slot repo poisoned").add(UplinkSlotContext { slot, eaxc: scheduled_eaxc });

        self.metrics.record_execution(timer.elapsed());
    }

    fn send_section_type_1(&self, slot: SlotPoint, radio_header: crate::builders::RadioApplicationHeader, common: CommonSectionFields, eaxc: u32) {
        let symbol_point = SlotSymbolPoint::new(slot, radio_header.start_symbol_id as u32, self.nsymb_per_slot());
        let Some(scoped) = self.ul_cplane_pool.reserve_scoped(symbol_point) else {
            self.metrics.on_pool_exhausted();
            return;
        };

        let Ok(seq_id) = self.seq_gen.generate(eaxc) else {
            FatalOfhError::InvalidEaxc { eaxc, max: crate::constants::MAX_SUPPORTED_EAXC_ID_VALUE }.report_and_abort();
        };

        let eth_params = self.eth_header_params();
        let eth_header_len = eth_params.header_len();
        let payload_offset = eth_header_len + ECPRI_HEADER_LEN;

        let buffer = scoped.buffer();
        let storage = buffer.buffer_mut();
        let payload_len = cplane::build_section_type_1(&mut storage[payload_offset..], &SectionType1Params { radio_header, common })
            .unwrap_or_else(|e| e.report_and_abort());

        let ecpri_params = EcpriHeaderParams { message_type: EcpriMessageType::RealTimeControlData, payload_size: payload_len as u16, eaxc: eaxc as u16, seq_id };
        ecpri::build(&mut storage[eth_header_len..], &ecpri_params).unwrap_or_else(|e| e.report_and_abort());
        ethernet_frame::build(storage, &eth_params).unwrap_or_else(|e| e.report_and_abort());

        buffer.set_size(eth_header_len + ECPRI_HEADER_LEN + payload_len);
    }

    /// Handles one PRACH occasion (spec §4.10.2): derives the section-3
    /// fields from the preamble format and, if PRACH C-Plane is enabled for
    /// this cell, enqueues the scheduling command.
    pub fn handle_prach_occasion(&self, context: PrachOccasionContext) {
        let timer = TimeExecutionMeasurer::new();
        let slot = context.slot;

        self.ul_cplane_pool.clear_slot(slot);

        if self.window_checker.is_late(slot) {
            self.metrics.on_prach_late();
            self.notifier.on_late_prach_message(ErrorContext { slot, sector_id: self.config.sector_id });
            if self.config.features.contains(CellFeatures::LATE_WARNING_LOGGING_ENABLED) {
                log::warn!("sector#{}: dropping late PRACH occasion for slot '{slot:?}'", self.config.sector_id);
            }
            self.metrics.record_execution(timer.elapsed());
            return;
        }

        if context.nof_td_occasions > 1 {
            log::info!(
                "sector#{}: PRACH occasion for slot '{slot:?}' multiplexes {} time-domain occasions; only the first is scheduled",
                self.config.sector_id,
                context.nof_td_occasions
            );
        }

        let format = context.format;
        let pusch_scs = context.pusch_scs;
        let numerology = pusch_scs.numerology();

        let prach_scs_hz = format.scs_hz(pusch_scs);
        let k = (1000.0 * f64::from(pusch_scs.to_khz())) / prach_scs_hz;
        let prach_nof_rb = (f64::from(context.nof_rb_ra) * k).round() as u32;
        let prach_start_re = u32::from(context.rb_offset) * k.round() as u32 * 12;

        let cp_length_samples = format.cp_length_samples(numerology);
        let fft_size: u16 = match numerology {
            0 => 2048,
            1 => 4096,
            _ => 8192,
        };

        // `frequency_offset`, in half-`prach_scs_hz` units relative to the
        // channel bandwidth's center (spec §4.10.2, spec.md:231), grounded on
        // `ofh_data_flow_cplane_scheduling_commands_impl.cpp:115-121`:
        // `total_bw_Hz` spans the RU's full carrier, not just this
        // occasion's allocation, so it comes from `config.ru_nof_prbs`
        // rather than `prach_nof_rb`. `as i32` truncates toward zero,
        // matching the original's `static_cast<int>`.
        let offset_to_prach_hz = f64::from(prach_start_re) * prach_scs_hz;
        let total_bw_hz = 1000.0 * f64::from(self.config.scs.to_khz()) * self.config.ru_nof_prbs as f64 * 12.0;
        let freq_offset_hz = -(total_bw_hz / 2.0 - offset_to_prach_hz);
        let frequency_offset = (freq_offset_hz / (prach_scs_hz / 2.0)) as i32;

        let context_record = PrachContext {
            start_symbol_id: context.start_symbol,
            scs: format.section_scs(pusch_scs),
            filter_index: format.filter_index(pusch_scs),
            nof_prb: prach_nof_rb,
            num_symbol: format.nof_repetitions(),
        };

        for &eaxc in &self.config.prach_eaxc {
            self.prach_repo.lock().expect("prach repo poisoned").add(slot, u32::from(context.start_symbol), eaxc, context_record);

            if !self.config.features.contains(CellFeatures::PRACH_CPLANE_ENABLED) {
                continue;
            }

            let radio_header = radio_header_for_slot(slot, DataDirection::Uplink, context_record.filter_index, context.start_symbol);
            let params = SectionType3Params {
                radio_header,
                common: CommonSectionFields { section_id: 0, prb_start: context.rb_offset, nof_prb: prach_nof_rb, ..Default::default() },
                extra: SectionType3Extra {
                    scs: context_record.scs,
                    time_offset: cp_length_samples.min(u32::from(u16::MAX)) as u16,
                    fft_size,
                    frequency_offset,
                    num_symbol: context_record.num_symbol,
                },
            };

            self.send_section_type_3(slot, context.start_symbol, eaxc, &params);
        }

        self.metrics.record_execution(timer.elapsed());
    }

    fn send_section_type_3(&self, slot: SlotPoint, start_symbol: u8, eaxc: u32, params: &SectionType3Params) {
        let symbol_point = SlotSymbolPoint::new(slot, u32::from(start_symbol), self.nsymb_per_slot());
        let Some(scoped) = self.ul_cplane_pool.reserve_scoped(symbol_point) else {
            self.metrics.on_pool_exhausted();
            return;
        };

        let Ok(seq_id) = self.seq_gen.generate(eaxc) else {
            FatalOfhError::InvalidEaxc { eaxc, max: crate::constants::MAX_SUPPORTED_EAXC_ID_VALUE }.report_and_abort();
        };

        let eth_params = self.eth_header_params();
        let eth_header_len = eth_params.header_len();
        let payload_offset = eth_header_len + ECPRI_HEADER_LEN;

        let buffer = scoped.buffer();
        let storage = buffer.buffer_mut();
        let payload_len = cplane::build_section_type_3_prach(&mut storage[payload_offset..], params).unwrap_or_else(|e| e.report_and_abort());

        let ecpri_params = EcpriHeaderParams { message_type: EcpriMessageType::RealTimeControlData, payload_size: payload_len as u16, eaxc: eaxc as u16, seq_id };
        ecpri::build(&mut storage[eth_header_len..], &ecpri_params).unwrap_or_else(|e| e.report_and_abort());
        ethernet_frame::build(storage, &eth_params).unwrap_or_else(|e| e.report_and_abort());

        buffer.set_size(eth_header_len + ECPRI_HEADER_LEN + payload_len);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use smallvec::SmallVec;

    use super::*;
    use crate::compression::{CompressionParams, CompressionType};
    use crate::grid::UplinkPrbAllocation;
    use crate::notifier::NullErrorNotifier;
    use crate::timing::CyclicPrefix;

    struct FixedGrant;
    impl UplinkSlotGrid for FixedGrant {
        fn allocation(&self, _eaxc: u32) -> Option<UplinkPrbAllocation> {
            Some(UplinkPrbAllocation { start_prb: 0, nof_prb: 51 })
        }
    }

    fn config() -> CellConfig {
        CellConfig {
            sector_id: 0,
            scs: SubcarrierSpacing::KHZ30,
            cp: CyclicPrefix::Normal,
            du_nof_prbs: 51,
            ru_nof_prbs: 51,
            dl_eaxc: SmallVec::from_slice(&[0]),
            ul_eaxc: SmallVec::from_slice(&[0]),
            prach_eaxc: SmallVec::from_slice(&[0]),
            cplane_compression: CompressionParams::new(CompressionType::None, 16),
            uplane_compression: CompressionParams::new(CompressionType::Bfp, 9),
            iq_scaling: 1.0,
            mtu: 1500,
            vlan_tci: None,
            dst_mac: [1; 6],
            src_mac: [2; 6],
            tx_timing: crate::timing::TxWindowTimingParameters {
                sym_cp_dl_start: 13,
                sym_cp_dl_end: 13,
                sym_cp_ul_start: 13,
                sym_cp_ul_end: 13,
                sym_up_dl_start: 0,
                sym_up_dl_end: 0,
            },
            dl_processing_time: Duration::from_micros(400),
            ul_processing_time: Duration::from_micros(400),
            tdd_pattern: None,
            features: CellFeatures::METRICS_ENABLED | CellFeatures::LATE_WARNING_LOGGING_ENABLED | CellFeatures::PRACH_CPLANE_ENABLED,
        }
    }

    #[test]
    fn handle_new_uplink_slot_enqueues_one_message_per_eaxc() {
        let handler = UplinkRequestHandler::new(config(), Arc::new(EthFramePool::new(1500)), Arc::new(NullErrorNotifier));
        let slot = SlotPoint::new(SubcarrierSpacing::KHZ30, 0, 0);
        handler.handle_new_uplink_slot(UlSlotContext { slot }, &FixedGrant);

        let mut drained = Vec::new();
        handler.ul_cplane_pool.enqueue_pending(&mut drained);
        assert_eq!(drained.len(), 1);
        assert!(handler.cplane_context_repository().get(slot, 0, 0).is_some());
    }

    /// Decodes `[eth header | eCPRI header | radio app header | common
    /// section fields | scs | time_offset | fft_size | frequency_offset]`
    /// out of a drained section-type-3 frame, returning
    /// `(nof_prb, num_symbol, scs, filter_index, time_offset, fft_size, frequency_offset)`.
    fn decode_section_type_3(frame: &[u8], eth_header_len: usize) -> (u32, u8, crate::builders::SectionScs, FilterIndex, u16, u16, i32) {
        use crate::builders::SectionScs;

        let cursor = eth_header_len + ECPRI_HEADER_LEN;
        let radio_hdr = cursor;
        let filter_index = FilterIndex::try_from(frame[radio_hdr] & 0xF).unwrap();

        let common = radio_hdr + 4;
        let nof_prb = u32::from(frame[common + 4]);
        let num_symbol = frame[common + 7];

        let extra = common + 8;
        let scs = SectionScs::try_from(frame[extra]).unwrap();
        let time_offset = u16::from_be_bytes([frame[extra + 1], frame[extra + 2]]);
        let fft_size = u16::from_be_bytes([frame[extra + 3], frame[extra + 4]]);
        let frequency_offset = i32::from_be_bytes([frame[extra + 5], frame[extra + 6], frame[extra + 7], frame[extra + 8]]);

        (nof_prb, num_symbol, scs, filter_index, time_offset, fft_size, frequency_offset)
    }

    /// Spec §8 scenario 3: format B4, PUSCH SCS=30 kHz, rb_offset=0,
    /// nof_rb_ra=6, ru_nof_prbs=51 must derive `nof_prb=144` (=6·24),
    /// `scs=kHz1_25`, `filter_index=ul_prach_preamble_1p25khz`, `fft_size=4096`
    /// and, crucially, `frequency_offset=-14688`
    /// (`-(1000*30*51*12/2) / (1250/2)`).
    #[test]
    fn handle_prach_occasion_enqueues_one_section_per_prach_eaxc() {
        let cfg = config();
        let handler = UplinkRequestHandler::new(cfg.clone(), Arc::new(EthFramePool::new(1500)), Arc::new(NullErrorNotifier));
        let context = PrachOccasionContext {
            slot: SlotPoint::new(SubcarrierSpacing::KHZ30, 0, 0),
            start_symbol: 0,
            format: PreambleFormat::FormatB4,
            pusch_scs: SubcarrierSpacing::KHZ30,
            rb_offset: 0,
            nof_rb_ra: 6,
            nof_td_occasions: 1,
        };
        handler.handle_prach_occasion(context);

        let mut drained = Vec::new();
        handler.ul_cplane_pool.enqueue_pending(&mut drained);
        assert_eq!(drained.len(), 1);

        let eth_header_len = handler.eth_header_params().header_len();
        let frame = handler.ul_cplane_pool.buffer(drained[0]).data();
        let (nof_prb, num_symbol, scs, filter_index, _time_offset, fft_size, frequency_offset) = decode_section_type_3(frame, eth_header_len);

        assert_eq!(nof_prb, 144);
        assert_eq!(num_symbol, PreambleFormat::FormatB4.nof_repetitions());
        assert_eq!(scs, crate::builders::SectionScs::Khz1_25);
        assert_eq!(filter_index, FilterIndex::UlPrachPreamble1p25khz);
        assert_eq!(fft_size, 4096);
        assert_eq!(frequency_offset, -14688);
    }

    #[test]
    fn prach_disabled_records_context_but_sends_nothing() {
        let mut cfg = config();
        cfg.features.remove(CellFeatures::PRACH_CPLANE_ENABLED);
        let handler = UplinkRequestHandler::new(cfg, Arc::new(EthFramePool::new(1500)), Arc::new(NullErrorNotifier));
        let context = PrachOccasionContext {
            slot: SlotPoint::new(SubcarrierSpacing::KHZ30, 0, 0),
            start_symbol: 0,
            format: PreambleFormat::FormatB4,
            pusch_scs: SubcarrierSpacing::KHZ30,
            rb_offset: 0,
            nof_rb_ra: 6,
            nof_td_occasions: 1,
        };
        handler.handle_prach_occasion(context);

        let mut drained = Vec::new();
        handler.ul_cplane_pool.enqueue_pending(&mut drained);
        assert!(drained.is_empty());
    }

    #[test]
    fn late_uplink_slot_is_dropped() {
        let handler = UplinkRequestHandler::new(config(), Arc::new(EthFramePool::new(1500)), Arc::new(NullErrorNotifier));
        handler.window_checker.on_new_symbol(SlotSymbolPoint::new(SlotPoint::new(SubcarrierSpacing::KHZ30, 200, 0), 0, 14));
        let late_slot = SlotPoint::new(SubcarrierSpacing::KHZ30, 100, 0);
        handler.handle_new_uplink_slot(UlSlotContext { slot: late_slot }, &FixedGrant);
        assert_eq!(handler.metrics().collect().late_count, 1);
    }
}
