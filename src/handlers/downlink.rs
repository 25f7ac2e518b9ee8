//! Downlink handler (spec §4.9, component C9): turns one slot's scheduled
//! downlink resource grid into C-Plane section-type-1 and U-Plane
//! section-type-1 Ethernet frames, queued onto the frame pools for the
//! message transmitter to drain.
//!
//! Grounded on `ofh_downlink_handler_impl`
//! (`examples/original_source/lib/ofh/transmitter/ofh_downlink_handler_impl.cpp`)
//! and `ofh_data_flow_uplane_downlink_data_impl`
//! (`examples/original_source/lib/ofh/transmitter/ofh_data_flow_uplane_downlink_data_impl.cpp`):
//! clear stale pool entries, check lateness, derive the TDD-active symbol
//! range, then for every configured DL eAxC emit one C-Plane command
//! covering the whole range plus one U-Plane section per symbol per
//! fragment.

use std::sync::Arc;

use crate::builders::{
    cplane, ecpri, ethernet_frame, uplane, CommonSectionFields, DataDirection, EcpriHeaderParams, EcpriMessageType, EthernetHeaderParams,
    FilterIndex, SectionType1Params, UplaneSectionParams, UPLANE_SECTION_HEADER_LEN,
};
use crate::compression::IqCompression;
use crate::config::{CellConfig, CellFeatures};
use crate::constants::ECPRI_HEADER_LEN;
use crate::error::FatalOfhError;
use crate::ethernet::EthFramePool;
use crate::fragmentation::FragmentCalculator;
use crate::grid::DownlinkResourceGrid;
use crate::metrics::DownlinkHandlerMetrics;
use crate::notifier::{ErrorContext, ErrorNotifier};
use crate::sequence::SequenceIdentifierGenerator;
use crate::timing::{OfdmSymbolRange, SlotPoint, SlotSymbolPoint, TxWindowChecker};

use super::radio_header_for_slot;

/// Everything [`DownlinkHandler::handle_dl_data`] needs beyond the resource
/// grid reader itself (spec §4.9 step 1: "slot, resource grid reader").
#[derive(Debug, Clone, Copy)]
pub struct DlDataContext {
    pub slot: SlotPoint,
}

/// Component C9: builds and enqueues every DL C-Plane/U-Plane frame for one
/// slot.
pub struct DownlinkHandler {
    config: CellConfig,
    cplane_pool: Arc<EthFramePool>,
    uplane_pool: Arc<EthFramePool>,
    uplane_compression: IqCompression,
    window_checker: TxWindowChecker,
    notifier: Arc<dyn ErrorNotifier>,
    metrics: DownlinkHandlerMetrics,
    cplane_seq_gen: SequenceIdentifierGenerator,
    uplane_seq_gen: SequenceIdentifierGenerator,
}

impl DownlinkHandler {
    pub fn new(
        config: CellConfig,
        cplane_pool: Arc<EthFramePool>,
        uplane_pool: Arc<EthFramePool>,
        window_checker: TxWindowChecker,
        notifier: Arc<dyn ErrorNotifier>,
    ) -> Result<Self, FatalOfhError> {
        let uplane_compression = IqCompression::new(config.uplane_compression, config.iq_scaling)?;
        Ok(Self {
            config,
            cplane_pool,
            uplane_pool,
            uplane_compression,
            window_checker,
            notifier,
            metrics: DownlinkHandlerMetrics::new(),
            cplane_seq_gen: SequenceIdentifierGenerator::new(),
            uplane_seq_gen: SequenceIdentifierGenerator::new(),
        })
    }

    pub fn metrics(&self) -> &DownlinkHandlerMetrics {
        &self.metrics
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

    fn active_dl_range(&self, slot: SlotPoint) -> OfdmSymbolRange {
        match &self.config.tdd_pattern {
            Some(pattern) => pattern.active_dl_symbols(slot.slot_index(), self.config.cp),
            None => OfdmSymbolRange::full_slot(self.config.cp),
        }
    }

    /// Handles one slot's downlink resource grid (spec §4.9).
    pub fn handle_dl_data(&self, context: DlDataContext, grid: &dyn DownlinkResourceGrid) {
        let timer = crate::metrics::TimeExecutionMeasurer::new();
        let slot = context.slot;

        self.cplane_pool.clear_slot(slot);
        self.uplane_pool.clear_slot(slot);

        if self.window_checker.is_late(slot) {
            self.metrics.on_late();
            self.notifier.on_late_downlink_message(ErrorContext { slot, sector_id: self.config.sector_id });
            if self.config.features.contains(CellFeatures::LATE_WARNING_LOGGING_ENABLED) {
                log::warn!("sector#{}: dropping late downlink grid for slot '{slot:?}'", self.config.sector_id);
            }
            return;
        }

        let range = self.active_dl_range(slot);
        if !range.is_empty() {
            for (port, &eaxc) in self.config.dl_eaxc.iter().enumerate() {
                self.send_cplane_command(slot, range, eaxc);
                for symbol in range.start()..range.end() {
                    self.send_uplane_symbol(slot, symbol, eaxc, port, grid);
                }
            }
        }

        self.metrics.record_execution(timer.elapsed());
    }

    fn send_cplane_command(&self, slot: SlotPoint, range: OfdmSymbolRange, eaxc: u32) {
        let symbol_point = SlotSymbolPoint::new(slot, range.start(), self.nsymb_per_slot());
        let Some(scoped) = self.cplane_pool.reserve_scoped(symbol_point) else {
            self.metrics.on_pool_exhausted();
            return;
        };

        let radio_header = radio_header_for_slot(slot, DataDirection::Downlink, FilterIndex::Standard, range.start() as u8);
        let params = SectionType1Params {
            radio_header,
            common: CommonSectionFields { section_id: 0, prb_start: 0, nof_prb: self.config.du_nof_prbs as u32, nof_symbols: range.length() as u8, ..Default::default() },
        };

        let Ok(seq_id) = self.cplane_seq_gen.generate(eaxc) else {
            FatalOfhError::InvalidEaxc { eaxc, max: crate::constants::MAX_SUPPORTED_EAXC_ID_VALUE }.report_and_abort();
        };

        let eth_params = self.eth_header_params();
        let eth_header_len = eth_params.header_len();
        let payload_offset = eth_header_len + ECPRI_HEADER_LEN;

        let buffer = scoped.buffer();
        let storage = buffer.buffer_mut();
        let payload_len = cplane::build_section_type_1(&mut storage[payload_offset..], &params).unwrap_or_else(|e| e.report_and_abort());

        let ecpri_params = EcpriHeaderParams { message_type: EcpriMessageType::RealTimeControlData, payload_size: payload_len as u16, eaxc: eaxc as u16, seq_id };
        ecpri::build(&mut storage[eth_header_len..], &ecpri_params).unwrap_or_else(|e| e.report_and_abort());
        ethernet_frame::build(storage, &eth_params).unwrap_or_else(|e| e.report_and_abort());

        buffer.set_size(eth_header_len + ECPRI_HEADER_LEN + payload_len);
    }

    fn send_uplane_symbol(&self, slot: SlotPoint, symbol: u32, eaxc: u32, port: usize, grid: &dyn DownlinkResourceGrid) {
        let ru_nof_prbs = self.config.ru_nof_prbs as u32;
        let du_nof_prbs = self.config.du_nof_prbs as u32;

        // Zero-pad the DU's scheduled PRBs up to the RU's carrier bandwidth
        // when the two differ (spec §4.9 step 5 / SPEC_FULL §11.1): the DU
        // occupies the low PRBs of the RU's band, the rest is silence.
        let du_samples = grid.read_port_symbol(port, symbol);
        let mut padded;
        let iq_data: &[num_complex::Complex32] = if ru_nof_prbs == du_nof_prbs {
            du_samples
        } else {
            padded = vec![num_complex::Complex32::default(); ru_nof_prbs as usize * crate::constants::NOF_SUBCARRIERS_PER_RB];
            let copy_len = du_samples.len().min(padded.len());
            padded[..copy_len].copy_from_slice(&du_samples[..copy_len]);
            &padded
        };

        let eth_params = self.eth_header_params();
        let eth_header_len = eth_params.header_len();
        let section_overhead = eth_header_len + ECPRI_HEADER_LEN + UPLANE_SECTION_HEADER_LEN;
        let frame_payload_size = self.config.mtu.saturating_sub(section_overhead);

        let symbol_point = SlotSymbolPoint::new(slot, symbol, self.nsymb_per_slot());
        let mut calc = FragmentCalculator::new(0, ru_nof_prbs, self.uplane_compression.params());

        loop {
            let fragment = calc.next(frame_payload_size);
            if fragment.nof_prb == 0 {
                self.metrics.on_fragment_too_small();
                log::warn!("{}", crate::error::OfhWarning::FragmentTooSmall);
                break;
            }

            let Some(scoped) = self.uplane_pool.reserve_scoped(symbol_point) else {
                self.metrics.on_pool_exhausted();
                break;
            };

            let radio_header = radio_header_for_slot(slot, DataDirection::Downlink, FilterIndex::Standard, symbol);
            let params = UplaneSectionParams { radio_header, start_prb: fragment.start_prb as u16, nof_prb: fragment.nof_prb, symbol_id: symbol as u8 };
            let Ok(seq_id) = self.uplane_seq_gen.generate(eaxc) else {
                FatalOfhError::InvalidEaxc { eaxc, max: crate::constants::MAX_SUPPORTED_EAXC_ID_VALUE }.report_and_abort();
            };

            let fragment_samples = &iq_data[fragment.start_prb as usize * crate::constants::NOF_SUBCARRIERS_PER_RB
                ..(fragment.start_prb + fragment.nof_prb) as usize * crate::constants::NOF_SUBCARRIERS_PER_RB];

            let buffer = scoped.buffer();
            let storage = buffer.buffer_mut();
            let payload_offset = eth_header_len + ECPRI_HEADER_LEN;
            let payload_len =
                uplane::build_section_type_1(&mut storage[payload_offset..], &params, &self.uplane_compression, fragment_samples)
                    .unwrap_or_else(|e| e.report_and_abort());

            let ecpri_params = EcpriHeaderParams { message_type: EcpriMessageType::IqData, payload_size: payload_len as u16, eaxc: eaxc as u16, seq_id };
            ecpri::build(&mut storage[eth_header_len..], &ecpri_params).unwrap_or_else(|e| e.report_and_abort());
            ethernet_frame::build(storage, &eth_params).unwrap_or_else(|e| e.report_and_abort());

            buffer.set_size(eth_header_len + ECPRI_HEADER_LEN + payload_len);

            if fragment.is_last {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use num_complex::Complex32;
    use smallvec::SmallVec;

    use super::*;
    use crate::compression::{CompressionParams, CompressionType};
    use crate::notifier::NullErrorNotifier;
    use crate::timing::{CyclicPrefix, SubcarrierSpacing, TxWindowTimingParameters};

    struct FlatGrid {
        samples: Vec<Complex32>,
    }

    impl FlatGrid {
        fn new(nof_prb: usize) -> Self {
            Self { samples: vec![Complex32::new(0.5, -0.5); nof_prb * 12] }
        }
    }

    impl DownlinkResourceGrid for FlatGrid {
        fn read_port_symbol(&self, _port: usize, _symbol: u32) -> &[Complex32] {
            &self.samples
        }
    }

    fn config() -> CellConfig {
        CellConfig {
            sector_id: 0,
            scs: SubcarrierSpacing::KHZ30,
            cp: CyclicPrefix::Normal,
            du_nof_prbs: 25,
            ru_nof_prbs: 25,
            dl_eaxc: SmallVec::from_slice(&[0]),
            ul_eaxc: SmallVec::from_slice(&[0]),
            prach_eaxc: SmallVec::new(),
            cplane_compression: CompressionParams::new(CompressionType::None, 16),
            uplane_compression: CompressionParams::new(CompressionType::Bfp, 9),
            iq_scaling: 1.0,
            mtu: 1500,
            vlan_tci: None,
            dst_mac: [1; 6],
            src_mac: [2; 6],
            tx_timing: TxWindowTimingParameters {
                sym_cp_dl_start: 13,
                sym_cp_dl_end: 13,
                sym_cp_ul_start: 0,
                sym_cp_ul_end: 0,
                sym_up_dl_start: 0,
                sym_up_dl_end: 0,
            },
            dl_processing_time: Duration::from_micros(400),
            ul_processing_time: Duration::from_micros(400),
            tdd_pattern: None,
            features: CellFeatures::METRICS_ENABLED | CellFeatures::LATE_WARNING_LOGGING_ENABLED,
        }
    }

    fn handler() -> DownlinkHandler {
        let cfg = config();
        let window_checker = TxWindowChecker::new(0, 24, cfg.cp.nsymb_per_slot());
        DownlinkHandler::new(cfg, Arc::new(EthFramePool::new(1500)), Arc::new(EthFramePool::new(1500)), window_checker, Arc::new(NullErrorNotifier))
            .unwrap()
    }

    #[test]
    fn handle_dl_data_enqueues_one_cplane_and_one_uplane_message_per_symbol() {
        let handler = handler();
        let grid = FlatGrid::new(25);
        let slot = SlotPoint::new(SubcarrierSpacing::KHZ30, 0, 0);
        handler.handle_dl_data(DlDataContext { slot }, &grid);

        let mut cplane_drained = Vec::new();
        handler.cplane_pool.enqueue_pending(&mut cplane_drained);
        assert_eq!(cplane_drained.len(), 1, "one C-Plane command for the whole slot");

        let mut uplane_drained = Vec::new();
        handler.uplane_pool.enqueue_pending(&mut uplane_drained);
        assert_eq!(uplane_drained.len(), 14, "one U-Plane section per symbol, 25 PRBs fits in one fragment");
    }

    #[test]
    fn late_slot_is_dropped_without_enqueueing_anything() {
        let handler = handler();
        let grid = FlatGrid::new(25);
        handler.window_checker.on_new_symbol(SlotSymbolPoint::new(SlotPoint::new(SubcarrierSpacing::KHZ30, 200, 0), 0, 14));

        let late_slot = SlotPoint::new(SubcarrierSpacing::KHZ30, 100, 0);
        handler.handle_dl_data(DlDataContext { slot: late_slot }, &grid);

        let mut drained = Vec::new();
        handler.cplane_pool.enqueue_pending(&mut drained);
        assert!(drained.is_empty());
        assert_eq!(handler.metrics().collect().late_count, 1);
    }
}
