//! Top-level transmit pipeline (SPEC_FULL §4.12, component C12): owns the
//! three frame pools, the downlink/uplink-request handlers and the message
//! transmitter for one sector, and wires the OTA-symbol-boundary notifier
//! from the transmitter to the two handlers' window checkers.
//!
//! Grounded on `ofh_sector_impl`/`ofh_transmitter_impl`
//! (`examples/original_source/lib/ofh/ofh_sector_impl.cpp`,
//! `examples/original_source/lib/ofh/transmitter/ofh_transmitter_impl.cpp`):
//! a `ofh_transmitter_impl` owns the handlers and the message transmitter and
//! forwards `handle_new_ota_symbol` to each; `ofh_sector_impl` is the
//! outermost object a cell constructs. This crate collapses that into one
//! `TransmitPipeline` since the reception-path half of `ofh_sector_impl` is
//! out of scope (spec §1 Non-goals).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::CellConfig;
use crate::error::ConfigError;
use crate::ethernet::EthFramePool;
use crate::gateway::EthernetGateway;
use crate::grid::{DownlinkResourceGrid, UplinkSlotGrid};
use crate::handlers::{DlDataContext, DownlinkHandler, PrachOccasionContext, UlSlotContext, UplinkRequestHandler};
use crate::notifier::ErrorNotifier;
use crate::timing::{SlotSymbolPoint, TxWindowChecker};
use crate::transmitter::MessageTransmitter;

/// Owns one sector's transmit-side frame pools, handlers and transmitter,
/// and fans the OTA symbol tick out to all three (spec §4.12 "On each OTA
/// symbol boundary: notify the window checkers, then drain the pools").
///
/// Construction validates `config` once (spec §5 "real-time safety"); after
/// that, every `handle_*`/`on_new_symbol` call is allocation-free on the
/// success path.
pub struct TransmitPipeline {
    downlink_handler: DownlinkHandler,
    uplink_handler: UplinkRequestHandler,
    transmitter: MessageTransmitter,
    stopped: AtomicBool,
}

impl TransmitPipeline {
    pub fn new(config: CellConfig, gateway: Arc<dyn EthernetGateway>, notifier: Arc<dyn ErrorNotifier>) -> Result<Self, ConfigError> {
        // Re-validated defensively: a `TransmitPipeline` may be built
        // directly from a hand-assembled `CellConfig` (e.g. in tests)
        // without going through a separate config-loading validation step.
        config.validate()?;

        let dl_cplane_pool = Arc::new(EthFramePool::new(config.mtu));
        let ul_cplane_pool = Arc::new(EthFramePool::new(config.mtu));
        let dl_uplane_pool = Arc::new(EthFramePool::new(config.mtu));

        let dl_timing = config.tx_timing.dl_only();
        let dl_advance =
            crate::timing::calculate_nof_symbols_before_ota(config.cp, config.scs, config.dl_processing_time, &dl_timing);
        let dl_window_checker = TxWindowChecker::new(config.sector_id, dl_advance, config.cp.nsymb_per_slot());

        // `DownlinkHandler::new` only fails on an unsupported U-Plane
        // compression scheme, which `config.validate()` above has already
        // ruled out; a failure here indicates a bug in that validation, not
        // a recoverable runtime condition.
        let downlink_handler =
            DownlinkHandler::new(config.clone(), dl_cplane_pool.clone(), dl_uplane_pool.clone(), dl_window_checker, notifier.clone())
                .unwrap_or_else(|e| e.report_and_abort());

        let uplink_handler = UplinkRequestHandler::new(config.clone(), ul_cplane_pool.clone(), notifier);

        let transmitter = MessageTransmitter::new(dl_cplane_pool, ul_cplane_pool, dl_uplane_pool, gateway, config.tx_timing);

        Ok(Self { downlink_handler, uplink_handler, transmitter, stopped: AtomicBool::new(false) })
    }

    pub fn downlink_handler(&self) -> &DownlinkHandler {
        &self.downlink_handler
    }

    pub fn uplink_handler(&self) -> &UplinkRequestHandler {
        &self.uplink_handler
    }

    pub fn transmitter(&self) -> &MessageTransmitter {
        &self.transmitter
    }

    /// Stops the pipeline: every subsequent `handle_*` call becomes a no-op
    /// (spec §4.12 "a stopped pipeline drops rather than enqueues"). There is
    /// no `start()` counterpart — a freshly constructed pipeline is already
    /// running.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Forwards one downlink slot's resource grid to the downlink handler,
    /// unless the pipeline has been stopped.
    pub fn handle_dl_data(&self, context: DlDataContext, grid: &dyn DownlinkResourceGrid) {
        if self.is_stopped() {
            return;
        }
        self.downlink_handler.handle_dl_data(context, grid);
    }

    /// Forwards one uplink slot's grant to the uplink-request handler,
    /// unless the pipeline has been stopped.
    pub fn handle_new_uplink_slot(&self, context: UlSlotContext, grid: &dyn UplinkSlotGrid) {
        if self.is_stopped() {
            return;
        }
        self.uplink_handler.handle_new_uplink_slot(context, grid);
    }

    /// Forwards one PRACH occasion to the uplink-request handler, unless the
    /// pipeline has been stopped.
    pub fn handle_prach_occasion(&self, context: PrachOccasionContext) {
        if self.is_stopped() {
            return;
        }
        self.uplink_handler.handle_prach_occasion(context);
    }

    /// Called once per OFDM symbol boundary (spec §4.11/§4.12): updates both
    /// handlers' window checkers' notion of "now", then drains the frame
    /// pools and sends whatever has entered its transmission window. Runs
    /// even after [`Self::stop`], so already-queued frames still drain.
    pub fn on_new_symbol(&self, ota_symbol_point: SlotSymbolPoint) {
        self.downlink_handler.window_checker().on_new_symbol(ota_symbol_point);
        self.uplink_handler.window_checker().on_new_symbol(ota_symbol_point);
        self.transmitter.on_new_symbol(ota_symbol_point);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;

    use num_complex::Complex32;
    use smallvec::SmallVec;

    use super::*;
    use crate::compression::{CompressionParams, CompressionType};
    use crate::grid::UplinkPrbAllocation;
    use crate::notifier::NullErrorNotifier;
    use crate::timing::{CyclicPrefix, SlotPoint, SubcarrierSpacing, TxWindowTimingParameters};

    struct FlatGrid {
        samples: Vec<Complex32>,
    }

    impl DownlinkResourceGrid for FlatGrid {
        fn read_port_symbol(&self, _port: usize, _symbol: u32) -> &[Complex32] {
            &self.samples
        }
    }

    struct FixedGrant;
    impl UplinkSlotGrid for FixedGrant {
        fn allocation(&self, _eaxc: u32) -> Option<UplinkPrbAllocation> {
            Some(UplinkPrbAllocation { start_prb: 0, nof_prb: 25 })
        }
    }

    struct RecordingGateway {
        calls: AtomicUsize,
        bursts: Mutex<Vec<usize>>,
    }

    impl RecordingGateway {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0), bursts: Mutex::new(Vec::new()) }
        }
    }

    impl EthernetGateway for RecordingGateway {
        fn send(&self, frames: &[&[u8]]) {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.bursts.lock().unwrap().push(frames.len());
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
                sym_cp_dl_start: 2,
                sym_cp_dl_end: 0,
                sym_cp_ul_start: 2,
                sym_cp_ul_end: 0,
                sym_up_dl_start: 2,
                sym_up_dl_end: 0,
            },
            dl_processing_time: Duration::from_micros(0),
            ul_processing_time: Duration::from_micros(0),
            tdd_pattern: None,
            features: crate::config::CellFeatures::METRICS_ENABLED,
        }
    }

    #[test]
    fn handle_dl_data_then_on_new_symbol_drains_and_sends() {
        let gateway = Arc::new(RecordingGateway::new());
        let pipeline = TransmitPipeline::new(config(), gateway.clone(), Arc::new(NullErrorNotifier)).unwrap();

        let slot = SlotPoint::new(SubcarrierSpacing::KHZ30, 0, 0);
        let grid = FlatGrid { samples: vec![Complex32::new(0.1, 0.2); 25 * 12] };
        pipeline.handle_dl_data(DlDataContext { slot }, &grid);

        let ota_point = SlotSymbolPoint::new(slot, 0, CyclicPrefix::Normal.nsymb_per_slot());
        for tick in 0..3 {
            pipeline.on_new_symbol(ota_point.advance(tick));
        }

        assert!(gateway.calls.load(Ordering::Relaxed) >= 1, "at least one burst must have been sent across the ticks");
    }

    #[test]
    fn stopped_pipeline_drops_new_uplink_work() {
        let gateway = Arc::new(RecordingGateway::new());
        let pipeline = TransmitPipeline::new(config(), gateway, Arc::new(NullErrorNotifier)).unwrap();
        pipeline.stop();
        assert!(pipeline.is_stopped());

        let slot = SlotPoint::new(SubcarrierSpacing::KHZ30, 0, 0);
        pipeline.handle_new_uplink_slot(UlSlotContext { slot }, &FixedGrant);

        assert!(pipeline.uplink_handler().cplane_context_repository().get(slot, 0, 0).is_none());
    }
}
