//! Message transmitter (spec §4.11, component C11): drains the three frame
//! pools once per OTA symbol tick and hands the collected frames to the
//! Ethernet gateway as a single burst.
//!
//! Grounded on `ofh_message_transmitter_impl`
//! (`examples/original_source/lib/ofh/transmitter/ofh_message_transmitter_impl.cpp`):
//! `on_new_symbol` builds one `frame_pool_interval` per partition
//! (`{symbol_point + window_end, symbol_point + window_start}`), drains each
//! pool's pending buffers that fall in that interval, and transmits the
//! union as one burst. Partitions are drained DL C-Plane, then UL C-Plane,
//! then DL U-Plane (spec §5: "the transmitter enqueues DL-CP before UL-CP
//! before DL-UP for the same OTA tick").

use std::sync::Arc;

use crate::ethernet::EthFramePool;
use crate::gateway::EthernetGateway;
use crate::metrics::{MessageTransmitterMetrics, TimeExecutionMeasurer};
use crate::timing::{SlotSymbolPoint, TxWindowTimingParameters};

/// Component C11: the single consumer of the three frame pools' pending
/// lists, invoked once per OFDM symbol boundary.
pub struct MessageTransmitter {
    dl_cplane_pool: Arc<EthFramePool>,
    ul_cplane_pool: Arc<EthFramePool>,
    dl_uplane_pool: Arc<EthFramePool>,
    gateway: Arc<dyn EthernetGateway>,
    tx_timing: TxWindowTimingParameters,
    metrics: MessageTransmitterMetrics,
}

impl MessageTransmitter {
    pub fn new(
        dl_cplane_pool: Arc<EthFramePool>,
        ul_cplane_pool: Arc<EthFramePool>,
        dl_uplane_pool: Arc<EthFramePool>,
        gateway: Arc<dyn EthernetGateway>,
        tx_timing: TxWindowTimingParameters,
    ) -> Self {
        Self { dl_cplane_pool, ul_cplane_pool, dl_uplane_pool, gateway, tx_timing, metrics: MessageTransmitterMetrics::new() }
    }

    pub fn metrics(&self) -> &MessageTransmitterMetrics {
        &self.metrics
    }

    /// Drains every pool partition whose transmission window has opened as
    /// of `ota_symbol_point` and sends the result as one burst.
    pub fn on_new_symbol(&self, ota_symbol_point: SlotSymbolPoint) {
        let timer = TimeExecutionMeasurer::new();

        let mut indices = Vec::with_capacity(crate::constants::MAX_TX_BURST_SIZE);
        self.drain_partition(&self.dl_cplane_pool, self.tx_timing.sym_cp_dl_end, self.tx_timing.sym_cp_dl_start, ota_symbol_point, &mut indices);
        let dl_cplane_count = indices.len();
        self.drain_partition(&self.ul_cplane_pool, self.tx_timing.sym_cp_ul_end, self.tx_timing.sym_cp_ul_start, ota_symbol_point, &mut indices);
        let ul_cplane_count = indices.len() - dl_cplane_count;
        self.drain_partition(&self.dl_uplane_pool, self.tx_timing.sym_up_dl_end, self.tx_timing.sym_up_dl_start, ota_symbol_point, &mut indices);

        if indices.is_empty() {
            self.metrics.record_execution(timer.elapsed());
            return;
        }

        let frames: Vec<&[u8]> = indices
            .iter()
            .map(|&(pool, idx)| pool.buffer(idx).data())
            .collect();
        let nof_bytes: usize = frames.iter().map(|f| f.len()).sum();
        self.gateway.send(&frames);
        self.metrics.on_burst_sent(frames.len(), nof_bytes);

        let (dl_cplane, rest) = indices.split_at(dl_cplane_count);
        let (ul_cplane, dl_uplane) = rest.split_at(ul_cplane_count);
        self.dl_cplane_pool.release_sent(&dl_cplane.iter().map(|(_, idx)| *idx).collect::<Vec<_>>());
        self.ul_cplane_pool.release_sent(&ul_cplane.iter().map(|(_, idx)| *idx).collect::<Vec<_>>());
        self.dl_uplane_pool.release_sent(&dl_uplane.iter().map(|(_, idx)| *idx).collect::<Vec<_>>());

        self.metrics.record_execution(timer.elapsed());
    }

    fn drain_partition<'a>(
        &'a self,
        pool: &'a Arc<EthFramePool>,
        window_end: u32,
        window_start: u32,
        ota_symbol_point: SlotSymbolPoint,
        out: &mut Vec<(&'a EthFramePool, u32)>,
    ) {
        let window_end_point = ota_symbol_point.advance(window_end);
        let window_start_point = ota_symbol_point.advance(window_start);
        let mut drained = Vec::new();
        pool.enqueue_pending_in_window(window_end_point, window_start_point, &mut drained);
        out.extend(drained.into_iter().map(|idx| (pool.as_ref(), idx)));
    }
}
