//! Transmission-window timing and the lateness checker (spec §4.8, §4.11,
//! component C12).
//!
//! Grounded on `srsran::ofh::tx_window_checker`
//! (`examples/original_source/lib/ofh/transmitter/ofh_tx_window_checker.h`)
//! and `calculate_nof_symbols_before_ota`/`get_biggest_min_tx_parameter`
//! (`examples/original_source/lib/ofh/transmitter/helpers.h`).

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use super::slot::{CyclicPrefix, SlotPoint, SlotSymbolPoint, SubcarrierSpacing};
use crate::error::ConfigError;

/// T1a transmission-window offsets, in OFDM symbols, from the current OTA
/// symbol (spec §4.11). `*_start` is the earliest symbol a message may be
/// sent (largest offset); `*_end` is the latest (smallest offset), so
/// `*_end <= *_start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxWindowTimingParameters {
    pub sym_cp_dl_start: u32,
    pub sym_cp_dl_end: u32,
    pub sym_cp_ul_start: u32,
    pub sym_cp_ul_end: u32,
    pub sym_up_dl_start: u32,
    pub sym_up_dl_end: u32,
}

impl TxWindowTimingParameters {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pairs = [
            (self.sym_cp_dl_end, self.sym_cp_dl_start),
            (self.sym_cp_ul_end, self.sym_cp_ul_start),
            (self.sym_up_dl_end, self.sym_up_dl_start),
        ];
        for (end, start) in pairs {
            if end > start {
                return Err(ConfigError::InvalidTxWindow(end as i32, start as i32));
            }
        }
        Ok(())
    }

    /// Returns a copy with only the uplink C-Plane window populated, the rest
    /// zeroed (`extract_ul_cp_timing` in `ofh_uplink_request_handler_impl.cpp`
    /// — the uplink-request handler's own window checker only cares about
    /// the UL C-Plane transmit window).
    pub fn ul_cplane_only(&self) -> Self {
        Self {
            sym_cp_dl_start: 0,
            sym_cp_dl_end: 0,
            sym_cp_ul_start: self.sym_cp_ul_start,
            sym_cp_ul_end: self.sym_cp_ul_end,
            sym_up_dl_start: 0,
            sym_up_dl_end: 0,
        }
    }

    /// Returns a copy with the UL C-Plane window zeroed, the mirror of
    /// [`Self::ul_cplane_only`] for the downlink handler's own window
    /// checker, which only cares about the DL C-Plane and DL U-Plane windows
    /// (`extract_dl_timing` in `ofh_downlink_handler_impl.cpp`).
    pub fn dl_only(&self) -> Self {
        Self {
            sym_cp_dl_start: self.sym_cp_dl_start,
            sym_cp_dl_end: self.sym_cp_dl_end,
            sym_cp_ul_start: 0,
            sym_cp_ul_end: 0,
            sym_up_dl_start: self.sym_up_dl_start,
            sym_up_dl_end: self.sym_up_dl_end,
        }
    }

    /// Largest of the three `*_end` offsets (`get_biggest_min_tx_parameter`).
    fn biggest_min_tx_parameter(&self) -> u32 {
        self.sym_cp_dl_end.max(self.sym_cp_ul_end).max(self.sym_up_dl_end)
    }
}

/// Duration of one OFDM symbol in nanoseconds, at the given numerology/CP.
fn symbol_duration_ns(cp: CyclicPrefix, scs: SubcarrierSpacing) -> f64 {
    1.0e6 / f64::from(cp.nsymb_per_slot() * scs.nof_slots_per_subframe())
}

/// Duration of OFH processing plus the transmission window, in OFDM symbols
/// (`calculate_nof_symbols_before_ota`).
pub fn calculate_nof_symbols_before_ota(
    cp: CyclicPrefix,
    scs: SubcarrierSpacing,
    processing_time: Duration,
    tx_timing_params: &TxWindowTimingParameters,
) -> u32 {
    let symbol_ns = symbol_duration_ns(cp, scs);
    let processing_symbols = (processing_time.as_nanos() as f64 / symbol_ns).floor() as u32;
    processing_symbols + tx_timing_params.biggest_min_tx_parameter()
}

/// Open Fronthaul transmission-window checker (component C12).
///
/// `current_ota_symbol` is written by exactly one thread (the OTA symbol
/// tick) via [`Self::on_new_symbol`] and read by any number of producer
/// threads via [`Self::is_late`].
pub struct TxWindowChecker {
    sector_id: usize,
    advance_time_in_symbols: u32,
    nsymb_per_slot: u32,
    current_ota_symbol: AtomicU32,
}

impl TxWindowChecker {
    pub fn new(sector_id: usize, advance_time_in_symbols: u32, nsymb_per_slot: u32) -> Self {
        Self { sector_id, advance_time_in_symbols, nsymb_per_slot, current_ota_symbol: AtomicU32::new(0) }
    }

    /// Records the latest OTA symbol boundary. Single-writer.
    pub fn on_new_symbol(&self, symbol_point: SlotSymbolPoint) {
        self.current_ota_symbol.store(symbol_point.to_uint(), Ordering::Relaxed);
    }

    /// Returns true if `slot` is at or past the OFH processing deadline given
    /// the current OTA time (spec §8 "Lateness"): the boundary slot itself
    /// returns true.
    pub fn is_late(&self, slot: SlotPoint) -> bool {
        let raw = self.current_ota_symbol.load(Ordering::Relaxed);
        let ota_symbol_point = SlotSymbolPoint::from_uint(raw, slot.scs(), self.nsymb_per_slot);

        // Symbol 0 of the slot is the worst case for the resource grid.
        let rg_point = SlotSymbolPoint::new(slot, 0, self.nsymb_per_slot).retreat(self.advance_time_in_symbols);

        let late = ota_symbol_point >= rg_point;
        if late {
            log::debug!(
                "sector#{}: a late upper-PHY request arrived to OFH for slot '{slot:?}' with current ota='{ota_symbol_point:?}', OFH processing time requires a minimum of {} symbols",
                self.sector_id,
                self.advance_time_in_symbols
            );
        }
        late
    }
}
