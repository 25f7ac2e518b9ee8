//! C-Plane uplink context repository (spec §3 "C-Plane uplink context",
//! component C8): records what C-Plane scheduling commands were sent for an
//! uplink symbol so the (out-of-scope) reception path can cross-check
//! incoming U-Plane fragments against them.

use std::cell::UnsafeCell;

use crate::builders::RadioApplicationHeader;
use crate::constants::MAX_NOF_SUPPORTED_EAXC;
use crate::timing::SlotPoint;

use super::{symbol_cell_index, NUM_SYMBOL_CELLS};

/// Immutable record of one C-Plane scheduling command, keyed by
/// `(slot, symbol, filter_index, eAxC)` (spec §3).
#[derive(Debug, Clone, Copy)]
pub struct UplinkCplaneContext {
    pub radio_header: RadioApplicationHeader,
    pub prb_start: u16,
    pub nof_prb: u32,
    pub nof_symbols: u8,
}

type Cell = [Option<(u32, UplinkCplaneContext)>; MAX_NOF_SUPPORTED_EAXC];

/// Slotted-array repository of [`UplinkCplaneContext`] entries, one cell per
/// `(slot, symbol)` holding up to `MAX_NOF_SUPPORTED_EAXC` entries (one per
/// configured eAxC).
///
/// # Safety
///
/// Per spec §5, writes to a given `(slot, symbol)` cell are serialized by
/// the handler's task dispatch (always the same producer thread for that
/// cell within a radio frame) and reads from the reception path only ever
/// target a *different* slot than the one currently being written, so the
/// `UnsafeCell` accesses below never race in practice.
pub struct UplinkCplaneContextRepository {
    cells: Box<[UnsafeCell<Cell>]>,
}

unsafe impl Sync for UplinkCplaneContextRepository {}

impl UplinkCplaneContextRepository {
    pub fn new() -> Self {
        Self { cells: (0..NUM_SYMBOL_CELLS).map(|_| UnsafeCell::new([None; MAX_NOF_SUPPORTED_EAXC])).collect() }
    }

    /// Records (or overwrites) the context for `eaxc` at `(slot, symbol)`.
    /// Silently drops the write if the cell's eAxC table is full and does
    /// not already contain `eaxc`: the caller validated `eaxc` count against
    /// `MAX_NOF_SUPPORTED_EAXC` at configuration time, so this should never
    /// actually happen.
    pub fn add(&self, slot: SlotPoint, symbol: u32, eaxc: u32, context: UplinkCplaneContext) {
        let idx = symbol_cell_index(slot, symbol);
        let cell = unsafe { &mut *self.cells[idx].get() };
        if let Some(slot_entry) = cell.iter_mut().find(|e| matches!(e, Some((existing, _)) if *existing == eaxc)) {
            *slot_entry = Some((eaxc, context));
            return;
        }
        if let Some(free_slot) = cell.iter_mut().find(|e| e.is_none()) {
            *free_slot = Some((eaxc, context));
        }
    }

    pub fn get(&self, slot: SlotPoint, symbol: u32, eaxc: u32) -> Option<UplinkCplaneContext> {
        let idx = symbol_cell_index(slot, symbol);
        let cell = unsafe { &*self.cells[idx].get() };
        cell.iter().find_map(|e| e.and_then(|(existing, ctx)| (existing == eaxc).then_some(ctx)))
    }

    /// Clears every entry at `(slot, symbol)`, making the cell available for
    /// the next radio frame's reuse of that pool position.
    pub fn clear(&self, slot: SlotPoint, symbol: u32) {
        let idx = symbol_cell_index(slot, symbol);
        let cell = unsafe { &mut *self.cells[idx].get() };
        *cell = [None; MAX_NOF_SUPPORTED_EAXC];
    }
}

impl Default for UplinkCplaneContextRepository {
    fn default() -> Self {
        Self::new()
    }
}
