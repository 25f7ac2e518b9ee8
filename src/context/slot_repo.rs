//! Per-slot uplink grid context repository (SPEC_FULL §11.3, supplementing
//! component C10 step 5: "record a per-slot uplink grid context").
//!
//! Grounded on the shape of `uplink_context_repository` referenced by
//! `ofh_uplink_request_handler_impl.cpp` (the concrete header was not in the
//! retrieved pack); modeled here as the minimal record the reception path
//! needs to know an uplink slot was requested and which eAxCs to expect.

use smallvec::SmallVec;

use crate::constants::MAX_NOF_SUPPORTED_EAXC;
use crate::timing::SlotPoint;

use super::{slot_cell_index, NUM_SLOT_CELLS};

#[derive(Debug, Clone)]
pub struct UplinkSlotContext {
    pub slot: SlotPoint,
    pub eaxc: SmallVec<[u32; MAX_NOF_SUPPORTED_EAXC]>,
}

/// One entry per pool slot position; `None` until `handle_new_uplink_slot`
/// has run for that position in the current radio frame.
pub struct UplinkSlotRepository {
    cells: Box<[Option<UplinkSlotContext>]>,
}

impl UplinkSlotRepository {
    pub fn new() -> Self {
        Self { cells: (0..NUM_SLOT_CELLS).map(|_| None).collect() }
    }

    pub fn add(&mut self, context: UplinkSlotContext) {
        let idx = slot_cell_index(context.slot);
        self.cells[idx] = Some(context);
    }

    pub fn get(&self, slot: SlotPoint) -> Option<&UplinkSlotContext> {
        self.cells[slot_cell_index(slot)].as_ref().filter(|ctx| ctx.slot == slot)
    }
}

impl Default for UplinkSlotRepository {
    fn default() -> Self {
        Self::new()
    }
}
