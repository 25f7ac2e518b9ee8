//! Slotted-array context repositories written by the transmit path for the
//! (out-of-scope) reception path to read (spec §3 "C-Plane uplink context",
//! "Uplink symbol context"; SPEC_FULL §11.2-§11.4 supplemented repositories).
//!
//! All of these are fixed-size arrays indexed by `(slot_index, symbol) mod
//! (POOL_NUM_SLOTS * nsymb_per_slot)`, matching the frame pool's own
//! addressing scheme (spec §5: "a slotted array"). None of them allocate
//! after construction.

mod cplane_repo;
mod notified_symbol_repo;
mod prach_repo;
mod slot_repo;

pub use cplane_repo::{UplinkCplaneContext, UplinkCplaneContextRepository};
pub use notified_symbol_repo::NotifiedSymbolRepository;
pub use prach_repo::{PrachContext, PrachContextRepository};
pub use slot_repo::{UplinkSlotContext, UplinkSlotRepository};

use crate::constants::{NOF_OFDM_SYM_PER_SLOT_NORMAL_CP, POOL_NUM_SLOTS};
use crate::timing::SlotPoint;

pub(super) const NUM_SLOT_CELLS: usize = POOL_NUM_SLOTS;
pub(super) const NUM_SYMBOL_CELLS: usize = POOL_NUM_SLOTS * NOF_OFDM_SYM_PER_SLOT_NORMAL_CP;

pub(super) fn slot_cell_index(slot: SlotPoint) -> usize {
    slot.slot_index() as usize % NUM_SLOT_CELLS
}

pub(super) fn symbol_cell_index(slot: SlotPoint, symbol: u32) -> usize {
    (slot.slot_index() as usize * NOF_OFDM_SYM_PER_SLOT_NORMAL_CP + symbol as usize) % NUM_SYMBOL_CELLS
}
