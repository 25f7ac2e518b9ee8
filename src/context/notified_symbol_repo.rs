//! "Notified symbol" repository (SPEC_FULL §11.3, supplementing component
//! C10 step 5: "a notified-symbol entry so the reception path knows which
//! symbol boundaries to report to the upper PHY").
//!
//! A per-slot bitset of which symbols the uplink-request handler has
//! scheduled a C-Plane command for, one `u16` bit field per pool slot
//! position (14 symbols fit comfortably in 16 bits).

use crate::timing::SlotPoint;

use super::{slot_cell_index, NUM_SLOT_CELLS};

struct Entry {
    slot: Option<SlotPoint>,
    symbols: u16,
}

pub struct NotifiedSymbolRepository {
    cells: Box<[Entry]>,
}

impl NotifiedSymbolRepository {
    pub fn new() -> Self {
        Self { cells: (0..NUM_SLOT_CELLS).map(|_| Entry { slot: None, symbols: 0 }).collect() }
    }

    pub fn notify(&mut self, slot: SlotPoint, symbol: u32) {
        debug_assert!(symbol < 16);
        let idx = slot_cell_index(slot);
        let entry = &mut self.cells[idx];
        if entry.slot != Some(slot) {
            entry.slot = Some(slot);
            entry.symbols = 0;
        }
        entry.symbols |= 1 << symbol;
    }

    pub fn is_notified(&self, slot: SlotPoint, symbol: u32) -> bool {
        let idx = slot_cell_index(slot);
        let entry = &self.cells[idx];
        entry.slot == Some(slot) && (entry.symbols & (1 << symbol)) != 0
    }
}

impl Default for NotifiedSymbolRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::SubcarrierSpacing;

    #[test]
    fn notify_then_query_round_trips() {
        let mut repo = NotifiedSymbolRepository::new();
        let slot = SlotPoint::new(SubcarrierSpacing::KHZ30, 0, 4);
        repo.notify(slot, 2);
        repo.notify(slot, 5);
        assert!(repo.is_notified(slot, 2));
        assert!(repo.is_notified(slot, 5));
        assert!(!repo.is_notified(slot, 3));
    }

    #[test]
    fn reusing_the_cell_for_a_new_slot_resets_the_bitset() {
        let mut repo = NotifiedSymbolRepository::new();
        let scs = SubcarrierSpacing::KHZ30;
        let slot_a = SlotPoint::new(scs, 0, 4);
        let slot_b = SlotPoint::new(scs, 0, 4 + crate::constants::POOL_NUM_SLOTS as u32);
        repo.notify(slot_a, 2);
        repo.notify(slot_b, 7);
        assert!(!repo.is_notified(slot_a, 2));
        assert!(repo.is_notified(slot_b, 7));
    }
}
