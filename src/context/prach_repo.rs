//! PRACH context repository (spec §4.10.2: "Always record the PRACH buffer
//! context in a local PRACH repository for the reception path").

use crate::builders::{FilterIndex, SectionScs};
use crate::constants::MAX_NOF_SUPPORTED_EAXC;
use crate::timing::SlotPoint;

use super::{symbol_cell_index, NUM_SYMBOL_CELLS};

/// The derived PRACH parameters recorded alongside the occasion, for the
/// reception path to locate the corresponding uplink PRACH buffer.
#[derive(Debug, Clone, Copy)]
pub struct PrachContext {
    pub start_symbol_id: u8,
    pub scs: SectionScs,
    pub filter_index: FilterIndex,
    pub nof_prb: u32,
    pub num_symbol: u8,
}

type Cell = [Option<(u32, PrachContext)>; MAX_NOF_SUPPORTED_EAXC];

pub struct PrachContextRepository {
    cells: Box<[Cell]>,
}

impl PrachContextRepository {
    pub fn new() -> Self {
        Self { cells: (0..NUM_SYMBOL_CELLS).map(|_| [None; MAX_NOF_SUPPORTED_EAXC]).collect() }
    }

    pub fn add(&mut self, slot: SlotPoint, symbol: u32, eaxc: u32, context: PrachContext) {
        let idx = symbol_cell_index(slot, symbol);
        let cell = &mut self.cells[idx];
        if let Some(slot_entry) = cell.iter_mut().find(|e| matches!(e, Some((existing, _)) if *existing == eaxc)) {
            *slot_entry = Some((eaxc, context));
            return;
        }
        if let Some(free_slot) = cell.iter_mut().find(|e| e.is_none()) {
            *free_slot = Some((eaxc, context));
        }
    }

    pub fn get(&self, slot: SlotPoint, symbol: u32, eaxc: u32) -> Option<PrachContext> {
        let idx = symbol_cell_index(slot, symbol);
        self.cells[idx].iter().find_map(|e| e.and_then(|(existing, ctx)| (existing == eaxc).then_some(ctx)))
    }
}

impl Default for PrachContextRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::SubcarrierSpacing;

    #[test]
    fn add_then_get_round_trips() {
        let mut repo = PrachContextRepository::new();
        let slot = SlotPoint::new(SubcarrierSpacing::KHZ30, 0, 1);
        let ctx = PrachContext {
            start_symbol_id: 0,
            scs: SectionScs::Khz1_25,
            filter_index: FilterIndex::UlPrachPreamble1p25khz,
            nof_prb: 144,
            num_symbol: 1,
        };
        repo.add(slot, 0, 2, ctx);
        let got = repo.get(slot, 0, 2).unwrap();
        assert_eq!(got.nof_prb, 144);
    }
}
