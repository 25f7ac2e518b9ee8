//! Slot/symbol timepoints, transmission-window timing and TDD symbol-range
//! derivation (spec §3, §4.8, component C12).

pub mod slot;
pub mod tdd;
pub mod window;

pub use slot::{CyclicPrefix, SlotPoint, SlotSymbolPoint, SubcarrierSpacing};
pub use tdd::{OfdmSymbolRange, TddUlDlPattern};
pub use window::{calculate_nof_symbols_before_ota, TxWindowChecker, TxWindowTimingParameters};
