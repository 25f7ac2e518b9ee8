//! Downlink and uplink-request handlers (spec §4.9, §4.10, components C9/C10).

pub mod downlink;
pub mod uplink;

pub use downlink::{DlDataContext, DownlinkHandler};
pub use uplink::{PrachOccasionContext, PreambleFormat, UlSlotContext, UplinkRequestHandler};

use crate::builders::{DataDirection, FilterIndex, RadioApplicationHeader};
use crate::timing::SlotPoint;

/// Builds the shared 4-byte radio application header for `slot`/`start_symbol`
/// (spec §4.9 step 3, §4.10.1 step 3): `frame_id` truncates the SFN to its
/// low 8 bits and `slot_id` is reduced to the slot's position within its 1 ms
/// subframe, matching [`crate::builders::cplane::RadioApplicationHeader`]'s
/// field widths.
pub(super) fn radio_header_for_slot(
    slot: SlotPoint,
    direction: DataDirection,
    filter_index: FilterIndex,
    start_symbol_id: u8,
) -> RadioApplicationHeader {
    let slots_per_subframe = slot.scs().nof_slots_per_subframe();
    let subframe_id = (slot.slot_index() / slots_per_subframe) as u8;
    let slot_id = (slot.slot_index() % slots_per_subframe) as u8;
    RadioApplicationHeader {
        direction,
        filter_index,
        frame_id: slot.sfn() as u8,
        subframe_id,
        slot_id,
        start_symbol_id,
    }
}
