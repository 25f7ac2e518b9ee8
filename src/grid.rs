//! Minimal surface for the external collaborators the handlers read from
//! (spec §4.9/§4.10: "`grid` a shared reference-counted resource grid").
//! Producing or decoding the actual resource grid is out of scope (spec
//! §1 Non-goals); these traits only pin down what a handler needs to read.

use num_complex::Complex32;

/// Read access to one downlink resource grid snapshot for a single slot,
/// one port per configured DL eAxC.
///
/// Grounded on the shape of `resource_grid_reader` referenced by
/// `ofh_downlink_handler_impl::handle_dl_data` (the concrete interface was
/// not in the retrieved pack); only the read the transmit path needs is
/// modeled here.
pub trait DownlinkResourceGrid {
    /// The IQ samples of `port` at `symbol`, covering exactly
    /// `du_nof_prbs * 12` subcarriers. Returns an empty slice for a port/
    /// symbol the grid has nothing scheduled for.
    fn read_port_symbol(&self, port: usize, symbol: u32) -> &[Complex32];
}

/// One eAxC's PRB allocation for an uplink slot, as decided by the upper-PHY
/// scheduler.
#[derive(Debug, Clone, Copy)]
pub struct UplinkPrbAllocation {
    pub start_prb: u16,
    pub nof_prb: u32,
}

/// Read access to the scheduler's uplink grant for a single slot (spec
/// §4.10.1: "For each configured UL eAxC: build C-Plane type-1 ...").
pub trait UplinkSlotGrid {
    fn allocation(&self, eaxc: u32) -> Option<UplinkPrbAllocation>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGrant(UplinkPrbAllocation);
    impl UplinkSlotGrid for FixedGrant {
        fn allocation(&self, _eaxc: u32) -> Option<UplinkPrbAllocation> {
            Some(self.0)
        }
    }

    #[test]
    fn uplink_slot_grid_trait_object_is_usable() {
        let grant = FixedGrant(UplinkPrbAllocation { start_prb: 0, nof_prb: 51 });
        let grid: &dyn UplinkSlotGrid = &grant;
        assert_eq!(grid.allocation(0).unwrap().nof_prb, 51);
    }
}
