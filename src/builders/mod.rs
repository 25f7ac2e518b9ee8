//! Open Fronthaul message builders: Ethernet/VLAN, eCPRI, C-Plane and
//! U-Plane (spec §4.5, component C5).

pub mod cplane;
pub mod ecpri;
pub mod ethernet_frame;
pub mod uplane;
pub mod wire;

pub use cplane::{CommonSectionFields, RadioApplicationHeader, SectionType1Params, SectionType3Extra, SectionType3Params};
pub use ecpri::EcpriHeaderParams;
pub use ethernet_frame::EthernetHeaderParams;
pub use uplane::{UplaneSectionParams, SECTION_HEADER_LEN as UPLANE_SECTION_HEADER_LEN};
pub use wire::{DataDirection, EcpriMessageType, FilterIndex, SectionScs};
