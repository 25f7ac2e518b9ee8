//! Wire-tag enums shared by the C-Plane/U-Plane/eCPRI builders (spec §4.5, §6).

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// OFH radio-application-header direction bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum DataDirection {
    Uplink = 0,
    Downlink = 1,
}

/// eCPRI message type (spec §6: only IQ data and real-time control are used).
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum EcpriMessageType {
    IqData = 0,
    RealTimeControlData = 2,
}

/// Subcarrier-spacing tag used in section type 3 (O-RAN.WG4.CUS numerology
/// table: `0..4` the standard NR numerologies, `12..15` the PRACH-only
/// fractional spacings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum SectionScs {
    Khz15 = 0,
    Khz30 = 1,
    Khz60 = 2,
    Khz120 = 3,
    Khz240 = 4,
    Khz1_25 = 12,
    Khz3_75 = 13,
    Khz5 = 14,
    Khz7_5 = 15,
}

/// PRACH/standard filter index (spec §4.10.2's small lookup table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum FilterIndex {
    Standard = 0,
    UlPrachPreamble1p25khz = 1,
    UlPrachPreamble3p75khz = 2,
    UlPrachPreamble5khz = 3,
    UlPrachPreamble7p5khz = 4,
    UlPrachPreambleShort15khz = 5,
    UlPrachPreambleShort30khz = 6,
}
