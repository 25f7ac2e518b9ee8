//! Wire and sizing constants shared across the transmit path.

/// Subcarriers per physical resource block.
pub const NOF_SUBCARRIERS_PER_RB: usize = 12;

/// Maximum number of PRBs a carrier can span (O-RAN.WG4.CUS largest BW / smallest SCS).
pub const MAX_NOF_PRBS: usize = 273;

/// Maximum number of eAxCs a sector can configure per direction.
pub const MAX_NOF_SUPPORTED_EAXC: usize = 8;

/// Upper bound (exclusive) on eAxC identifiers accepted by the sequence-id generator
/// and the context repositories.
pub const MAX_SUPPORTED_EAXC_ID_VALUE: u32 = 128;

/// Maximum bit width of an IQ sample understood by the quantizer / bit-packer.
pub const MAX_IQ_WIDTH: u32 = 16;

/// OFDM symbols per slot, normal cyclic prefix.
pub const NOF_OFDM_SYM_PER_SLOT_NORMAL_CP: usize = 14;

/// Number of slots the Ethernet frame pool keeps alive at once (a little more than one
/// radio frame at the widest supported numerology).
pub const POOL_NUM_SLOTS: usize = 20;

/// Upper bound on the number of frame buffers handed to the transmitter in a single OTA tick.
pub const MAX_TX_BURST_SIZE: usize = 512;

/// Minimum Ethernet frame payload length (802.3 padding floor).
pub const MIN_ETH_FRAME_LENGTH: usize = 46;

/// Largest frame buffer capacity the pool will allocate.
pub const MAX_ETH_FRAME_LENGTH: usize = 9600;

/// EtherType assigned to O-RAN eCPRI traffic.
pub const ECPRI_ETHER_TYPE: u16 = 0xAEFE;

/// Length of a plain (no VLAN tag) Ethernet header: dst MAC + src MAC + EtherType.
pub const ETH_HEADER_LEN: usize = 14;

/// Length of the 802.1Q VLAN tag (TPID + TCI).
pub const VLAN_TAG_LEN: usize = 4;

/// Length of an eCPRI common header.
pub const ECPRI_HEADER_LEN: usize = 8;

/// `E`=1 (no fragmentation), subsequence=0 low byte of the eCPRI sequence-id field.
pub const ECPRI_SEQID_LOW_BYTE: u8 = 0x80;
