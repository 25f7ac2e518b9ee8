//! O-RAN 7.2-2 Open Fronthaul transmit-path core for a split gNB-DU (spec §1
//! OVERVIEW).
//!
//! Turns a scheduled downlink resource grid, an uplink grant or a PRACH
//! occasion into O-RAN Control-Plane/User-Plane Ethernet frames and drains
//! them onto the wire in their transmission window, with no allocation on
//! the per-slot/per-symbol hot path once a [`pipeline::TransmitPipeline`] is
//! constructed.
//!
//! # Layout
//!
//! - [`compression`] (C1/C2/C3): Q15 quantization, bit packing and Block
//!   Floating Point IQ compression.
//! - [`fragmentation`] (C4): splits a symbol's PRBs across frames that fit
//!   the configured MTU.
//! - [`builders`] (C5): Ethernet/VLAN, eCPRI, C-Plane and U-Plane message
//!   assembly.
//! - [`sequence`] (C6): per-eAxC sequence-identifier counters.
//! - [`ethernet`] (C7): the lock-free Ethernet frame buffer pool.
//! - [`context`] (C8): slotted-array repositories the (out-of-scope)
//!   reception path reads from.
//! - [`handlers`] (C9/C10): the downlink and uplink-request handlers.
//! - [`transmitter`] (C11): drains the frame pools once per OTA symbol tick.
//! - [`pipeline`] (C12): wires C1-C11 together into one sector's transmit
//!   path.
//! - [`timing`]: slot/symbol timepoints, transmission-window timing, TDD
//!   active-symbol-range derivation.
//! - [`config`], [`error`], [`metrics`], [`notifier`], [`gateway`], [`grid`]:
//!   the ambient configuration, error taxonomy, metrics, and external
//!   collaborator traits (SPEC_FULL §10).

pub mod builders;
pub mod compression;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod ethernet;
pub mod fragmentation;
pub mod gateway;
pub mod grid;
pub mod handlers;
pub mod metrics;
pub mod notifier;
pub mod pipeline;
pub mod sequence;
pub mod timing;
pub mod transmitter;

pub use config::{CellConfig, CellFeatures};
pub use error::{BuildError, ConfigError, FatalOfhError, OfhWarning};
pub use gateway::{EthernetGateway, NullEthernetGateway};
pub use handlers::{DlDataContext, DownlinkHandler, PrachOccasionContext, PreambleFormat, UlSlotContext, UplinkRequestHandler};
pub use notifier::{ErrorContext, ErrorNotifier, NullErrorNotifier};
pub use pipeline::TransmitPipeline;
pub use transmitter::MessageTransmitter;
