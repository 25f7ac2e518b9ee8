//! Error taxonomy for the transmit path.
//!
//! Per spec §7 these fall into two families: conditions that are logged and
//! counted but otherwise swallowed on the hot path ([`OfhWarning`]), and
//! conditions that indicate a configuration bug and must terminate the
//! process ([`FatalOfhError`]). A third, [`ConfigError`], is returned from
//! fallible constructors and never seen on the fast path at all.

use thiserror::Error;

/// Non-fatal conditions tracked by the handlers. Callers log these (or not,
/// depending on configuration) and continue; they are never propagated as a
/// hard failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OfhWarning {
    /// `frame_buffer_pool::reserve` found the free list empty.
    #[error("ethernet frame pool exhausted")]
    PoolExhausted,
    /// `FragmentCalculator::next` found the frame smaller than one PRB.
    #[error("frame too small to hold a single compressed PRB")]
    FragmentTooSmall,
}

/// Configuration-bug conditions. The pipeline reports these and aborts;
/// they must never occur given a validated [`crate::config::CellConfig`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FatalOfhError {
    #[error("unsupported compression type: {0:?}")]
    UnsupportedCompression(crate::compression::CompressionType),
    #[error("message builder output buffer too small: needed {needed}, had {available}")]
    BuilderOverrun { needed: usize, available: usize },
    #[error("invalid eAxC value {eaxc}, maximum supported is {max}")]
    InvalidEaxc { eaxc: u32, max: u32 },
}

impl FatalOfhError {
    /// Reports the error via `log::error!` and aborts the process.
    ///
    /// This mirrors `srsran_terminate`: the condition is only reachable with
    /// a broken configuration, so there is nothing sensible left to do but
    /// stop.
    pub fn report_and_abort(&self) -> ! {
        log::error!("fatal Open Fronthaul transmit-path error: {self}");
        panic!("fatal Open Fronthaul transmit-path error: {self}");
    }
}

/// Errors raised while validating a [`crate::config::CellConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("du_nof_prbs ({du}) must not exceed ru_nof_prbs ({ru})")]
    DuExceedsRuBandwidth { du: usize, ru: usize },
    #[error("ru_nof_prbs {0} exceeds MAX_NOF_PRBS {1}")]
    CarrierTooWide(usize, usize),
    #[error("data_width {0} is out of range 1..=16")]
    InvalidDataWidth(u32),
    #[error("{direction} eAxC table has {count} entries, maximum is {max}")]
    TooManyEaxc {
        direction: &'static str,
        count: usize,
        max: usize,
    },
    #[error("eAxC value {0} exceeds MAX_SUPPORTED_EAXC_ID_VALUE")]
    EaxcOutOfRange(u32),
    #[error("mtu {mtu} is out of the supported range {min}..={max}")]
    InvalidMtu { mtu: usize, min: usize, max: usize },
    #[error("T1a window end symbol ({0}) must not exceed start symbol ({1})")]
    InvalidTxWindow(i32, i32),
}

/// Errors raised by message builders when a caller-supplied output buffer
/// cannot hold the message being assembled.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    #[error("output buffer too small for {what}: needed {needed}, had {available}")]
    BufferTooSmall { what: &'static str, needed: usize, available: usize },
    #[error("section carries {nof_prb} PRBs, which exceeds the {max} the builder supports")]
    TooManyPrb { nof_prb: u32, max: u32 },
}

impl BuildError {
    /// Reports the error via `log::error!` and aborts the process. A builder
    /// overrun (spec §7) indicates a misconfigured MTU/buffer size, not a
    /// transient condition, so it is handled the same way as
    /// [`FatalOfhError`].
    pub fn report_and_abort(&self) -> ! {
        log::error!("fatal Open Fronthaul message builder error: {self}");
        panic!("fatal Open Fronthaul message builder error: {self}");
    }
}
