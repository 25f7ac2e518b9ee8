//! Per-sector transmit-path configuration (SPEC_FULL §10.1).
//!
//! Grounded on the teacher's construction-time-validated config-by-struct
//! style (`hermit-kernel`'s env-derived `RuntimeParams`) and, for the
//! feature-toggle bitset, `hermit-kernel`'s `syscalls::mmap::MemoryProtection`
//! `bitflags!` usage. Validation happens once, here, never on the fast path.

use std::time::Duration;

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::compression::CompressionParams;
use crate::constants::{MAX_NOF_PRBS, MAX_NOF_SUPPORTED_EAXC, MAX_SUPPORTED_EAXC_ID_VALUE};
use crate::error::ConfigError;
use crate::timing::{CyclicPrefix, SubcarrierSpacing, TddUlDlPattern, TxWindowTimingParameters};

bitflags! {
    /// Feature toggles (SPEC_FULL §10.1/§11.5).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFeatures: u8 {
        /// Emit section-type-3 C-Plane messages for PRACH occasions.
        const PRACH_CPLANE_ENABLED = 1 << 0;
        /// Maintain the per-handler metrics collectors (SPEC_FULL §10.5).
        const METRICS_ENABLED = 1 << 1;
        /// Log a warning for each late grant, in addition to counting it and
        /// invoking the error notifier (`enable_log_warnings_for_lates`).
        const LATE_WARNING_LOGGING_ENABLED = 1 << 2;
    }
}

type EaxcTable = SmallVec<[u32; MAX_NOF_SUPPORTED_EAXC]>;

/// Full configuration for one sector's transmit path.
#[derive(Debug, Clone)]
pub struct CellConfig {
    pub sector_id: usize,
    pub scs: SubcarrierSpacing,
    pub cp: CyclicPrefix,

    pub du_nof_prbs: usize,
    pub ru_nof_prbs: usize,

    pub dl_eaxc: EaxcTable,
    pub ul_eaxc: EaxcTable,
    pub prach_eaxc: EaxcTable,

    pub cplane_compression: CompressionParams,
    pub uplane_compression: CompressionParams,
    pub iq_scaling: f32,

    pub mtu: usize,
    pub vlan_tci: Option<u16>,
    pub dst_mac: [u8; 6],
    pub src_mac: [u8; 6],

    pub tx_timing: TxWindowTimingParameters,
    pub dl_processing_time: Duration,
    pub ul_processing_time: Duration,

    pub tdd_pattern: Option<TddUlDlPattern>,

    pub features: CellFeatures,
}

const MIN_MTU: usize = 64;
const MAX_MTU: usize = crate::constants::MAX_ETH_FRAME_LENGTH;

impl CellConfig {
    /// Validates every invariant the rest of the pipeline relies on
    /// (spec §5 "real-time safety": nothing below should ever be checked
    /// again after construction).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.du_nof_prbs > self.ru_nof_prbs {
            return Err(ConfigError::DuExceedsRuBandwidth { du: self.du_nof_prbs, ru: self.ru_nof_prbs });
        }
        if self.ru_nof_prbs > MAX_NOF_PRBS {
            return Err(ConfigError::CarrierTooWide(self.ru_nof_prbs, MAX_NOF_PRBS));
        }
        for params in [self.cplane_compression, self.uplane_compression] {
            if params.data_width == 0 || params.data_width > 16 {
                return Err(ConfigError::InvalidDataWidth(params.data_width));
            }
        }
        for (direction, table) in [("dl", &self.dl_eaxc), ("ul", &self.ul_eaxc), ("prach", &self.prach_eaxc)] {
            if table.len() > MAX_NOF_SUPPORTED_EAXC {
                return Err(ConfigError::TooManyEaxc { direction, count: table.len(), max: MAX_NOF_SUPPORTED_EAXC });
            }
            for &eaxc in table {
                if eaxc >= MAX_SUPPORTED_EAXC_ID_VALUE {
                    return Err(ConfigError::EaxcOutOfRange(eaxc));
                }
            }
        }
        if !(MIN_MTU..=MAX_MTU).contains(&self.mtu) {
            return Err(ConfigError::InvalidMtu { mtu: self.mtu, min: MIN_MTU, max: MAX_MTU });
        }
        self.tx_timing.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::CompressionType;

    fn base_config() -> CellConfig {
        CellConfig {
            sector_id: 0,
            scs: SubcarrierSpacing::KHZ30,
            cp: CyclicPrefix::Normal,
            du_nof_prbs: 51,
            ru_nof_prbs: 51,
            dl_eaxc: SmallVec::from_slice(&[0]),
            ul_eaxc: SmallVec::from_slice(&[0]),
            prach_eaxc: SmallVec::new(),
            cplane_compression: CompressionParams::new(CompressionType::None, 16),
            uplane_compression: CompressionParams::new(CompressionType::Bfp, 9),
            iq_scaling: 1.0,
            mtu: 1500,
            vlan_tci: None,
            dst_mac: [1; 6],
            src_mac: [2; 6],
            tx_timing: TxWindowTimingParameters {
                sym_cp_dl_start: 13,
                sym_cp_dl_end: 13,
                sym_cp_ul_start: 0,
                sym_cp_ul_end: 0,
                sym_up_dl_start: 0,
                sym_up_dl_end: 0,
            },
            dl_processing_time: Duration::from_micros(400),
            ul_processing_time: Duration::from_micros(400),
            tdd_pattern: None,
            features: CellFeatures::METRICS_ENABLED | CellFeatures::LATE_WARNING_LOGGING_ENABLED,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn du_wider_than_ru_is_rejected() {
        let mut cfg = base_config();
        cfg.du_nof_prbs = 100;
        cfg.ru_nof_prbs = 51;
        assert!(matches!(cfg.validate(), Err(ConfigError::DuExceedsRuBandwidth { .. })));
    }

    #[test]
    fn too_many_eaxc_is_rejected() {
        let mut cfg = base_config();
        cfg.dl_eaxc = (0..9).collect();
        assert!(matches!(cfg.validate(), Err(ConfigError::TooManyEaxc { .. })));
    }

    #[test]
    fn out_of_range_mtu_is_rejected() {
        let mut cfg = base_config();
        cfg.mtu = 20;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidMtu { .. })));
    }
}
