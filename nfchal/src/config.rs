// nfchal/src/config.rs
//! Bring-up and arbitration tunables.

use crate::chip::registers::field_threshold;

/// Settings consumed by controller bring-up and the exclusive-access lock.
///
/// `Default` holds the values used on production hardware.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HalConfig {
    /// How long `acquire` waits for the controller mutex before reporting busy.
    pub acquire_timeout_ms: u32,
    /// Bound for the oscillator-ready interrupt during bring-up.
    pub osc_timeout_ms: u32,
    /// Bound for the supply measurement interrupt during bring-up.
    pub vdd_measure_timeout_ms: u32,
    /// Supply voltages below this use 3 V I/O levels.
    pub io_3v_threshold_mv: u16,
    /// Antenna tuning capacitor settings (AAT-A, AAT-B).
    pub antenna_tune: (u8, u8),
    /// External field detector activation threshold (trg | rfe).
    pub field_activation_threshold: u8,
    /// External field detector deactivation threshold (trg | rfe).
    pub field_deactivation_threshold: u8,
    /// Run regulator self-calibration when the chip is in automatic mode.
    pub regulator_calibration: bool,
}

impl Default for HalConfig {
    fn default() -> Self {
        Self {
            acquire_timeout_ms: 100,
            osc_timeout_ms: 10,
            vdd_measure_timeout_ms: 100,
            io_3v_threshold_mv: 3600,
            antenna_tune: (0x82, 0x82),
            field_activation_threshold: field_threshold::TRG_105MV | field_threshold::RFE_105MV,
            field_deactivation_threshold: field_threshold::TRG_75MV | field_threshold::RFE_75MV,
            regulator_calibration: true,
        }
    }
}

impl HalConfig {
    pub fn with_acquire_timeout_ms(mut self, ms: u32) -> Self {
        self.acquire_timeout_ms = ms;
        self
    }

    pub fn with_antenna_tune(mut self, a: u8, b: u8) -> Self {
        self.antenna_tune = (a, b);
        self
    }

    pub fn with_regulator_calibration(mut self, enabled: bool) -> Self {
        self.regulator_calibration = enabled;
        self
    }
}
