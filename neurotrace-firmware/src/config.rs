//! Compile-time recorder configuration
//!
//! Everything runs on the defaults except the oscillator calibration,
//! which measures the ring oscillator against the 12 MHz crystal.

use neurotrace_core::config::{CalibrationConfig, RecorderConfig};

/// Ring oscillator target frequency
pub const ROSC_TARGET_HZ: u32 = 8_000_000;

/// Crystal frequency (the calibration reference)
pub const XOSC_HZ: u32 = 12_000_000;

/// Busy-wait after each trim change
pub const ROSC_SETTLE_CYCLES: u32 = 1_000;

pub fn recorder_config() -> RecorderConfig {
    RecorderConfig {
        calibration: CalibrationConfig {
            target_hz: ROSC_TARGET_HZ,
            reference_hz: XOSC_HZ,
            // 1 ms of crystal per measurement
            reference_ticks: 12_000,
            loop_cycles: 1,
            ..CalibrationConfig::default()
        },
        ..RecorderConfig::default()
    }
}
