//! Internal oscillator self-calibration
//!
//! Runs once at boot, blocking, before the watchdog and the sample clock
//! are started.

pub mod search;

pub use search::{CalibrationOutcome, OscillatorCalibrator, SearchPhase, TrimRange};
