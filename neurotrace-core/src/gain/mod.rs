//! Adaptive gain control
//!
//! Keeps the bio-signal's peak-to-peak amplitude inside a per-stage band
//! by stepping along a four-stage amplifier gain ladder.

pub mod controller;

pub use controller::{GainController, GainPhase};

/// Number of stages on the gain ladder
pub const STAGE_COUNT: usize = 4;

/// Highest stage index (most amplification)
pub const MAX_STAGE: u8 = (STAGE_COUNT - 1) as u8;
