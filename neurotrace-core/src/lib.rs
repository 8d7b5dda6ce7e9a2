//! Board-agnostic control core for the bio-signal recorder
//!
//! This crate contains all recorder logic that does not depend on a
//! specific board:
//!
//! - Interrupt-to-loop handoff (sample ring, event flags)
//! - Internal oscillator self-calibration
//! - Adaptive gain control over a four-stage amplifier ladder
//! - Touch gesture debouncing
//! - Mode state machine and the loop that drives it
//! - Fault latching and overrun accounting
//! - Configuration type definitions
//! - Device traits the board layer implements

#![no_std]
#![deny(unsafe_code)]

pub mod calibration;
pub mod channel;
pub mod config;
pub mod gain;
pub mod recorder;
pub mod safety;
pub mod state;
pub mod touch;
pub mod traits;
