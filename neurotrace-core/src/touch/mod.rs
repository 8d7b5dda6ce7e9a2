//! Touch gesture recognition
//!
//! Turns the periodic raw touch measurement into press, hold and release
//! events with mode-specific timing.

pub mod debounce;

pub use debounce::{HoldWindow, TouchDebouncer, TouchEvent, TouchPhase};
