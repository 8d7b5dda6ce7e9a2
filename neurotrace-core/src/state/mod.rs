//! Recorder mode state machine
//!
//! The mode transition table is explicit, finite and deterministic; the
//! side effects of entering and leaving a mode live in the recorder.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{FaultKind, Mode, SleepMode};
