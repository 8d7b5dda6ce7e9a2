//! Safety monitoring
//!
//! Latches faults and keeps count of conditions that degrade a recording
//! without stopping it.

pub mod monitor;

pub use monitor::{SafetyMonitor, SafetyStatus};
