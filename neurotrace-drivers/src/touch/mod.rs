//! Touch sensor implementations

pub mod key;

pub use key::{CapacitiveKey, Hysteresis, KeyConfig};
