//! Configuration types
//!
//! Board-agnostic configuration structures. Defaults carry the recorder's
//! production timing and thresholds; boards may override them at build
//! time, never at runtime.

pub mod error;
pub mod types;

pub use error::ConfigError;
pub use types::*;
