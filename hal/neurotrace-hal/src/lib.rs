//! NeuroTrace Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs. The recorder core and the device drivers only
//! ever see these traits, so the same logic runs on the RP2040 board and
//! against mocks on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  neurotrace-core / neurotrace-drivers   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  neurotrace-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ neurotrace-   │
//!             │  hal-rp2040   │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`spi::SpiBus`] - 16-bit command frames
//! - [`pwm::PwmChannel`] - 8-bit duty PWM output
//! - [`watchdog::Watchdog`] - Supervision timer and reset cause
//! - [`persist::PersistentFlag`] - A boolean that survives a reset
//! - [`capacitive::CapacitiveChannel`] - Raw capacitive pad acquisition

#![no_std]
#![deny(unsafe_code)]

pub mod capacitive;
#[cfg(feature = "embedded-hal")]
pub mod compat;
pub mod gpio;
pub mod persist;
pub mod pwm;
pub mod spi;
pub mod watchdog;

// Re-export key traits at crate root for convenience
pub use capacitive::CapacitiveChannel;
pub use gpio::{InputPin, OutputPin};
pub use persist::{PersistKey, PersistentFlag};
pub use pwm::PwmChannel;
pub use spi::SpiBus;
pub use watchdog::{ResetCause, Watchdog};
