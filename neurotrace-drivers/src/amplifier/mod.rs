//! Amplifier driver implementations

pub mod pga112;

pub use pga112::{Pga112, Pga112Error};
