//! Device traits
//!
//! These traits define the interface between the recorder logic and the
//! board. Chip-level primitives (watchdog, persisted flag, GPIO, SPI) live
//! in `neurotrace-hal`; the traits here describe recorder devices.

pub mod amplifier;
pub mod board;
pub mod motion;
pub mod oscillator;
pub mod sampler;
pub mod scale;
pub mod touch;

pub use amplifier::{Amplifier, Gain, InputChannel};
pub use board::{Board, Indication};
pub use motion::Accelerometer;
pub use oscillator::Oscillator;
pub use sampler::SampleSource;
pub use scale::ScaleSignal;
pub use touch::TouchSensor;
