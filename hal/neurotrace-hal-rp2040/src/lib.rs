//! RP2040-specific HAL for the recorder firmware
//!
//! This crate provides RP2040 implementations of the `neurotrace-hal`
//! traits and the board-level traits of `neurotrace-core`:
//!
//! - GPIO and SPI through the embedded-hal adapters of `neurotrace-hal`
//! - Watchdog with reset cause and scratch-register flag storage
//! - Ring-oscillator trim measured against the crystal
//! - Blocking ADC sample source feeding the shared sample channel
//! - Capacitive pad acquisition on a plain GPIO
//! - PWM output for the calibration scale sine

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod pwm;
pub mod rosc;
pub mod spi;
pub mod touch;
pub mod watchdog;

pub use adc::AdcSampler;
pub use pwm::RpPwm;
pub use rosc::RingOscillator;
pub use touch::RcPad;
pub use watchdog::RpWatchdog;
