//! Device driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in neurotrace-core, written against the neurotrace-hal bus and pin
//! traits so they run unchanged on any board:
//!
//! - Programmable-gain amplifier (TI PGA112 over SPI)
//! - Capacitive touch key (baseline tracking over a raw pad channel)
//! - Three-LED status indicator
//! - Calibration scale sine played into a PWM output
//! - Accelerometer sleep control (NXP MMA7341LC)

#![no_std]
#![deny(unsafe_code)]

pub mod accelerometer;
pub mod amplifier;
pub mod indicator;
pub mod scale;
pub mod touch;
