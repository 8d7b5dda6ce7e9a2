//! SPI bus setup
//!
//! The amplifier bus runs in blocking mode: every transfer is two bytes
//! and the loop waits for it anyway.

use embassy_rp::spi::{self, Blocking, Spi};
use neurotrace_hal::compat;
use neurotrace_hal::spi::SpiConfig;

/// SPI bus as seen by drivers
pub type RpSpi<'d, T> = compat::Spi<Spi<'d, T, Blocking>>;

/// Translate a bus configuration into the embassy-rp one
pub fn config(config: &SpiConfig) -> spi::Config {
    let config = config.limited();
    let mut out = spi::Config::default();
    out.frequency = config.frequency_hz;
    out.polarity = if config.mode.idles_high() {
        spi::Polarity::IdleHigh
    } else {
        spi::Polarity::IdleLow
    };
    out.phase = if config.mode.samples_on_second_edge() {
        spi::Phase::CaptureOnSecondTransition
    } else {
        spi::Phase::CaptureOnFirstTransition
    };
    out
}

/// Wrap a blocking embassy-rp bus
pub fn bus<'d, T: spi::Instance>(spi: Spi<'d, T, Blocking>) -> RpSpi<'d, T> {
    compat::Spi::new(spi)
}
