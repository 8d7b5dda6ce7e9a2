//! SPI bus abstractions
//!
//! The programmable-gain amplifier is the only SPI device on the recorder.
//! Every transfer is one 16-bit frame: a command byte followed by a data
//! byte, MSB first, in SPI mode 0 or 3.

/// One command frame: `[command, data]`
pub type Frame = [u8; 2];

/// Fastest clock the amplifier accepts
pub const MAX_CLOCK_HZ: u32 = 10_000_000;

/// Frame-oriented SPI bus master
///
/// Chip select is not part of the bus; drivers frame each transfer with
/// their own select pin.
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Clock out one frame, discarding what comes back
    fn write_frame(&mut self, frame: Frame) -> Result<(), Self::Error>;

    /// Clock out one frame and return the frame shifted in meanwhile
    fn exchange_frame(&mut self, frame: Frame) -> Result<Frame, Self::Error>;
}

/// Clock modes the amplifier supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    /// Clock idles low, data sampled on the rising edge
    Mode0,
    /// Clock idles high, data sampled on the rising edge
    Mode3,
}

impl SpiMode {
    /// CPOL
    pub const fn idles_high(self) -> bool {
        matches!(self, SpiMode::Mode3)
    }

    /// CPHA
    pub const fn samples_on_second_edge(self) -> bool {
        matches!(self, SpiMode::Mode3)
    }
}

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency_hz: u32,
    pub mode: SpiMode,
}

impl SpiConfig {
    /// Same settings with the clock held to what the amplifier accepts
    pub fn limited(self) -> Self {
        Self {
            frequency_hz: self.frequency_hz.min(MAX_CLOCK_HZ),
            ..self
        }
    }
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 1_000_000,
            mode: SpiMode::Mode0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_bits() {
        assert!(!SpiMode::Mode0.idles_high());
        assert!(!SpiMode::Mode0.samples_on_second_edge());
        assert!(SpiMode::Mode3.idles_high());
        assert!(SpiMode::Mode3.samples_on_second_edge());
    }

    #[test]
    fn test_limited_clock() {
        let fast = SpiConfig {
            frequency_hz: 24_000_000,
            mode: SpiMode::Mode3,
        };
        assert_eq!(fast.limited().frequency_hz, MAX_CLOCK_HZ);
        assert_eq!(fast.limited().mode, SpiMode::Mode3);
        assert_eq!(SpiConfig::default().limited(), SpiConfig::default());
    }
}
