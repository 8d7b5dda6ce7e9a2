//! Programmable-gain amplifier trait

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Amplifier gain setting
///
/// Discriminants are the PGA112 gain field encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Gain {
    X1 = 0,
    X2 = 1,
    X4 = 2,
    X8 = 3,
    X16 = 4,
    X32 = 5,
    X64 = 6,
    X128 = 7,
}

impl Gain {
    /// Register encoding
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a register value
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Gain::X1),
            1 => Some(Gain::X2),
            2 => Some(Gain::X4),
            3 => Some(Gain::X8),
            4 => Some(Gain::X16),
            5 => Some(Gain::X32),
            6 => Some(Gain::X64),
            7 => Some(Gain::X128),
            _ => None,
        }
    }

    /// Linear amplification factor
    pub const fn factor(self) -> u8 {
        1 << (self as u8)
    }
}

/// Amplifier input multiplexer setting
///
/// Discriminants are the PGA112 channel field encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum InputChannel {
    /// Reference input
    Ch0 = 0,
    /// Electrode input
    Ch1 = 1,
    /// Internal ground
    Cal1 = 12,
    /// Internal 0.9 VCAL
    Cal2 = 13,
    /// Internal 0.1 VCAL
    Cal3 = 14,
    /// Internal VREF
    Cal4 = 15,
}

impl InputChannel {
    /// Register encoding
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a register value
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(InputChannel::Ch0),
            1 => Some(InputChannel::Ch1),
            12 => Some(InputChannel::Cal1),
            13 => Some(InputChannel::Cal2),
            14 => Some(InputChannel::Cal3),
            15 => Some(InputChannel::Cal4),
            _ => None,
        }
    }
}

/// Programmable-gain amplifier in front of the sample source
///
/// All commands are idempotent: requesting the setting that already holds
/// must not touch the hardware.
pub trait Amplifier {
    /// Select the gain
    fn set_gain(&mut self, gain: Gain);

    /// Select the input channel
    fn set_channel(&mut self, channel: InputChannel);

    /// Enter (`true`) or leave (`false`) the low-power shutdown state
    fn sleep(&mut self, sleep: bool);
}
