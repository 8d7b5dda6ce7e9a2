//! TI PGA112 programmable-gain amplifier (SPI)
//!
//! The PGA112 is a zero-drift PGA with binary gain steps (1 to 128) and a
//! two-channel input multiplexer plus four internal calibration inputs.
//!
//! # SPI Protocol
//!
//! Every command is a 16-bit word, sent MSB first in SPI mode 0 or 3 with
//! chip select held low for the whole word:
//! - Write: `0x2A`, then `(gain << 4) | channel`
//! - Read: `0x6A`, then `0x00`; the register arrives during the next word
//! - Shutdown: `0xE1`, then `0xF1` to enter or `0x00` to leave
//!
//! The chip has no status register, so the driver mirrors the settings it
//! has written and skips commands that would not change anything.

use neurotrace_core::traits::{Amplifier, Gain, InputChannel};
use neurotrace_hal::spi::Frame;
use neurotrace_hal::{OutputPin, SpiBus};

/// PGA112 command bytes
pub mod cmd {
    /// Write gain and channel
    pub const WRITE: u8 = 0x2A;
    /// Read gain and channel
    pub const READ: u8 = 0x6A;
    /// Software shutdown control
    pub const SHUTDOWN: u8 = 0xE1;
    /// Shutdown data byte: enter shutdown
    pub const SHUTDOWN_ENTER: u8 = 0xF1;
    /// Shutdown data byte: leave shutdown
    pub const SHUTDOWN_LEAVE: u8 = 0x00;
}

/// PGA112 communication errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pga112Error {
    /// The SPI bus reported a failure
    Bus,
    /// Read-back register holds an encoding the chip never produces
    InvalidReadback(u8),
}

/// Pack gain and channel into the write data byte
pub const fn config_byte(gain: Gain, channel: InputChannel) -> u8 {
    (gain.bits() << 4) | channel.bits()
}

/// Split a read-back register into channel and gain
pub fn parse_config(byte: u8) -> Result<(InputChannel, Gain), Pga112Error> {
    let channel = InputChannel::from_bits(byte & 0x0F);
    let gain = Gain::from_bits(byte >> 4);
    match (channel, gain) {
        (Some(channel), Some(gain)) => Ok((channel, gain)),
        _ => Err(Pga112Error::InvalidReadback(byte)),
    }
}

/// PGA112 driver
pub struct Pga112<S, CS> {
    spi: S,
    cs: CS,
    gain: Gain,
    channel: InputChannel,
    sleeping: bool,
    errors: u32,
    last_error: Option<Pga112Error>,
}

impl<S: SpiBus, CS: OutputPin> Pga112<S, CS> {
    /// Take over the bus and chip select
    ///
    /// The mirrored state starts at the chip's power-on defaults (x1,
    /// channel 0, awake).
    pub fn new(spi: S, mut cs: CS) -> Self {
        cs.set_high();
        Self {
            spi,
            cs,
            gain: Gain::X1,
            channel: InputChannel::Ch0,
            sleeping: false,
            errors: 0,
            last_error: None,
        }
    }

    /// Currently programmed gain
    pub fn gain(&self) -> Gain {
        self.gain
    }

    /// Currently programmed input channel
    pub fn channel(&self) -> InputChannel {
        self.channel
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Number of failed transfers since creation
    pub fn error_count(&self) -> u32 {
        self.errors
    }

    /// Most recent failure, if any
    pub fn last_error(&self) -> Option<Pga112Error> {
        self.last_error
    }

    /// Read gain and channel back from the chip
    pub fn read_configuration(&mut self) -> Result<(InputChannel, Gain), Pga112Error> {
        self.send(cmd::READ, 0)?;
        let reply = self.exchange([0, 0])?;
        parse_config(reply[1])
    }

    /// Release the bus and chip select
    pub fn release(self) -> (S, CS) {
        (self.spi, self.cs)
    }

    fn send(&mut self, command: u8, data: u8) -> Result<(), Pga112Error> {
        self.cs.set_low();
        let result = self.spi.write_frame([command, data]);
        self.cs.set_high();
        self.check(result)
    }

    fn exchange(&mut self, frame: Frame) -> Result<Frame, Pga112Error> {
        self.cs.set_low();
        let result = self.spi.exchange_frame(frame);
        self.cs.set_high();
        self.check(result)
    }

    fn check<T>(&mut self, result: Result<T, S::Error>) -> Result<T, Pga112Error> {
        result.map_err(|_| {
            self.errors = self.errors.saturating_add(1);
            self.last_error = Some(Pga112Error::Bus);
            Pga112Error::Bus
        })
    }
}

const fn shutdown_byte(sleeping: bool) -> u8 {
    if sleeping {
        cmd::SHUTDOWN_ENTER
    } else {
        cmd::SHUTDOWN_LEAVE
    }
}

// Failed writes leave the mirror untouched so the next request retries.
impl<S: SpiBus, CS: OutputPin> Amplifier for Pga112<S, CS> {
    fn set_gain(&mut self, gain: Gain) {
        if gain != self.gain && self.send(cmd::WRITE, config_byte(gain, self.channel)).is_ok() {
            self.gain = gain;
        }
    }

    fn set_channel(&mut self, channel: InputChannel) {
        if channel != self.channel
            && self.send(cmd::WRITE, config_byte(self.gain, channel)).is_ok()
        {
            self.channel = channel;
        }
    }

    fn sleep(&mut self, sleep: bool) {
        if sleep != self.sleeping && self.send(cmd::SHUTDOWN, shutdown_byte(sleep)).is_ok() {
            self.sleeping = sleep;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bus that behaves like a PGA112 and logs every word it sees
    struct MockChip {
        register: u8,
        shutdown: bool,
        read_pending: bool,
        words: heapless::Vec<Frame, 16>,
        fail: bool,
    }

    impl MockChip {
        fn new() -> Self {
            Self {
                register: 0,
                shutdown: false,
                read_pending: false,
                words: heapless::Vec::new(),
                fail: false,
            }
        }

        fn accept(&mut self, word: Frame) -> u8 {
            let _ = self.words.push(word);
            let reply = if self.read_pending { self.register } else { 0 };
            self.read_pending = false;
            match word[0] {
                cmd::WRITE => self.register = word[1],
                cmd::READ => self.read_pending = true,
                cmd::SHUTDOWN => self.shutdown = word[1] == cmd::SHUTDOWN_ENTER,
                _ => {}
            }
            reply
        }
    }

    #[derive(Debug)]
    struct BusFault;

    impl SpiBus for MockChip {
        type Error = BusFault;

        fn write_frame(&mut self, frame: Frame) -> Result<(), BusFault> {
            if self.fail {
                return Err(BusFault);
            }
            self.accept(frame);
            Ok(())
        }

        fn exchange_frame(&mut self, frame: Frame) -> Result<Frame, BusFault> {
            if self.fail {
                return Err(BusFault);
            }
            Ok([0, self.accept(frame)])
        }
    }

    #[derive(Default)]
    struct MockCs {
        high: bool,
        selects: u32,
    }

    impl OutputPin for MockCs {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
            self.selects += 1;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    fn driver() -> Pga112<MockChip, MockCs> {
        Pga112::new(MockChip::new(), MockCs::default())
    }

    #[test]
    fn test_new_deselects_chip() {
        let (spi, cs) = driver().release();
        assert!(cs.is_set_high());
        assert_eq!(cs.selects, 0);
        assert!(spi.words.is_empty());
    }

    #[test]
    fn test_set_gain_writes_gain_and_channel() {
        let mut pga = driver();
        pga.set_channel(InputChannel::Ch1);
        pga.set_gain(Gain::X8);

        let (spi, cs) = pga.release();
        assert_eq!(spi.words.as_slice(), &[[0x2A, 0x01], [0x2A, 0x31]]);
        assert_eq!(spi.register, 0x31);
        assert_eq!(cs.selects, 2);
        assert!(cs.is_set_high());
    }

    #[test]
    fn test_repeated_set_gain_writes_at_most_once() {
        let mut pga = driver();
        pga.set_gain(Gain::X4);
        pga.set_gain(Gain::X4);
        pga.set_gain(Gain::X4);
        assert_eq!(pga.release().0.words.len(), 1);
    }

    #[test]
    fn test_power_on_settings_need_no_write() {
        let mut pga = driver();
        pga.set_gain(Gain::X1);
        pga.set_channel(InputChannel::Ch0);
        pga.sleep(false);
        assert!(pga.release().0.words.is_empty());
    }

    #[test]
    fn test_sleep_and_wake() {
        let mut pga = driver();
        pga.sleep(true);
        assert!(pga.is_sleeping());
        pga.sleep(true);
        pga.sleep(false);

        let (spi, _) = pga.release();
        assert_eq!(spi.words.as_slice(), &[[0xE1, 0xF1], [0xE1, 0x00]]);
        assert!(!spi.shutdown);
    }

    #[test]
    fn test_read_configuration() {
        let mut pga = driver();
        pga.set_channel(InputChannel::Cal4);
        pga.set_gain(Gain::X128);

        assert_eq!(
            pga.read_configuration(),
            Ok((InputChannel::Cal4, Gain::X128))
        );
        let (spi, _) = pga.release();
        assert_eq!(&spi.words[2..], &[[0x6A, 0x00], [0x00, 0x00]]);
    }

    #[test]
    fn test_parse_config_rejects_unused_channel() {
        assert_eq!(parse_config(0x25), Err(Pga112Error::InvalidReadback(0x25)));
        assert_eq!(parse_config(0x7C), Ok((InputChannel::Cal1, Gain::X128)));
    }

    #[test]
    fn test_bus_failure_is_counted_and_retried() {
        let mut pga = driver();
        let (mut spi, cs) = pga.release();
        spi.fail = true;
        pga = Pga112::new(spi, cs);

        pga.set_gain(Gain::X2);
        assert_eq!(pga.gain(), Gain::X1);
        assert_eq!(pga.error_count(), 1);
        assert_eq!(pga.last_error(), Some(Pga112Error::Bus));

        let (mut spi, cs) = pga.release();
        spi.fail = false;
        pga = Pga112::new(spi, cs);
        pga.set_gain(Gain::X2);
        assert_eq!(pga.gain(), Gain::X2);
        assert_eq!(pga.release().0.words.as_slice(), &[[0x2A, 0x10]]);
    }
}
