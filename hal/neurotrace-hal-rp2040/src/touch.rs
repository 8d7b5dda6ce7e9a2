//! Capacitive pad on a plain GPIO
//!
//! The pad is charged by driving the pin high, then released to float
//! while an external bleed resistor discharges it. The number of polls
//! until the pin reads low grows with the pad capacitance, so a finger
//! raises the count.

use embassy_rp::gpio::{Flex, Pin, Pull};
use embassy_rp::Peri;
use neurotrace_hal::CapacitiveChannel;

/// RC-discharge capacitive pad
pub struct RcPad<'d> {
    pin: Flex<'d>,
    /// Charge/discharge cycles summed per acquisition
    bursts: u8,
    /// Poll limit per cycle, so a shorted pad cannot stall the loop
    limit: u16,
}

impl<'d> RcPad<'d> {
    pub fn new(pin: Peri<'d, impl Pin>, bursts: u8, limit: u16) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_pull(Pull::None);
        pin.set_low();
        pin.set_as_output();
        Self {
            pin,
            bursts: bursts.max(1),
            limit,
        }
    }

    fn discharge_time(&mut self) -> u16 {
        self.pin.set_high();
        cortex_m::asm::delay(50);
        self.pin.set_as_input();

        let mut polls = 0;
        while self.pin.is_high() && polls < self.limit {
            polls += 1;
        }

        // Leave the pad grounded between acquisitions
        self.pin.set_low();
        self.pin.set_as_output();
        polls
    }
}

impl CapacitiveChannel for RcPad<'_> {
    fn acquire(&mut self) -> u16 {
        let mut total = 0u32;
        for _ in 0..self.bursts {
            total += u32::from(self.discharge_time());
        }
        (total / u32::from(self.bursts)) as u16
    }
}
