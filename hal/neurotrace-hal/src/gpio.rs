//! GPIO pin abstractions
//!
//! Level inputs and outputs used by the recorder board: amplifier chip
//! select, the display-scale switch, indicator LEDs and the charger
//! status line.

/// Digital output pin
pub trait OutputPin {
    /// Drive the pin high (logic 1)
    fn set_high(&mut self);

    /// Drive the pin low (logic 0)
    fn set_low(&mut self);

    /// Drive the pin to `high`
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Whether the pin is currently driven high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Input whose asserted level depends on board wiring
///
/// Charger status outputs are usually open-drain and active low; wrapping
/// the pin keeps that detail out of the board logic.
#[derive(Debug)]
pub struct ActiveLevel<P> {
    pin: P,
    active_high: bool,
}

impl<P: InputPin> ActiveLevel<P> {
    /// Input asserted when the pin reads low
    pub fn active_low(pin: P) -> Self {
        Self { pin, active_high: false }
    }

    /// Input asserted when the pin reads high
    pub fn active_high(pin: P) -> Self {
        Self { pin, active_high: true }
    }

    /// Whether the input is asserted
    pub fn is_asserted(&self) -> bool {
        self.pin.is_high() == self.active_high
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}
