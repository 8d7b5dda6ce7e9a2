//! NXP MMA7341LC three-axis accelerometer
//!
//! Analog outputs; the only digital control the recorder uses is the
//! active-low sleep input. The g-select input is strapped to the ±3 g
//! range on the board.

use neurotrace_core::traits::Accelerometer;
use neurotrace_hal::OutputPin;

/// Sleep control over the active-low sleep pin
pub struct Mma7341lc<S> {
    sleep_pin: S,
}

impl<S: OutputPin> Mma7341lc<S> {
    /// Take the sleep pin and put the sensor to sleep
    pub fn new(mut sleep_pin: S) -> Self {
        sleep_pin.set_low();
        Self { sleep_pin }
    }

    pub fn is_sleeping(&self) -> bool {
        !self.sleep_pin.is_set_high()
    }
}

impl<S: OutputPin> Accelerometer for Mma7341lc<S> {
    fn set_sleep(&mut self, sleep: bool) {
        self.sleep_pin.set_state(!sleep);
    }
}
