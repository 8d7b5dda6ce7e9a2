//! PWM output abstraction
//!
//! The calibration scale is an analog sine made by low-pass filtering a
//! PWM output. Drivers only ever write 8-bit duty values; the carrier
//! frequency is fixed by the chip HAL.

/// One PWM output with an 8-bit duty range
pub trait PwmChannel {
    /// Set the duty cycle to `duty / 255`
    fn set_duty(&mut self, duty: u8);
}
