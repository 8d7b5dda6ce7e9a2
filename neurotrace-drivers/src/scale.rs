//! Calibration scale sine generator
//!
//! While the display scale is shown, a 128-point sine table is played into
//! a PWM output whose filtered level is switched onto the amplifier input.
//! Stepping at `STEP_RATE_HZ` gives a reference sine of
//! `STEP_RATE_HZ / 128` (about 15 Hz).
//!
//! The loop only flips the shared run flag through [`ScaleSwitch`]; a
//! clock task owns the [`SineScale`] and steps it.

use neurotrace_core::channel::Shared;
use neurotrace_core::traits::ScaleSignal;
use neurotrace_hal::PwmChannel;

/// Table steps per second
pub const STEP_RATE_HZ: u32 = 1953;

/// One sine period, centred on 128
#[rustfmt::skip]
pub const SINE_TABLE: [u8; 128] = [
    128, 134, 140, 147, 153, 159, 165, 171, 177, 182, 188, 193, 199, 204, 209, 213,
    218, 222, 226, 230, 234, 237, 240, 243, 245, 248, 250, 251, 253, 254, 254, 255,
    255, 255, 254, 254, 253, 251, 250, 248, 245, 243, 240, 237, 234, 230, 226, 222,
    218, 213, 209, 204, 199, 193, 188, 182, 177, 171, 165, 159, 153, 147, 140, 134,
    128, 122, 116, 109, 103,  97,  91,  85,  79,  74,  68,  63,  57,  52,  47,  43,
     38,  34,  30,  26,  22,  19,  16,  13,  11,   8,   6,   5,   3,   2,   2,   1,
      1,   1,   2,   2,   3,   5,   6,   8,  11,  13,  16,  19,  22,  26,  30,  34,
     38,  43,  47,  52,  57,  63,  68,  74,  79,  85,  91,  97, 103, 109, 116, 122,
];

/// Sine table player over a PWM output
pub struct SineScale<P> {
    pwm: P,
    index: usize,
    playing: bool,
}

impl<P: PwmChannel> SineScale<P> {
    /// Take the PWM output and park it low
    pub fn new(mut pwm: P) -> Self {
        pwm.set_duty(0);
        Self {
            pwm,
            index: 0,
            playing: false,
        }
    }

    /// Advance by one table step, or park the output when not `running`
    ///
    /// Every start plays from the top of the table.
    pub fn step(&mut self, running: bool) {
        if running {
            self.pwm.set_duty(SINE_TABLE[self.index]);
            self.index = (self.index + 1) % SINE_TABLE.len();
            self.playing = true;
        } else if self.playing {
            self.pwm.set_duty(0);
            self.index = 0;
            self.playing = false;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

/// Loop-side handle that starts and stops the generator
pub struct ScaleSwitch<'a> {
    shared: &'a Shared,
}

impl<'a> ScaleSwitch<'a> {
    pub fn new(shared: &'a Shared) -> Self {
        Self { shared }
    }
}

impl ScaleSignal for ScaleSwitch<'_> {
    fn start(&mut self) {
        self.shared.flags.run_scale_signal(true);
    }

    fn stop(&mut self) {
        self.shared.flags.run_scale_signal(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockPwm {
        duty: u8,
        writes: heapless::Vec<u8, 512>,
    }

    impl PwmChannel for MockPwm {
        fn set_duty(&mut self, duty: u8) {
            self.duty = duty;
            let _ = self.writes.push(duty);
        }
    }

    #[test]
    fn test_new_parks_output() {
        let scale = SineScale::new(MockPwm { duty: 200, ..Default::default() });
        assert_eq!(scale.pwm.duty, 0);
        assert!(!scale.is_playing());
    }

    #[test]
    fn test_plays_whole_table_then_wraps() {
        let mut scale = SineScale::new(MockPwm::default());
        for _ in 0..SINE_TABLE.len() + 2 {
            scale.step(true);
        }
        let played = &scale.pwm.writes[1..];
        assert_eq!(&played[..SINE_TABLE.len()], &SINE_TABLE[..]);
        assert_eq!(&played[SINE_TABLE.len()..], &[128, 134]);
    }

    #[test]
    fn test_table_is_one_symmetric_period() {
        assert_eq!(SINE_TABLE[0], 128);
        assert_eq!(SINE_TABLE[64], 128);
        assert_eq!(SINE_TABLE.iter().max(), Some(&255));
        assert_eq!(SINE_TABLE.iter().min(), Some(&1));
        for i in 1..64 {
            let upper = i32::from(SINE_TABLE[i]) - 128;
            let lower = 128 - i32::from(SINE_TABLE[128 - i]);
            assert_eq!(upper, lower, "step {i}");
        }
    }

    #[test]
    fn test_stop_parks_and_restarts_at_top() {
        let mut scale = SineScale::new(MockPwm::default());
        for _ in 0..10 {
            scale.step(true);
        }
        scale.step(false);
        assert_eq!(scale.pwm.duty, 0);
        assert!(!scale.is_playing());

        // Idle steps do not keep rewriting the output
        let writes = scale.pwm.writes.len();
        scale.step(false);
        assert_eq!(scale.pwm.writes.len(), writes);

        scale.step(true);
        assert_eq!(scale.pwm.duty, SINE_TABLE[0]);
    }

    #[test]
    fn test_switch_drives_run_flag() {
        let shared = Shared::new();
        let mut switch = ScaleSwitch::new(&shared);
        switch.start();
        assert!(shared.flags.scale_signal_running());
        switch.stop();
        assert!(!shared.flags.scale_signal_running());
    }
}
