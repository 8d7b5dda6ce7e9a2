//! PWM output
//!
//! One channel A output of a PWM slice, counting to 255 so the 8-bit duty
//! maps straight onto the compare register. At the default divider the
//! carrier runs at clk_sys / 256, far above anything the scale filter
//! passes.

use embassy_rp::pwm::{ChannelAPin, Config, Pwm, Slice};
use embassy_rp::Peri;
use neurotrace_hal::PwmChannel;

/// Counter wrap value
pub const TOP: u16 = 255;

/// Channel A of one PWM slice
pub struct RpPwm<'d> {
    pwm: Pwm<'d>,
    config: Config,
}

impl<'d> RpPwm<'d> {
    /// Start `slice` on `pin` with the output low
    pub fn channel_a<T: Slice>(slice: Peri<'d, T>, pin: Peri<'d, impl ChannelAPin<T>>) -> Self {
        let mut config = Config::default();
        config.top = TOP;
        config.compare_a = 0;
        Self {
            pwm: Pwm::new_output_a(slice, pin, config.clone()),
            config,
        }
    }
}

impl PwmChannel for RpPwm<'_> {
    fn set_duty(&mut self, duty: u8) {
        self.config.compare_a = u16::from(duty);
        self.pwm.set_config(&self.config);
    }
}
