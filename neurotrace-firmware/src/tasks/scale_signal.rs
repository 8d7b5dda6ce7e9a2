//! Scale signal task
//!
//! Steps the calibration sine while the loop has the scale signal running,
//! and parks the PWM output once it is stopped.

use defmt::*;
use embassy_time::{Duration, Ticker, Timer};
use neurotrace_drivers::scale::{SineScale, STEP_RATE_HZ};
use neurotrace_hal_rp2040::RpPwm;

use crate::channels::SHARED;

/// Poll interval while the signal is stopped
const IDLE_POLL_MS: u64 = 10;

#[embassy_executor::task]
pub async fn scale_signal_task(mut scale: SineScale<RpPwm<'static>>) {
    info!("Scale signal task started ({} steps/s)", STEP_RATE_HZ);

    let mut ticker = Ticker::every(Duration::from_hz(u64::from(STEP_RATE_HZ)));

    loop {
        if !SHARED.flags.scale_signal_running() {
            scale.step(false);
            Timer::after_millis(IDLE_POLL_MS).await;
            ticker.reset();
            continue;
        }

        ticker.next().await;
        scale.step(true);
    }
}
