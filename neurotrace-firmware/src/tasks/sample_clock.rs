//! Sample clock task
//!
//! Requests one conversion per sample period while the sampler has the
//! clock running. When stopped it idles at a slow poll instead of waking
//! the executor at the full sample rate.

use defmt::*;
use embassy_time::{Duration, Ticker, Timer};

use crate::channels::{SHARED, WAKE};

/// Poll interval while the clock is stopped
const IDLE_POLL_MS: u64 = 10;

#[embassy_executor::task]
pub async fn sample_clock_task(rate_hz: u32) {
    info!("Sample clock task started ({} Hz)", rate_hz);

    let mut ticker = Ticker::every(Duration::from_hz(u64::from(rate_hz)));

    loop {
        if !SHARED.flags.sample_clock_running() {
            Timer::after_millis(IDLE_POLL_MS).await;
            ticker.reset();
            continue;
        }

        ticker.next().await;
        SHARED.flags.signal_sample_due();
        WAKE.signal(());
    }
}
