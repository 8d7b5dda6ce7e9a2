//! Touch tick task
//!
//! Every tick period:
//! - samples the charger status line
//! - advances the touch clock and raises the touch flag
//! - latches a charger insertion when the loop has armed the watch
//! - wakes the recorder task

use defmt::*;
use embassy_time::{Duration, Ticker};
use portable_atomic::Ordering;

use neurotrace_hal::gpio::ActiveLevel;
use neurotrace_hal_rp2040::gpio::RpInput;

use crate::channels::{CHARGER_PRESENT, SHARED, WAKE};

#[embassy_executor::task]
pub async fn touch_tick_task(charger: ActiveLevel<RpInput<'static>>, period_ms: u16) {
    info!("Touch tick task started ({} ms)", period_ms);

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(period_ms)));

    loop {
        ticker.next().await;

        let present = charger.is_asserted();
        CHARGER_PRESENT.store(present, Ordering::Release);
        SHARED.flags.on_touch_tick(period_ms, present);

        WAKE.signal(());
    }
}
