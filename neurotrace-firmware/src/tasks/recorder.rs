//! Recorder task
//!
//! Runs one loop iteration per wake-up. The await on [`WAKE`] is the
//! low-power wait: with nothing pending the executor sleeps in WFE until
//! a clock task fires.

use defmt::*;
use embassy_time::Instant;

use neurotrace_core::recorder::Recorder;
use neurotrace_core::safety::SafetyStatus;

use crate::board::RpBoard;
use crate::channels::WAKE;

#[embassy_executor::task]
pub async fn recorder_task(mut recorder: Recorder<'static, RpBoard>) {
    info!("Recorder task started in {:?}", recorder.mode());

    let mut mode = recorder.mode();
    let mut overruns = 0;
    let mut amplifier_errors = 0;

    loop {
        let sleep = recorder.poll();

        if recorder.mode() != mode {
            info!("Mode {:?} -> {:?}", mode, recorder.mode());
            mode = recorder.mode();
            if recorder.mode().is_sampling() {
                debug!("Gain stage {}", recorder.gain().stage());
            }
        }

        match recorder.safety().check() {
            SafetyStatus::Degraded { overruns: total } if total != overruns => {
                warn!("Sample ring overrun ({} samples lost)", total);
                overruns = total;
            }
            SafetyStatus::Fault(kind) => trace!("Fault latched: {:?}", kind),
            _ => {}
        }

        let amplifier = &recorder.board().amplifier;
        if amplifier.error_count() != amplifier_errors {
            amplifier_errors = amplifier.error_count();
            warn!(
                "Amplifier SPI error ({} total, last {:?})",
                amplifier_errors,
                amplifier.last_error()
            );
        }

        let now_ms = Instant::now().as_millis() as u32;
        recorder.board_mut().refresh_indicator(now_ms);

        trace!("Waiting in {:?}", sleep);
        WAKE.wait().await;
    }
}
