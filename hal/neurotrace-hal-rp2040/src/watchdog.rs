//! Watchdog and scratch-register storage
//!
//! The RP2040 watchdog keeps eight 32-bit scratch registers across a
//! watchdog reset; power-on clears them. The bootrom claims scratch 4-7
//! for its own reboot handling, so only 0-3 are offered as storage.

use embassy_rp::peripherals::WATCHDOG;
use embassy_rp::watchdog::Watchdog as Peripheral;
use embassy_rp::Peri;
use embassy_time::Duration;
use neurotrace_hal::persist::{PersistError, PersistentStore};
use neurotrace_hal::{PersistKey, ResetCause, Watchdog};

/// Longest timeout the 24-bit counter can hold
pub const MAX_TIMEOUT_MS: u32 = 8_300;

/// Scratch registers free for application use
pub const USER_SCRATCH_SLOTS: usize = 4;

/// RP2040 watchdog
pub struct RpWatchdog {
    inner: Peripheral,
    reset_cause: ResetCause,
}

impl RpWatchdog {
    /// Take the watchdog and latch the cause of the last reset
    pub fn new(watchdog: Peri<'static, WATCHDOG>) -> Self {
        let inner = Peripheral::new(watchdog);
        // Any watchdog-driven reset, timed out or forced, reports a reason
        let reset_cause = match inner.reset_reason() {
            Some(_) => ResetCause::Watchdog,
            None => ResetCause::PowerOn,
        };
        Self { inner, reset_cause }
    }
}

impl Watchdog for RpWatchdog {
    fn start(&mut self, timeout_ms: u32) {
        let timeout_ms = timeout_ms.min(MAX_TIMEOUT_MS);
        self.inner.start(Duration::from_millis(u64::from(timeout_ms)));
    }

    fn stop(&mut self) {
        self.inner.stop();
    }

    fn feed(&mut self) {
        self.inner.feed();
    }

    fn reset_cause(&self) -> ResetCause {
        self.reset_cause
    }

    fn force_reset(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::warn!("forcing watchdog reset");
        self.inner.trigger_reset();
        loop {
            cortex_m::asm::nop();
        }
    }
}

impl PersistentStore for RpWatchdog {
    fn read_byte(&mut self, key: PersistKey) -> Result<u8, PersistError> {
        let slot = scratch_slot(key)?;
        Ok((self.inner.get_scratch(slot) & 0xFF) as u8)
    }

    fn write_byte(&mut self, key: PersistKey, value: u8) -> Result<(), PersistError> {
        let slot = scratch_slot(key)?;
        self.inner.set_scratch(slot, u32::from(value));
        if self.inner.get_scratch(slot) == u32::from(value) {
            Ok(())
        } else {
            Err(PersistError::WriteFailed)
        }
    }
}

fn scratch_slot(key: PersistKey) -> Result<usize, PersistError> {
    let slot = usize::from(key.as_u8());
    if slot < USER_SCRATCH_SLOTS {
        Ok(slot)
    } else {
        Err(PersistError::NoSuchSlot)
    }
}
