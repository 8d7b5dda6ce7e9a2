//! Watchdog abstraction
//!
//! The recorder loop must feed the watchdog at least once per timeout
//! period from every blocking path. The watchdog is also used on purpose:
//! a forced reset is how the recorder recovers when a charger is plugged
//! in mid-session.

/// Cause of the most recent reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetCause {
    /// Power-on or brown-out
    PowerOn,
    /// Watchdog expired or a reset was forced through the watchdog
    Watchdog,
    /// Reset pin, debugger or anything else
    Other,
}

/// Supervision timer
pub trait Watchdog {
    /// Start (or restart) the watchdog with the given timeout
    fn start(&mut self, timeout_ms: u32);

    /// Stop the watchdog, if the hardware allows it
    fn stop(&mut self);

    /// Reload the watchdog counter
    fn feed(&mut self);

    /// Cause of the reset that started the current run
    fn reset_cause(&self) -> ResetCause;

    /// Reset the chip through the watchdog
    ///
    /// On hardware this does not return. Simulated watchdogs may return,
    /// in which case the caller continues as if the reset had happened.
    fn force_reset(&mut self);
}
