//! Event flags
//!
//! Each flag has exactly one writer side: interrupt handlers set, the loop
//! takes. Taking swaps the flag back to `false`, so an event raised while
//! the loop is busy is seen on its next iteration and never twice.

use portable_atomic::{AtomicBool, AtomicU16, Ordering};

/// Flags raised by interrupt handlers for the recorder loop
pub struct EventFlags {
    sample_due: AtomicBool,
    sample_clock: AtomicBool,
    scale_signal: AtomicBool,
    touch_due: AtomicBool,
    charger_inserted: AtomicBool,
    charger_watch: AtomicBool,
    touch_time_ms: AtomicU16,
}

impl EventFlags {
    pub const fn new() -> Self {
        Self {
            sample_due: AtomicBool::new(false),
            sample_clock: AtomicBool::new(false),
            scale_signal: AtomicBool::new(false),
            touch_due: AtomicBool::new(false),
            charger_inserted: AtomicBool::new(false),
            charger_watch: AtomicBool::new(false),
            touch_time_ms: AtomicU16::new(0),
        }
    }

    // Interrupt side

    /// Sample clock fired
    pub fn signal_sample_due(&self) {
        self.sample_due.store(true, Ordering::Release);
    }

    /// Whether the sample clock should be firing
    pub fn sample_clock_running(&self) -> bool {
        self.sample_clock.load(Ordering::Acquire)
    }

    /// Whether the scale sine should be playing
    pub fn scale_signal_running(&self) -> bool {
        self.scale_signal.load(Ordering::Acquire)
    }

    /// Periodic touch tick
    ///
    /// Raises the touch flag and advances the touch clock. When the charger
    /// watch is armed, a present charger also latches the charger flag.
    pub fn on_touch_tick(&self, period_ms: u16, charger_present: bool) {
        self.touch_time_ms.fetch_add(period_ms, Ordering::Relaxed);
        self.touch_due.store(true, Ordering::Release);
        if charger_present && self.charger_watch.load(Ordering::Acquire) {
            self.charger_inserted.store(true, Ordering::Release);
        }
    }

    // Loop side

    pub fn take_sample_due(&self) -> bool {
        self.sample_due.swap(false, Ordering::AcqRel)
    }

    pub fn take_touch_due(&self) -> bool {
        self.touch_due.swap(false, Ordering::AcqRel)
    }

    pub fn take_charger_inserted(&self) -> bool {
        self.charger_inserted.swap(false, Ordering::AcqRel)
    }

    /// Start or stop the sample clock
    ///
    /// Stopping also drops a pending sample request.
    pub fn run_sample_clock(&self, running: bool) {
        self.sample_clock.store(running, Ordering::Release);
        if !running {
            self.sample_due.store(false, Ordering::Release);
        }
    }

    pub fn run_scale_signal(&self, running: bool) {
        self.scale_signal.store(running, Ordering::Release);
    }

    /// Whether a charger insertion is latched, without taking it
    pub fn charger_inserted(&self) -> bool {
        self.charger_inserted.load(Ordering::Acquire)
    }

    /// Enable or disable charger detection in the tick handler
    ///
    /// Disarming also drops a latched insertion.
    pub fn arm_charger_watch(&self, armed: bool) {
        self.charger_watch.store(armed, Ordering::Release);
        if !armed {
            self.charger_inserted.store(false, Ordering::Release);
        }
    }

    pub fn charger_watch_armed(&self) -> bool {
        self.charger_watch.load(Ordering::Acquire)
    }

    /// Wrapping millisecond clock advanced by the touch tick
    pub fn touch_time_ms(&self) -> u16 {
        self.touch_time_ms.load(Ordering::Relaxed)
    }

    pub fn reset_touch_time(&self) {
        self.touch_time_ms.store(0, Ordering::Relaxed);
    }
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::new()
    }
}
