//! Touch debouncer
//!
//! A gesture is a run of consecutive touched measurements. It is valid
//! when the run is at least `min_ticks` long and ends before reaching
//! `max_ticks`; longer runs are discarded without an event on release.

use crate::config::ConfigError;

/// Gesture length limits in touch ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HoldWindow {
    min_ticks: u16,
    max_ticks: u16,
}

impl HoldWindow {
    /// One tick minimum, released on the next
    pub const SHORTEST: HoldWindow = HoldWindow {
        min_ticks: 1,
        max_ticks: 2,
    };

    /// Window accepting runs of `min_ticks..max_ticks` measurements
    pub const fn new(min_ticks: u16, max_ticks: u16) -> Result<Self, ConfigError> {
        if min_ticks == 0 {
            return Err(ConfigError::EmptyHoldWindow);
        }
        if max_ticks <= min_ticks {
            return Err(ConfigError::HoldWindowOrder);
        }
        Ok(Self {
            min_ticks,
            max_ticks,
        })
    }

    /// Window from millisecond limits and the touch tick period
    pub fn from_millis(min_ms: u32, max_ms: u32, tick_ms: u16) -> Result<Self, ConfigError> {
        if tick_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        let to_ticks = |ms: u32| {
            u16::try_from(ms / u32::from(tick_ms)).map_err(|_| ConfigError::HoldWindowTooLong)
        };
        Self::new(to_ticks(min_ms)?, to_ticks(max_ms)?)
    }

    pub const fn min_ticks(&self) -> u16 {
        self.min_ticks
    }

    pub const fn max_ticks(&self) -> u16 {
        self.max_ticks
    }

    /// Whether a run of `ticks` touched measurements is a valid gesture
    pub const fn accepts(&self, ticks: u16) -> bool {
        ticks >= self.min_ticks && ticks < self.max_ticks
    }
}

/// Debouncer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchPhase {
    /// Key not touched
    Idle,
    /// Touched, shorter than the minimum
    ConfirmingPress,
    /// Touched long enough; release now completes the gesture
    Holding,
    /// Touched too long; waiting for release
    Discarding,
}

/// Debouncer output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchEvent {
    /// First touched measurement of a run
    PressStarted,
    /// Run reached the minimum length
    PressConfirmed,
    /// Released before the minimum length
    PressCancelled,
    /// Run reached the maximum length; gesture dropped
    Discarded,
    /// Released inside the window: the valid gesture
    Released,
}

/// Touch debouncer state machine
#[derive(Debug, Clone)]
pub struct TouchDebouncer {
    phase: TouchPhase,
    elapsed: u16,
    window: HoldWindow,
}

impl TouchDebouncer {
    /// Create an idle debouncer
    pub const fn new(window: HoldWindow) -> Self {
        Self {
            phase: TouchPhase::Idle,
            elapsed: 0,
            window,
        }
    }

    /// Return to idle and install new thresholds
    pub fn init(&mut self, window: HoldWindow) {
        self.phase = TouchPhase::Idle;
        self.elapsed = 0;
        self.window = window;
    }

    pub fn phase(&self) -> TouchPhase {
        self.phase
    }

    /// Touched measurements in the current run
    pub fn elapsed(&self) -> u16 {
        self.elapsed
    }

    pub fn window(&self) -> HoldWindow {
        self.window
    }

    /// Feed one raw measurement
    pub fn on_measurement(&mut self, touched: bool) -> Option<TouchEvent> {
        use TouchPhase::*;

        match (self.phase, touched) {
            (Idle, true) => {
                self.elapsed = 1;
                if self.elapsed >= self.window.min_ticks {
                    self.phase = Holding;
                    Some(TouchEvent::PressConfirmed)
                } else {
                    self.phase = ConfirmingPress;
                    Some(TouchEvent::PressStarted)
                }
            }
            (Idle, false) => None,

            (ConfirmingPress, true) => {
                self.elapsed = self.elapsed.saturating_add(1);
                if self.elapsed >= self.window.min_ticks {
                    self.phase = Holding;
                    Some(TouchEvent::PressConfirmed)
                } else {
                    None
                }
            }
            (ConfirmingPress, false) => {
                self.phase = Idle;
                Some(TouchEvent::PressCancelled)
            }

            (Holding, true) => {
                self.elapsed = self.elapsed.saturating_add(1);
                if self.elapsed >= self.window.max_ticks {
                    self.phase = Discarding;
                    Some(TouchEvent::Discarded)
                } else {
                    None
                }
            }
            (Holding, false) => {
                self.phase = Idle;
                Some(TouchEvent::Released)
            }

            (Discarding, true) => None,
            (Discarding, false) => {
                self.phase = Idle;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn window(min: u16, max: u16) -> HoldWindow {
        HoldWindow::new(min, max).unwrap()
    }

    /// Feed `run` touched measurements then one release; collect events
    fn gesture(debouncer: &mut TouchDebouncer, run: u16) -> heapless::Vec<TouchEvent, 8> {
        let mut events = heapless::Vec::new();
        for _ in 0..run {
            if let Some(event) = debouncer.on_measurement(true) {
                events.push(event).unwrap();
            }
        }
        if let Some(event) = debouncer.on_measurement(false) {
            events.push(event).unwrap();
        }
        events
    }

    #[test]
    fn test_window_validation() {
        assert_eq!(HoldWindow::new(0, 5), Err(ConfigError::EmptyHoldWindow));
        assert_eq!(HoldWindow::new(5, 5), Err(ConfigError::HoldWindowOrder));
        assert_eq!(
            HoldWindow::from_millis(1000, 2000, 0),
            Err(ConfigError::ZeroTickPeriod)
        );
        assert_eq!(
            HoldWindow::from_millis(1000, 100_000_000, 1),
            Err(ConfigError::HoldWindowTooLong)
        );
    }

    #[test]
    fn test_idle_ignores_release() {
        let mut debouncer = TouchDebouncer::new(window(3, 6));
        assert_eq!(debouncer.on_measurement(false), None);
        assert_eq!(debouncer.phase(), TouchPhase::Idle);
    }

    #[test]
    fn test_valid_gesture_sequence() {
        let mut debouncer = TouchDebouncer::new(window(3, 6));
        assert_eq!(debouncer.on_measurement(true), Some(TouchEvent::PressStarted));
        assert_eq!(debouncer.phase(), TouchPhase::ConfirmingPress);
        assert_eq!(debouncer.on_measurement(true), None);
        assert_eq!(debouncer.on_measurement(true), Some(TouchEvent::PressConfirmed));
        assert_eq!(debouncer.phase(), TouchPhase::Holding);
        assert_eq!(debouncer.on_measurement(false), Some(TouchEvent::Released));
        assert_eq!(debouncer.phase(), TouchPhase::Idle);
    }

    #[test]
    fn test_short_press_cancelled() {
        let mut debouncer = TouchDebouncer::new(window(3, 6));
        let events = gesture(&mut debouncer, 2);
        assert_eq!(
            events.as_slice(),
            &[TouchEvent::PressStarted, TouchEvent::PressCancelled]
        );
    }

    #[test]
    fn test_long_press_discarded_silently() {
        let mut debouncer = TouchDebouncer::new(window(3, 6));
        let events = gesture(&mut debouncer, 9);
        assert_eq!(
            events.as_slice(),
            &[
                TouchEvent::PressStarted,
                TouchEvent::PressConfirmed,
                TouchEvent::Discarded
            ]
        );
        assert_eq!(debouncer.phase(), TouchPhase::Idle);
    }

    #[test]
    fn test_run_of_max_is_discarded() {
        let mut debouncer = TouchDebouncer::new(window(3, 6));
        let events = gesture(&mut debouncer, 6);
        assert!(!events.contains(&TouchEvent::Released));
        let events = gesture(&mut debouncer, 5);
        assert!(events.contains(&TouchEvent::Released));
    }

    #[test]
    fn test_single_tick_minimum() {
        let mut debouncer = TouchDebouncer::new(window(1, 3));
        assert_eq!(debouncer.on_measurement(true), Some(TouchEvent::PressConfirmed));
        assert_eq!(debouncer.on_measurement(false), Some(TouchEvent::Released));
    }

    #[test]
    fn test_init_resets_and_reconfigures() {
        let mut debouncer = TouchDebouncer::new(window(50, 60));
        debouncer.on_measurement(true);
        debouncer.init(window(10, 20));
        assert_eq!(debouncer.phase(), TouchPhase::Idle);
        assert_eq!(debouncer.elapsed(), 0);
        assert_eq!(debouncer.window(), window(10, 20));
    }

    proptest! {
        #[test]
        fn prop_released_iff_run_in_window(
            min in 1u16..40,
            span in 1u16..40,
            run in 1u16..100,
        ) {
            let hold = window(min, min + span);
            let mut debouncer = TouchDebouncer::new(hold);
            let events = gesture(&mut debouncer, run);
            prop_assert_eq!(events.contains(&TouchEvent::Released), hold.accepts(run));
            prop_assert_eq!(debouncer.phase(), TouchPhase::Idle);
        }

        #[test]
        fn prop_releases_match_accepted_runs(
            pattern in proptest::collection::vec(any::<bool>(), 0..300),
        ) {
            let hold = window(3, 7);
            let mut debouncer = TouchDebouncer::new(hold);
            let mut run = 0u16;
            let mut expected = 0usize;
            let mut released = 0usize;
            for touched in pattern.iter().copied().chain(core::iter::once(false)) {
                if touched {
                    run += 1;
                } else {
                    if run > 0 && hold.accepts(run) {
                        expected += 1;
                    }
                    run = 0;
                }
                if debouncer.on_measurement(touched) == Some(TouchEvent::Released) {
                    released += 1;
                }
            }
            prop_assert_eq!(released, expected);
        }
    }
}
