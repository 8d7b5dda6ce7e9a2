//! Recorder loop
//!
//! Owns the mode, the gain controller, the touch debouncer and the board.
//! The board's runner calls [`Recorder::boot`] once and then
//! [`Recorder::poll`] after every wake-up, waiting in the returned
//! [`SleepMode`] in between.
//!
//! Interrupt handlers talk to the loop only through [`Shared`]: samples go
//! into the ring, ticks and charger insertion raise flags.

use neurotrace_hal::{PersistentFlag, ResetCause, Watchdog};

use crate::calibration::{CalibrationOutcome, OscillatorCalibrator};
use crate::channel::Shared;
use crate::config::{ConfigError, RecorderConfig};
use crate::gain::GainController;
use crate::safety::SafetyMonitor;
use crate::state::{Event, FaultKind, Mode, SleepMode};
use crate::touch::{HoldWindow, TouchDebouncer, TouchEvent};
use crate::traits::{Accelerometer, Board, Indication, SampleSource, ScaleSignal, TouchSensor};

/// What happened during boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    pub reset_cause: ResetCause,
    /// Reset was forced by charger insertion
    pub charger_reset: bool,
    /// `None` when the configuration was rejected before calibrating
    pub calibration: Option<CalibrationOutcome>,
    pub mode: Mode,
}

/// Mode state machine and cooperative loop
pub struct Recorder<'a, B: Board> {
    board: B,
    shared: &'a Shared,
    config: RecorderConfig,
    mode: Mode,
    gain: GainController,
    touch: TouchDebouncer,
    safety: SafetyMonitor,
    /// Touch ticks since entering the current mode
    mode_ticks: u32,
}

impl<'a, B: Board> Recorder<'a, B> {
    /// Create a recorder in [`Mode::Init`]
    ///
    /// Nothing touches the hardware until [`Recorder::boot`].
    pub fn new(board: B, shared: &'a Shared, config: RecorderConfig) -> Self {
        let window = config
            .timing
            .standby_window()
            .unwrap_or(HoldWindow::SHORTEST);
        Self {
            board,
            shared,
            gain: GainController::new(config.gain.clone()),
            touch: TouchDebouncer::new(window),
            config,
            mode: Mode::Init,
            safety: SafetyMonitor::new(),
            mode_ticks: 0,
        }
    }

    /// Run the Init mode
    ///
    /// Reads and clears the charger-reset flag, calibrates the oscillator,
    /// sets up the amplifier and starts the watchdog. Ends in Charging when
    /// the last reset was forced by charger insertion, in Standby otherwise,
    /// or in Fault when the configuration is rejected.
    pub fn boot(&mut self) -> BootReport {
        let reset_cause = self.board.watchdog().reset_cause();
        let flag = self.board.fault_flag().read();
        self.board.fault_flag().write(false);
        let charger_reset = reset_cause == ResetCause::Watchdog && flag;

        // Calibration blocks for longer than any sensible timeout
        self.board.watchdog().stop();

        self.safety.update_config(self.config.validate());
        let calibration = match self.safety.fault() {
            Some(kind) => {
                self.apply(Event::FaultDetected(kind));
                None
            }
            None => self.calibrate(),
        };

        if !self.mode.is_fault() {
            self.gain.init(self.board.amplifier());
            self.board.watchdog().start(self.config.watchdog.timeout_ms);
            self.apply(if charger_reset {
                Event::ChargerResetRecovered
            } else {
                Event::BootComplete
            });
        }

        BootReport {
            reset_cause,
            charger_reset,
            calibration,
            mode: self.mode,
        }
    }

    /// Run one loop iteration
    ///
    /// Returns the low-power state to wait in until the next interrupt.
    pub fn poll(&mut self) -> SleepMode {
        self.board.watchdog().feed();

        if self.mode.watches_charger() && self.shared.flags.take_charger_inserted() {
            self.on_charger_inserted();
            return self.mode.sleep_mode();
        }

        let event = match self.mode {
            Mode::Standby => self.poll_standby(),
            Mode::Recording => self.poll_recording(),
            Mode::DisplayCalibration => self.poll_display(),
            Mode::Charging => self.poll_charging(),
            Mode::Init | Mode::Fault(_) => None,
        };
        if let Some(event) = event {
            self.apply(event);
        }

        self.mode.sleep_mode()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn gain(&self) -> &GainController {
        &self.gain
    }

    pub fn touch(&self) -> &TouchDebouncer {
        &self.touch
    }

    pub fn safety(&self) -> &SafetyMonitor {
        &self.safety
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    fn calibrate(&mut self) -> Option<CalibrationOutcome> {
        match OscillatorCalibrator::new(self.config.calibration.clone()) {
            Ok(calibrator) => Some(calibrator.run(self.board.oscillator())),
            Err(error) => {
                self.fail(error);
                None
            }
        }
    }

    fn poll_standby(&mut self) -> Option<Event> {
        if !self.shared.flags.take_touch_due() {
            return None;
        }
        self.measure_touch()
    }

    fn poll_recording(&mut self) -> Option<Event> {
        let shared = self.shared;

        if shared.flags.take_sample_due() {
            self.board.sampler().trigger_conversion();
        }

        self.safety.record_overruns(shared.samples.take_overruns());
        while let Some(sample) = shared.samples.consume() {
            self.board.watchdog().feed();
            if self.gain.on_sample(sample, self.board.amplifier()) {
                return Some(Event::GainChanged);
            }
        }

        if !shared.flags.take_touch_due() {
            return None;
        }
        self.mode_ticks += 1;
        if self.mode_ticks >= self.config.timing.recording_ticks() {
            return Some(Event::RecordingElapsed);
        }
        self.measure_touch()
    }

    fn poll_display(&mut self) -> Option<Event> {
        if !self.shared.flags.take_touch_due() {
            return None;
        }
        self.mode_ticks += 1;
        (self.mode_ticks >= self.config.timing.display_ticks()).then_some(Event::DisplayElapsed)
    }

    fn poll_charging(&mut self) -> Option<Event> {
        (!self.board.charger_present()).then_some(Event::ChargerRemoved)
    }

    fn measure_touch(&mut self) -> Option<Event> {
        let now_ms = self.shared.flags.touch_time_ms();
        let touched = self.board.touch_sensor().measure(now_ms);

        match self.touch.on_measurement(touched)? {
            TouchEvent::PressStarted => {
                self.board.indicate(Indication::KeyPress, true);
                None
            }
            TouchEvent::PressConfirmed => {
                self.board.indicate(Indication::KeyPress, false);
                self.board.indicate(Indication::KeyHold, true);
                None
            }
            TouchEvent::PressCancelled => {
                self.board.indicate(Indication::KeyPress, false);
                None
            }
            TouchEvent::Discarded => {
                self.board.indicate(Indication::KeyHold, false);
                None
            }
            TouchEvent::Released => {
                self.board.indicate(Indication::KeyHold, false);
                Some(Event::GestureReleased)
            }
        }
    }

    fn on_charger_inserted(&mut self) {
        self.board.fault_flag().write(true);
        self.board.watchdog().force_reset();

        // Still running: the reset is simulated. Carry on as the boot path
        // would have, without leaving the flag behind for a later reset.
        self.board.fault_flag().write(false);
        self.apply(Event::ChargerConnected);
    }

    fn fail(&mut self, error: ConfigError) {
        let kind = FaultKind::Config(error);
        self.safety.report_fault(kind);
        self.apply(Event::FaultDetected(kind));
    }

    fn apply(&mut self, event: Event) {
        let next = self.mode.transition(event);
        if next == self.mode {
            return;
        }

        let previous = self.mode;
        self.exit(previous);
        self.mode = next;

        if let Err(error) = self.enter(next) {
            let kind = FaultKind::Config(error);
            self.safety.report_fault(kind);
            self.exit(next);
            self.mode = Mode::Fault(kind);
            // Entering Fault cannot fail
            let _ = self.enter(self.mode);
        }
    }

    fn enter(&mut self, mode: Mode) -> Result<(), ConfigError> {
        self.shared.flags.arm_charger_watch(mode.watches_charger());

        match mode {
            Mode::Init => {}
            Mode::Standby => {
                let window = self.config.timing.standby_window()?;
                self.board.sampler().stop();
                self.gain.set_sleep(self.board.amplifier(), true);
                self.board.accelerometer().set_sleep(true);
                self.listen_for_gestures(window);
            }
            Mode::Recording => {
                let window = self.config.timing.recording_window()?;
                self.shared.samples.clear();
                self.gain.reset();
                self.gain.set_sleep(self.board.amplifier(), false);
                self.board.accelerometer().set_sleep(false);
                self.listen_for_gestures(window);
                self.mode_ticks = 0;
                self.board.indicate(Indication::Recording, true);
                self.board.sampler().start();
            }
            Mode::DisplayCalibration => {
                self.board.set_scale_switch(true);
                self.gain.enter_display_scale(self.board.amplifier());
                self.board.scale_signal().start();
                self.mode_ticks = 0;
                self.board.indicate(Indication::DisplayScale, true);
            }
            Mode::Charging => {
                self.board.sampler().stop();
                self.gain.set_sleep(self.board.amplifier(), true);
                self.board.accelerometer().set_sleep(true);
                self.board.indicate(Indication::Charging, true);
            }
            Mode::Fault(_) => {
                self.board.sampler().stop();
                self.board.accelerometer().set_sleep(true);
                self.board.indicate(Indication::Fatal, true);
            }
        }
        Ok(())
    }

    fn exit(&mut self, mode: Mode) {
        match mode {
            Mode::Recording => {
                self.board.sampler().stop();
                self.board.indicate(Indication::Recording, false);
            }
            Mode::DisplayCalibration => {
                self.board.scale_signal().stop();
                self.gain.exit_display_scale(self.board.amplifier());
                self.board.set_scale_switch(false);
                self.board.indicate(Indication::DisplayScale, false);
            }
            Mode::Charging => self.board.indicate(Indication::Charging, false),
            Mode::Init | Mode::Standby | Mode::Fault(_) => {}
        }

        if mode.accepts_gestures() {
            self.board.indicate(Indication::KeyPress, false);
            self.board.indicate(Indication::KeyHold, false);
        }
    }

    fn listen_for_gestures(&mut self, window: HoldWindow) {
        self.touch.init(window);
        self.board.touch_sensor().reset();
        self.shared.flags.reset_touch_time();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GainConfig, TimingConfig};
    use crate::gain::GainPhase;
    use crate::traits::{Amplifier, Gain, InputChannel, Oscillator};

    #[derive(Default)]
    struct MockAmp {
        gain: Option<Gain>,
        channel: Option<InputChannel>,
        sleeping: bool,
        gain_commands: usize,
        gain_writes: usize,
    }

    impl Amplifier for MockAmp {
        fn set_gain(&mut self, gain: Gain) {
            self.gain_commands += 1;
            if self.gain != Some(gain) {
                self.gain = Some(gain);
                self.gain_writes += 1;
            }
        }

        fn set_channel(&mut self, channel: InputChannel) {
            self.channel = Some(channel);
        }

        fn sleep(&mut self, sleep: bool) {
            self.sleeping = sleep;
        }
    }

    #[derive(Default)]
    struct MockTouch {
        touched: bool,
        resets: usize,
        last_now_ms: u16,
    }

    impl TouchSensor for MockTouch {
        fn reset(&mut self) {
            self.resets += 1;
        }

        fn measure(&mut self, now_ms: u16) -> bool {
            self.last_now_ms = now_ms;
            self.touched
        }
    }

    #[derive(Default)]
    struct MockSampler {
        running: bool,
        conversions: usize,
    }

    impl SampleSource for MockSampler {
        fn start(&mut self) {
            self.running = true;
        }

        fn stop(&mut self) {
            self.running = false;
        }

        fn trigger_conversion(&mut self) {
            self.conversions += 1;
        }
    }

    /// count = 3000 + 10 * trim, best trim 49 in either range
    #[derive(Default)]
    struct MockOscillator {
        trim: u8,
    }

    impl Oscillator for MockOscillator {
        fn set_trim(&mut self, trim: u8) {
            self.trim = trim;
        }

        fn count_reference_window(&mut self, _reference_ticks: u16) -> u32 {
            3000 + 10 * u32::from(self.trim & 0x7F)
        }
    }

    #[derive(Default)]
    struct MockScale {
        running: bool,
        starts: usize,
    }

    impl ScaleSignal for MockScale {
        fn start(&mut self) {
            self.running = true;
            self.starts += 1;
        }

        fn stop(&mut self) {
            self.running = false;
        }
    }

    /// Starts awake so boot without a Standby entry would show up
    struct MockAccelerometer {
        sleeping: bool,
    }

    impl Accelerometer for MockAccelerometer {
        fn set_sleep(&mut self, sleep: bool) {
            self.sleeping = sleep;
        }
    }

    struct MockWatchdog {
        cause: ResetCause,
        timeout_ms: Option<u32>,
        feeds: usize,
        forced_resets: usize,
    }

    impl Watchdog for MockWatchdog {
        fn start(&mut self, timeout_ms: u32) {
            self.timeout_ms = Some(timeout_ms);
        }

        fn stop(&mut self) {
            self.timeout_ms = None;
        }

        fn feed(&mut self) {
            self.feeds += 1;
        }

        fn reset_cause(&self) -> ResetCause {
            self.cause
        }

        fn force_reset(&mut self) {
            self.forced_resets += 1;
        }
    }

    #[derive(Default)]
    struct MockFlag {
        value: bool,
        history: heapless::Vec<bool, 8>,
    }

    impl PersistentFlag for MockFlag {
        fn read(&mut self) -> bool {
            self.value
        }

        fn write(&mut self, value: bool) {
            self.value = value;
            let _ = self.history.push(value);
        }
    }

    struct MockBoard {
        amp: MockAmp,
        touch: MockTouch,
        sampler: MockSampler,
        oscillator: MockOscillator,
        scale: MockScale,
        accelerometer: MockAccelerometer,
        watchdog: MockWatchdog,
        flag: MockFlag,
        charger: bool,
        scale_switch: bool,
        indications: [bool; 6],
    }

    impl MockBoard {
        fn new(cause: ResetCause, flag: bool) -> Self {
            Self {
                amp: MockAmp::default(),
                touch: MockTouch::default(),
                sampler: MockSampler::default(),
                oscillator: MockOscillator::default(),
                scale: MockScale::default(),
                accelerometer: MockAccelerometer { sleeping: false },
                watchdog: MockWatchdog {
                    cause,
                    timeout_ms: None,
                    feeds: 0,
                    forced_resets: 0,
                },
                flag: MockFlag {
                    value: flag,
                    history: heapless::Vec::new(),
                },
                charger: false,
                scale_switch: false,
                indications: [false; 6],
            }
        }

        fn shows(&self, indication: Indication) -> bool {
            self.indications[indication as usize]
        }

        fn dark(&self) -> bool {
            self.indications.iter().all(|shown| !shown)
        }
    }

    impl Board for MockBoard {
        type Amplifier = MockAmp;
        type TouchSensor = MockTouch;
        type Sampler = MockSampler;
        type Oscillator = MockOscillator;
        type ScaleSignal = MockScale;
        type Accelerometer = MockAccelerometer;
        type Watchdog = MockWatchdog;
        type FaultFlag = MockFlag;

        fn amplifier(&mut self) -> &mut MockAmp {
            &mut self.amp
        }

        fn touch_sensor(&mut self) -> &mut MockTouch {
            &mut self.touch
        }

        fn sampler(&mut self) -> &mut MockSampler {
            &mut self.sampler
        }

        fn oscillator(&mut self) -> &mut MockOscillator {
            &mut self.oscillator
        }

        fn scale_signal(&mut self) -> &mut MockScale {
            &mut self.scale
        }

        fn accelerometer(&mut self) -> &mut MockAccelerometer {
            &mut self.accelerometer
        }

        fn watchdog(&mut self) -> &mut MockWatchdog {
            &mut self.watchdog
        }

        fn fault_flag(&mut self) -> &mut MockFlag {
            &mut self.flag
        }

        fn charger_present(&mut self) -> bool {
            self.charger
        }

        fn set_scale_switch(&mut self, closed: bool) {
            self.scale_switch = closed;
        }

        fn indicate(&mut self, indication: Indication, active: bool) {
            self.indications[indication as usize] = active;
        }
    }

    fn booted(shared: &Shared, config: RecorderConfig) -> Recorder<'_, MockBoard> {
        let mut recorder = Recorder::new(MockBoard::new(ResetCause::PowerOn, false), shared, config);
        recorder.boot();
        recorder
    }

    /// One touch tick as the tick interrupt would deliver it, then a poll
    fn tick(recorder: &mut Recorder<'_, MockBoard>, shared: &Shared, touched: bool) -> Mode {
        recorder.board_mut().touch.touched = touched;
        let charger = recorder.board().charger;
        shared.flags.on_touch_tick(100, charger);
        recorder.poll();
        recorder.mode()
    }

    /// Hold for `ticks` ticks, then release
    fn gesture(recorder: &mut Recorder<'_, MockBoard>, shared: &Shared, ticks: u16) -> Mode {
        for _ in 0..ticks {
            tick(recorder, shared, true);
        }
        tick(recorder, shared, false)
    }

    /// Feed alternating samples in chunks the ring can hold
    fn stream(recorder: &mut Recorder<'_, MockBoard>, shared: &Shared, count: usize, low: u8, high: u8) {
        let mut produced = 0;
        while produced < count {
            let chunk = (count - produced).min(200);
            for i in produced..produced + chunk {
                shared.samples.produce(if i % 2 == 0 { low } else { high });
            }
            produced += chunk;
            recorder.poll();
        }
    }

    fn recording(shared: &Shared, config: RecorderConfig) -> Recorder<'_, MockBoard> {
        let mut recorder = booted(shared, config);
        gesture(&mut recorder, shared, 50);
        assert_eq!(recorder.mode(), Mode::Recording);
        recorder
    }

    #[test]
    fn test_boot_to_standby() {
        let shared = Shared::new();
        let mut recorder = Recorder::new(
            MockBoard::new(ResetCause::PowerOn, false),
            &shared,
            RecorderConfig::default(),
        );
        let report = recorder.boot();

        assert_eq!(report.mode, Mode::Standby);
        assert!(!report.charger_reset);
        let calibration = report.calibration.unwrap();
        assert_eq!(calibration.trim, 49);

        let board = recorder.board();
        assert_eq!(board.oscillator.trim, 49);
        assert_eq!(board.watchdog.timeout_ms, Some(2000));
        assert_eq!(board.amp.channel, Some(InputChannel::Ch1));
        assert_eq!(board.amp.gain, Some(Gain::X8));
        assert!(board.amp.sleeping);
        assert!(!board.sampler.running);
        assert!(board.accelerometer.sleeping);
        assert!(board.dark());
        assert!(shared.flags.charger_watch_armed());
    }

    #[test]
    fn test_boot_after_charger_reset() {
        let shared = Shared::new();
        let mut recorder = Recorder::new(
            MockBoard::new(ResetCause::Watchdog, true),
            &shared,
            RecorderConfig::default(),
        );
        let report = recorder.boot();

        assert!(report.charger_reset);
        assert_eq!(report.mode, Mode::Charging);
        assert!(!recorder.board().flag.value);
        assert!(recorder.board().shows(Indication::Charging));
        assert!(!shared.flags.charger_watch_armed());
    }

    #[test]
    fn test_flag_needs_watchdog_reset() {
        let shared = Shared::new();
        let mut recorder = Recorder::new(
            MockBoard::new(ResetCause::PowerOn, true),
            &shared,
            RecorderConfig::default(),
        );
        assert_eq!(recorder.boot().mode, Mode::Standby);
        // Cleared even though it was not acted upon
        assert!(!recorder.board().flag.value);
    }

    #[test]
    fn test_watchdog_reset_without_flag() {
        let shared = Shared::new();
        let mut recorder = Recorder::new(
            MockBoard::new(ResetCause::Watchdog, false),
            &shared,
            RecorderConfig::default(),
        );
        assert_eq!(recorder.boot().mode, Mode::Standby);
    }

    #[test]
    fn test_invalid_config_latches_fault() {
        let shared = Shared::new();
        let config = RecorderConfig {
            gain: GainConfig {
                window: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut recorder = Recorder::new(MockBoard::new(ResetCause::PowerOn, false), &shared, config);
        let report = recorder.boot();

        let fault = Mode::Fault(FaultKind::Config(ConfigError::WindowTooShort));
        assert_eq!(report.mode, fault);
        assert_eq!(report.calibration, None);
        assert!(recorder.board().shows(Indication::Fatal));
        assert!(recorder.board().accelerometer.sleeping);

        // Frozen, but the watchdog keeps being fed
        let feeds = recorder.board().watchdog.feeds;
        assert_eq!(gesture(&mut recorder, &shared, 50), fault);
        recorder.board_mut().charger = true;
        assert_eq!(tick(&mut recorder, &shared, false), fault);
        assert!(recorder.board().watchdog.feeds > feeds);
        assert_eq!(recorder.board().watchdog.forced_resets, 0);
    }

    #[test]
    fn test_standby_gesture_of_minimum_length_starts_recording() {
        let shared = Shared::new();
        let mut recorder = booted(&shared, RecorderConfig::default());

        for _ in 0..50 {
            assert_eq!(tick(&mut recorder, &shared, true), Mode::Standby);
        }
        assert!(recorder.board().shows(Indication::KeyHold));
        assert_eq!(tick(&mut recorder, &shared, false), Mode::Recording);

        let board = recorder.board();
        assert!(board.sampler.running);
        assert!(!board.amp.sleeping);
        assert!(!board.accelerometer.sleeping);
        assert!(board.shows(Indication::Recording));
        assert!(!board.shows(Indication::KeyHold));
    }

    #[test]
    fn test_short_or_long_standby_gesture_ignored() {
        let shared = Shared::new();
        let mut recorder = booted(&shared, RecorderConfig::default());
        assert_eq!(gesture(&mut recorder, &shared, 49), Mode::Standby);
        assert_eq!(gesture(&mut recorder, &shared, 60), Mode::Standby);
        assert_eq!(gesture(&mut recorder, &shared, 59), Mode::Recording);
    }

    #[test]
    fn test_touch_clock_passed_to_sensor() {
        let shared = Shared::new();
        let mut recorder = booted(&shared, RecorderConfig::default());
        tick(&mut recorder, &shared, false);
        tick(&mut recorder, &shared, false);
        assert_eq!(recorder.board().touch.last_now_ms, 200);
    }

    #[test]
    fn test_recording_gesture_returns_to_standby() {
        let shared = Shared::new();
        let mut recorder = recording(&shared, RecorderConfig::default());
        assert_eq!(gesture(&mut recorder, &shared, 10), Mode::Standby);
        let board = recorder.board();
        assert!(!board.sampler.running);
        assert!(board.amp.sleeping);
        assert!(board.accelerometer.sleeping);
        assert!(board.dark());
    }

    #[test]
    fn test_sample_clock_triggers_conversion() {
        let shared = Shared::new();
        let mut recorder = recording(&shared, RecorderConfig::default());
        shared.flags.signal_sample_due();
        recorder.poll();
        recorder.poll();
        assert_eq!(recorder.board().sampler.conversions, 1);
    }

    #[test]
    fn test_gain_change_shows_scale_then_resumes() {
        let shared = Shared::new();
        let config = RecorderConfig {
            gain: GainConfig {
                initial_stage: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut recorder = recording(&shared, config);

        // Small signal: one window raises the stage
        stream(&mut recorder, &shared, 2500, 120, 125);
        assert_eq!(recorder.mode(), Mode::DisplayCalibration);
        assert_eq!(recorder.gain().stage(), 2);
        assert!(recorder.board().scale_switch);
        assert!(recorder.board().scale.running);
        assert!(!recorder.board().sampler.running);

        for _ in 0..49 {
            assert_eq!(tick(&mut recorder, &shared, false), Mode::DisplayCalibration);
        }
        assert_eq!(tick(&mut recorder, &shared, false), Mode::Recording);
        assert!(!recorder.board().scale_switch);
        assert!(!recorder.board().scale.running);
        assert_eq!(recorder.board().scale.starts, 1);
        assert_eq!(recorder.board().amp.gain, Some(Gain::X4));
        assert!(recorder.board().sampler.running);
        assert_eq!(recorder.gain().sample_count(), 0);
    }

    #[test]
    fn test_recording_duration_elapses() {
        let shared = Shared::new();
        let config = RecorderConfig {
            timing: TimingConfig {
                recording_duration_s: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut recorder = recording(&shared, config);
        for _ in 0..19 {
            assert_eq!(tick(&mut recorder, &shared, false), Mode::Recording);
        }
        assert_eq!(tick(&mut recorder, &shared, false), Mode::DisplayCalibration);
    }

    #[test]
    fn test_charger_preempts_pending_recording_events() {
        let shared = Shared::new();
        let mut recorder = recording(&shared, RecorderConfig::default());
        // Long enough that releasing would be a valid stop gesture
        for _ in 0..10 {
            tick(&mut recorder, &shared, true);
        }
        for _ in 0..100 {
            shared.samples.produce(7);
        }
        shared.flags.signal_sample_due();

        // Gesture release and charger arrive on the same tick
        recorder.board_mut().charger = true;
        recorder.board_mut().touch.touched = false;
        shared.flags.on_touch_tick(100, true);
        recorder.poll();

        assert_eq!(recorder.mode(), Mode::Charging);
        let board = recorder.board();
        assert_eq!(board.watchdog.forced_resets, 1);
        assert_eq!(board.flag.history.as_slice(), &[false, true, false]);
        assert!(!board.sampler.running);
        assert!(board.amp.sleeping);
        assert!(board.accelerometer.sleeping);
        assert!(board.shows(Indication::Charging));
        assert!(!board.shows(Indication::Recording));
    }

    #[test]
    fn test_charging_ends_when_charger_removed() {
        let shared = Shared::new();
        let mut recorder = booted(&shared, RecorderConfig::default());
        recorder.board_mut().charger = true;
        assert_eq!(tick(&mut recorder, &shared, false), Mode::Charging);
        assert_eq!(tick(&mut recorder, &shared, false), Mode::Charging);

        recorder.board_mut().charger = false;
        assert_eq!(tick(&mut recorder, &shared, false), Mode::Standby);
        assert!(shared.flags.charger_watch_armed());
    }

    #[test]
    fn test_large_signal_at_bottom_stage_stays_recording() {
        let shared = Shared::new();
        let config = RecorderConfig {
            gain: GainConfig {
                initial_stage: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut recorder = recording(&shared, config);
        let writes = recorder.board().amp.gain_writes;
        let commands = recorder.board().amp.gain_commands;

        // First window: over threshold, waits for confirmation
        stream(&mut recorder, &shared, 2500, 10, 245);
        assert_eq!(recorder.mode(), Mode::Recording);
        assert_eq!(recorder.gain().phase(), GainPhase::WaitingConfirm);
        assert_eq!(recorder.gain().stage(), 0);

        // Waiting window, then the confirming window
        stream(&mut recorder, &shared, 5000, 10, 245);
        assert_eq!(recorder.mode(), Mode::Recording);
        assert_eq!(recorder.gain().stage(), 0);
        assert_eq!(recorder.board().amp.gain_commands, commands + 1);
        assert_eq!(recorder.board().amp.gain_writes, writes);
    }

    #[test]
    fn test_overruns_reported_not_fatal() {
        let shared = Shared::new();
        let mut recorder = recording(&shared, RecorderConfig::default());
        for _ in 0..300 {
            shared.samples.produce(128);
        }
        recorder.poll();
        assert_eq!(recorder.safety().total_overruns(), 44);
        assert_eq!(recorder.mode(), Mode::Recording);
    }

    #[test]
    fn test_watchdog_fed_every_poll() {
        let shared = Shared::new();
        let mut recorder = booted(&shared, RecorderConfig::default());
        let feeds = recorder.board().watchdog.feeds;
        for _ in 0..5 {
            recorder.poll();
        }
        assert_eq!(recorder.board().watchdog.feeds, feeds + 5);
    }

    #[test]
    fn test_sleep_mode_follows_mode() {
        let shared = Shared::new();
        let mut recorder = booted(&shared, RecorderConfig::default());
        assert_eq!(recorder.poll(), SleepMode::PowerSave);
        gesture(&mut recorder, &shared, 50);
        assert_eq!(recorder.poll(), SleepMode::AdcNoiseReduction);
    }
}
