//! Gain controller
//!
//! Samples are analysed in windows of `window` samples. A window whose
//! peak-to-peak amplitude is at or below the stage's lower threshold
//! raises the stage immediately. A window at or above the upper threshold
//! lowers the stage only after a full waiting window followed by a second
//! over-threshold window, so a single transient never reduces gain.

use super::MAX_STAGE;
use crate::config::GainConfig;
use crate::traits::{Amplifier, Gain};

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GainPhase {
    /// Tracking min/max over the current window
    Collecting,
    /// Sitting out one window after an over-threshold result
    WaitingConfirm,
}

/// Adaptive gain controller
#[derive(Debug, Clone)]
pub struct GainController {
    config: GainConfig,
    stage: u8,
    phase: GainPhase,
    running_min: u8,
    running_max: u8,
    sample_count: u16,
    /// Set when a waiting window has passed since the last over-threshold
    /// result; cleared when a fresh window starts
    confirmed: bool,
}

impl GainController {
    /// Create a controller at the configured initial stage
    ///
    /// The configuration must have passed [`GainConfig::validate`]; an
    /// out-of-range initial stage is clamped to the top of the ladder.
    pub fn new(config: GainConfig) -> Self {
        let stage = config.initial_stage.min(MAX_STAGE);
        Self {
            config,
            stage,
            phase: GainPhase::Collecting,
            running_min: 0,
            running_max: 0,
            sample_count: 0,
            confirmed: false,
        }
    }

    /// Select the electrode input, apply the current stage and wake the
    /// amplifier
    pub fn init<A: Amplifier>(&mut self, amp: &mut A) {
        amp.set_channel(self.config.input);
        amp.set_gain(self.ladder_gain());
        amp.sleep(false);
    }

    /// Start over with a fresh window; the stage is kept
    pub fn reset(&mut self) {
        self.phase = GainPhase::Collecting;
        self.restart_window();
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }

    pub fn phase(&self) -> GainPhase {
        self.phase
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Samples counted in the current window (or waiting window)
    pub fn sample_count(&self) -> u16 {
        self.sample_count
    }

    /// Peak-to-peak amplitude of the samples seen so far in this window
    pub fn peak_to_peak(&self) -> u8 {
        self.running_max - self.running_min
    }

    /// Process one sample
    ///
    /// Returns `true` when the stage changed and a new gain was commanded.
    pub fn on_sample<A: Amplifier>(&mut self, sample: u8, amp: &mut A) -> bool {
        match self.phase {
            GainPhase::Collecting => self.collect(sample, amp),
            GainPhase::WaitingConfirm => {
                self.sample_count += 1;
                if self.sample_count >= self.config.window {
                    self.confirmed = true;
                    self.phase = GainPhase::Collecting;
                    self.seed(sample);
                }
                false
            }
        }
    }

    /// Push the calibration-display gain for the current stage
    pub fn enter_display_scale<A: Amplifier>(&mut self, amp: &mut A) {
        amp.set_gain(self.config.display_gains[usize::from(self.stage)]);
    }

    /// Restore the ladder gain for the current stage
    pub fn exit_display_scale<A: Amplifier>(&mut self, amp: &mut A) {
        amp.set_gain(self.ladder_gain());
    }

    /// Put the amplifier into or out of shutdown
    pub fn set_sleep<A: Amplifier>(&mut self, amp: &mut A, sleep: bool) {
        amp.sleep(sleep);
    }

    fn collect<A: Amplifier>(&mut self, sample: u8, amp: &mut A) -> bool {
        if self.sample_count == 0 {
            self.confirmed = false;
            self.seed(sample);
            return false;
        }

        if sample > self.running_max {
            self.running_max = sample;
        } else if sample < self.running_min {
            self.running_min = sample;
        }
        self.sample_count += 1;

        if self.sample_count < self.config.window {
            return false;
        }
        self.evaluate(amp)
    }

    fn evaluate<A: Amplifier>(&mut self, amp: &mut A) -> bool {
        let peak_to_peak = self.peak_to_peak();
        let band = self.config.thresholds[usize::from(self.stage)];

        if peak_to_peak <= band.lower && self.stage < MAX_STAGE {
            self.stage += 1;
            amp.set_gain(self.ladder_gain());
            self.restart_window();
            return true;
        }

        if peak_to_peak >= band.upper {
            if !self.confirmed {
                self.phase = GainPhase::WaitingConfirm;
                self.sample_count = 0;
                return false;
            }
            if self.stage > 0 {
                self.stage -= 1;
                amp.set_gain(self.ladder_gain());
                self.restart_window();
                return true;
            }
            // Already at the bottom of the ladder; the amplifier driver
            // drops the repeated setting.
            amp.set_gain(self.ladder_gain());
        }

        self.restart_window();
        false
    }

    fn seed(&mut self, sample: u8) {
        self.running_min = sample;
        self.running_max = sample;
        self.sample_count = 1;
    }

    fn restart_window(&mut self) {
        self.sample_count = 0;
        self.confirmed = false;
    }

    fn ladder_gain(&self) -> Gain {
        self.config.ladder[usize::from(self.stage)]
    }
}
