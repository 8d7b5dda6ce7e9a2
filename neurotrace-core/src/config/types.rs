//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::gain::STAGE_COUNT;
use crate::touch::HoldWindow;
use crate::traits::{Gain, InputChannel};

/// Complete recorder configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecorderConfig {
    pub timing: TimingConfig,
    pub gain: GainConfig,
    pub calibration: CalibrationConfig,
    pub watchdog: WatchdogConfig,
}

impl RecorderConfig {
    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.validate()?;
        self.gain.validate()?;
        self.calibration.validate()?;
        if self.watchdog.timeout_ms <= u32::from(self.timing.tick_ms) {
            return Err(ConfigError::WatchdogTooShort);
        }
        Ok(())
    }
}

/// Touch tick, gesture windows and mode durations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Touch measurement period (ms); also the mode timer resolution
    pub tick_ms: u16,
    /// Standby gesture length to start recording (ms)
    pub standby_touch_min_ms: u32,
    pub standby_touch_max_ms: u32,
    /// Recording gesture length to stop recording (ms)
    pub recording_touch_min_ms: u32,
    pub recording_touch_max_ms: u32,
    /// Time in Recording before a scheduled display calibration (s)
    pub recording_duration_s: u32,
    /// Time the calibration scale is shown (s)
    pub display_duration_s: u32,
    /// Bio-signal sample rate (Hz)
    pub sample_rate_hz: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            standby_touch_min_ms: 5000,
            standby_touch_max_ms: 6000,
            recording_touch_min_ms: 1000,
            recording_touch_max_ms: 2000,
            recording_duration_s: 120,
            display_duration_s: 5,
            sample_rate_hz: 2500,
        }
    }
}

impl TimingConfig {
    /// Gesture window that starts a recording
    pub fn standby_window(&self) -> Result<HoldWindow, ConfigError> {
        HoldWindow::from_millis(
            self.standby_touch_min_ms,
            self.standby_touch_max_ms,
            self.tick_ms,
        )
    }

    /// Gesture window that ends a recording
    pub fn recording_window(&self) -> Result<HoldWindow, ConfigError> {
        HoldWindow::from_millis(
            self.recording_touch_min_ms,
            self.recording_touch_max_ms,
            self.tick_ms,
        )
    }

    /// Recording duration in touch ticks
    pub fn recording_ticks(&self) -> u32 {
        self.seconds_to_ticks(self.recording_duration_s)
    }

    /// Display duration in touch ticks
    pub fn display_ticks(&self) -> u32 {
        self.seconds_to_ticks(self.display_duration_s)
    }

    fn seconds_to_ticks(&self, seconds: u32) -> u32 {
        if self.tick_ms == 0 {
            return 0;
        }
        seconds.saturating_mul(1000) / u32::from(self.tick_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        self.standby_window()?;
        self.recording_window()?;
        if self.recording_ticks() == 0 || self.display_ticks() == 0 || self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        Ok(())
    }
}

/// Peak-to-peak band for one gain stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StageThresholds {
    /// At or above: signal too large, step down after confirmation
    pub upper: u8,
    /// At or below: signal too small, step up
    pub lower: u8,
}

impl StageThresholds {
    pub const fn new(upper: u8, lower: u8) -> Self {
        Self { upper, lower }
    }
}

impl Default for StageThresholds {
    fn default() -> Self {
        // 35% and 17% of the 8-bit sample range
        Self::new(89, 44)
    }
}

/// Adaptive gain configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GainConfig {
    /// Amplifier gain per stage, lowest amplification first
    pub ladder: [Gain; STAGE_COUNT],
    /// Gain used while the calibration scale is shown, per stage
    pub display_gains: [Gain; STAGE_COUNT],
    /// Target band per stage
    pub thresholds: [StageThresholds; STAGE_COUNT],
    /// Samples per analysis window
    pub window: u16,
    /// Stage selected at boot
    pub initial_stage: u8,
    /// Amplifier input carrying the electrode signal
    pub input: InputChannel,
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            ladder: [Gain::X1, Gain::X2, Gain::X4, Gain::X8],
            display_gains: [Gain::X1, Gain::X2, Gain::X4, Gain::X8],
            thresholds: [StageThresholds::default(); STAGE_COUNT],
            window: 2500,
            initial_stage: (STAGE_COUNT - 1) as u8,
            input: InputChannel::Ch1,
        }
    }
}

impl GainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if usize::from(self.initial_stage) >= STAGE_COUNT {
            return Err(ConfigError::InvalidStage);
        }
        if self.window < 2 {
            return Err(ConfigError::WindowTooShort);
        }
        for (stage, band) in self.thresholds.iter().enumerate() {
            if band.lower >= band.upper {
                return Err(ConfigError::ThresholdOrder { stage: stage as u8 });
            }
        }
        Ok(())
    }
}

/// Most rounds [`CalibrationStrategy::Simple`] may take, eight sweeps of a
/// 7-bit range
pub const MAX_SIMPLE_ROUNDS: u16 = 1024;

/// Oscillator search strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CalibrationStrategy {
    /// Step the trim by one toward the target for a fixed number of rounds.
    /// Searches only the first trim range.
    Simple,
    /// Binary search only
    BinarySearch,
    /// Binary search, then up to three neighbours in the last direction
    #[default]
    BinaryWithNeighbors,
}

/// Layout of the trim register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrimLayout {
    /// One contiguous 7-bit range (0x00..=0x7F)
    Single,
    /// Two disjoint 7-bit ranges (0x00..=0x7F and 0x80..=0xFF)
    #[default]
    Split,
}

/// Oscillator calibration configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationConfig {
    pub strategy: CalibrationStrategy,
    pub layout: TrimLayout,
    /// Desired oscillator frequency (Hz)
    pub target_hz: u32,
    /// External reference frequency (Hz)
    pub reference_hz: u32,
    /// Reference ticks per measurement
    pub reference_ticks: u16,
    /// CPU cycles per iteration of the counting loop
    pub loop_cycles: u32,
    /// Rounds for [`CalibrationStrategy::Simple`], `1..=MAX_SIMPLE_ROUNDS`
    pub simple_rounds: u16,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            strategy: CalibrationStrategy::default(),
            layout: TrimLayout::default(),
            target_hz: 8_000_000,
            reference_hz: 32_768,
            reference_ticks: 100,
            loop_cycles: 7,
            simple_rounds: 128,
        }
    }
}

impl CalibrationConfig {
    /// Loop count a perfectly trimmed oscillator reaches per measurement
    pub fn target_count(&self) -> Result<u32, ConfigError> {
        let denominator = u64::from(self.reference_hz) * u64::from(self.loop_cycles);
        if denominator == 0 || self.reference_ticks == 0 {
            return Err(ConfigError::ZeroReference);
        }
        let count = u64::from(self.reference_ticks) * u64::from(self.target_hz) / denominator;
        u32::try_from(count).map_err(|_| ConfigError::ZeroReference)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_count()? == 0 {
            return Err(ConfigError::ZeroReference);
        }
        if !(1..=MAX_SIMPLE_ROUNDS).contains(&self.simple_rounds) {
            return Err(ConfigError::SimpleRounds);
        }
        Ok(())
    }
}

/// Watchdog configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WatchdogConfig {
    /// Timeout once the loop is running (ms)
    pub timeout_ms: u32,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self { timeout_ms: 2000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(RecorderConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_windows_in_ticks() {
        let timing = TimingConfig::default();
        let standby = timing.standby_window().unwrap();
        assert_eq!((standby.min_ticks(), standby.max_ticks()), (50, 60));
        let recording = timing.recording_window().unwrap();
        assert_eq!((recording.min_ticks(), recording.max_ticks()), (10, 20));
        assert_eq!(timing.recording_ticks(), 1200);
        assert_eq!(timing.display_ticks(), 50);
    }

    #[test]
    fn test_default_target_count() {
        // 100 * 8 MHz / (32768 Hz * 7 cycles)
        assert_eq!(CalibrationConfig::default().target_count(), Ok(3487));
    }

    #[test]
    fn test_zero_reference_rejected() {
        let config = CalibrationConfig {
            reference_hz: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroReference));
    }

    #[test]
    fn test_simple_rounds_bounded() {
        for rounds in [0, MAX_SIMPLE_ROUNDS + 1, 40_000] {
            let config = CalibrationConfig {
                strategy: CalibrationStrategy::Simple,
                simple_rounds: rounds,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::SimpleRounds));
        }
        for rounds in [1, MAX_SIMPLE_ROUNDS] {
            let config = CalibrationConfig {
                simple_rounds: rounds,
                ..Default::default()
            };
            assert_eq!(config.validate(), Ok(()));
        }
    }

    #[test]
    fn test_threshold_order_rejected() {
        let mut config = GainConfig::default();
        config.thresholds[2] = StageThresholds::new(40, 40);
        assert_eq!(config.validate(), Err(ConfigError::ThresholdOrder { stage: 2 }));
    }

    #[test]
    fn test_initial_stage_out_of_ladder() {
        let config = GainConfig {
            initial_stage: 4,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidStage));
    }

    #[test]
    fn test_inverted_gesture_window_rejected() {
        let config = TimingConfig {
            recording_touch_min_ms: 2000,
            recording_touch_max_ms: 1000,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::HoldWindowOrder));
    }

    #[test]
    fn test_watchdog_must_cover_tick() {
        let config = RecorderConfig {
            watchdog: WatchdogConfig { timeout_ms: 100 },
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WatchdogTooShort));
    }
}
