//! Single capacitive touch key
//!
//! Turns raw pad counts into a touched/untouched decision:
//!
//! - The untouched reference (baseline) is the mean of the first few
//!   acquisitions after creation or [`TouchSensor::recalibrate`].
//! - A reading at least `threshold` counts above the baseline starts a
//!   detection, which has to survive `detect_integration` back-to-back
//!   acquisitions before the key reports touched.
//! - A touched key releases once the reading drops below the threshold
//!   minus the hysteresis.
//! - While untouched, the baseline follows slow environmental drift by one
//!   count per `drift_interval_ms`.

use neurotrace_core::traits::TouchSensor;
use neurotrace_hal::CapacitiveChannel;

/// Release hysteresis as a fraction of the detect threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hysteresis {
    Percent50,
    Percent25,
    Percent12_5,
    Percent6_25,
}

impl Hysteresis {
    /// Hysteresis in counts for the given threshold
    pub const fn of(self, threshold: u16) -> u16 {
        let shift = match self {
            Hysteresis::Percent50 => 1,
            Hysteresis::Percent25 => 2,
            Hysteresis::Percent12_5 => 3,
            Hysteresis::Percent6_25 => 4,
        };
        threshold >> shift
    }
}

/// Touch key tuning
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyConfig {
    /// Counts above baseline that count as a touch
    pub threshold: u16,
    pub hysteresis: Hysteresis,
    /// Consecutive over-threshold acquisitions needed to report a touch
    pub detect_integration: u8,
    /// Acquisitions averaged into a new baseline
    pub calibration_samples: u8,
    /// Minimum time between baseline drift steps
    pub drift_interval_ms: u16,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            threshold: 75,
            hysteresis: Hysteresis::Percent6_25,
            detect_integration: 4,
            calibration_samples: 4,
            drift_interval_ms: 1000,
        }
    }
}

/// Capacitive touch key over a raw pad channel
pub struct CapacitiveKey<C> {
    channel: C,
    config: KeyConfig,
    baseline: u16,
    /// Acquisitions still needed for the baseline
    calibrating: u8,
    calibration_sum: u32,
    touched: bool,
    last_drift_ms: u16,
}

impl<C: CapacitiveChannel> CapacitiveKey<C> {
    /// Create a key; the first measurements acquire the baseline
    pub fn new(channel: C, config: KeyConfig) -> Self {
        let mut key = Self {
            channel,
            config,
            baseline: 0,
            calibrating: 0,
            calibration_sum: 0,
            touched: false,
            last_drift_ms: 0,
        };
        key.start_calibration();
        key
    }

    /// Untouched reference level
    pub fn baseline(&self) -> u16 {
        self.baseline
    }

    pub fn is_calibrating(&self) -> bool {
        self.calibrating > 0
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn config(&self) -> &KeyConfig {
        &self.config
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    fn start_calibration(&mut self) {
        self.calibrating = self.config.calibration_samples.max(1);
        self.calibration_sum = 0;
        self.touched = false;
    }

    fn delta(&self, reading: u16) -> u16 {
        reading.saturating_sub(self.baseline)
    }

    /// Re-acquire until the detection either holds for the full
    /// integration count or falls away
    fn confirm_detection(&mut self) -> bool {
        for _ in 1..self.config.detect_integration.max(1) {
            let reading = self.channel.acquire();
            if self.delta(reading) < self.config.threshold {
                return false;
            }
        }
        true
    }

    fn drift(&mut self, reading: u16, now_ms: u16) {
        if now_ms.wrapping_sub(self.last_drift_ms) < self.config.drift_interval_ms {
            return;
        }
        self.last_drift_ms = now_ms;
        if reading > self.baseline {
            self.baseline += 1;
        } else if reading < self.baseline {
            self.baseline -= 1;
        }
    }
}

impl<C: CapacitiveChannel> TouchSensor for CapacitiveKey<C> {
    fn reset(&mut self) {
        self.touched = false;
        self.last_drift_ms = 0;
    }

    fn measure(&mut self, now_ms: u16) -> bool {
        let reading = self.channel.acquire();

        if self.calibrating > 0 {
            self.calibration_sum += u32::from(reading);
            self.calibrating -= 1;
            if self.calibrating == 0 {
                let samples = u32::from(self.config.calibration_samples.max(1));
                self.baseline = (self.calibration_sum / samples) as u16;
                self.last_drift_ms = now_ms;
            }
            return false;
        }

        let delta = self.delta(reading);
        if self.touched {
            let release = self
                .config
                .threshold
                .saturating_sub(self.config.hysteresis.of(self.config.threshold));
            if delta < release {
                self.touched = false;
                self.last_drift_ms = now_ms;
            }
        } else if delta >= self.config.threshold {
            self.touched = self.confirm_detection();
        } else {
            self.drift(reading, now_ms);
        }

        self.touched
    }

    fn recalibrate(&mut self) {
        self.start_calibration();
    }
}
