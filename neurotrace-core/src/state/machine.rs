//! Mode machine definition
//!
//! Every peripheral the recorder powers is a function of the current mode.

use super::events::Event;
use crate::config::ConfigError;

/// Recorder modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Reset cause check, oscillator calibration, amplifier setup
    Init,
    /// Waiting for the start gesture; amplifier and converter off
    Standby,
    /// Sampling with adaptive gain
    Recording,
    /// Calibration scale routed to the amplifier for a fixed time
    DisplayCalibration,
    /// Charger connected; everything off until it is removed
    Charging,
    /// Fault latched; nothing changes until reset
    Fault(FaultKind),
}

/// Kinds of unrecoverable fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// Configuration rejected at boot or mode entry
    Config(ConfigError),
}

/// Low-power state the loop waits in between events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepMode {
    /// CPU halted, all peripherals and timers running
    Idle,
    /// CPU and digital noise sources off during a conversion
    AdcNoiseReduction,
    /// Only the tick timer running
    PowerSave,
}

impl Mode {
    /// Check if this mode samples the bio-signal
    pub fn is_sampling(&self) -> bool {
        matches!(self, Mode::Recording)
    }

    /// Check if this mode listens for touch gestures
    pub fn accepts_gestures(&self) -> bool {
        matches!(self, Mode::Standby | Mode::Recording)
    }

    /// Check if charger insertion must be watched for
    pub fn watches_charger(&self) -> bool {
        matches!(
            self,
            Mode::Standby | Mode::Recording | Mode::DisplayCalibration
        )
    }

    /// Check if this is the fault mode
    pub fn is_fault(&self) -> bool {
        matches!(self, Mode::Fault(_))
    }

    /// Low-power state to wait in while this mode is active
    pub fn sleep_mode(&self) -> SleepMode {
        match self {
            Mode::Standby => SleepMode::PowerSave,
            Mode::Recording => SleepMode::AdcNoiseReduction,
            _ => SleepMode::Idle,
        }
    }

    /// Process an event and return the next mode
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use Mode::*;

        match (self, event) {
            // Fault absorbs everything
            (Fault(kind), _) => Fault(kind),
            (_, FaultDetected(kind)) => Fault(kind),

            // Init transitions
            (Init, BootComplete) => Standby,
            (Init, ChargerResetRecovered) => Charging,

            // Standby transitions
            (Standby, GestureReleased) => Recording,

            // Recording transitions
            (Recording, GainChanged) => DisplayCalibration,
            (Recording, RecordingElapsed) => DisplayCalibration,
            (Recording, GestureReleased) => Standby,

            // DisplayCalibration transitions
            (DisplayCalibration, DisplayElapsed) => Recording,

            // Charger handling
            (Standby | Recording | DisplayCalibration, ChargerConnected) => Charging,
            (Charging, ChargerRemoved) => Standby,

            // Invalid transitions stay in current mode
            _ => self,
        }
    }
}
