//! Events that trigger mode transitions

use super::machine::FaultKind;

/// Events that can trigger mode transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Lifecycle events
    /// Boot finished after a normal reset
    BootComplete,
    /// Boot finished after the reset forced by charger insertion
    ChargerResetRecovered,

    // User events
    /// Touch gesture released inside the mode's hold window
    GestureReleased,

    // Recording events
    /// Gain controller moved to another stage
    GainChanged,
    /// Scheduled recording interval elapsed
    RecordingElapsed,
    /// Calibration scale shown long enough
    DisplayElapsed,

    // Power events
    /// Charger connected outside Charging
    ChargerConnected,
    /// Charger no longer present
    ChargerRemoved,

    /// Unrecoverable fault
    FaultDetected(FaultKind),
}
