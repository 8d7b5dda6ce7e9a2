//! Board trait
//!
//! Bundles every device the recorder loop drives. The recorder owns the
//! board and borrows one device at a time through the accessors.

use neurotrace_hal::{PersistentFlag, Watchdog};

use super::{Accelerometer, Amplifier, Oscillator, SampleSource, ScaleSignal, TouchSensor};

/// Abstract status indications
///
/// How each indication is shown (LED colour, blink pattern) is up to the
/// board. Standby has no indication of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indication {
    Recording,
    DisplayScale,
    Charging,
    /// Touch detected, gesture not yet long enough
    KeyPress,
    /// Gesture long enough; releasing now counts
    KeyHold,
    /// Latched fault, cleared only by reset
    Fatal,
}

/// Recorder board
pub trait Board {
    type Amplifier: Amplifier;
    type TouchSensor: TouchSensor;
    type Sampler: SampleSource;
    type Oscillator: Oscillator;
    type ScaleSignal: ScaleSignal;
    type Accelerometer: Accelerometer;
    type Watchdog: Watchdog;
    type FaultFlag: PersistentFlag;

    fn amplifier(&mut self) -> &mut Self::Amplifier;
    fn touch_sensor(&mut self) -> &mut Self::TouchSensor;
    fn sampler(&mut self) -> &mut Self::Sampler;
    fn oscillator(&mut self) -> &mut Self::Oscillator;
    fn scale_signal(&mut self) -> &mut Self::ScaleSignal;
    fn accelerometer(&mut self) -> &mut Self::Accelerometer;
    fn watchdog(&mut self) -> &mut Self::Watchdog;

    /// Flag that survives the reset forced on charger insertion
    fn fault_flag(&mut self) -> &mut Self::FaultFlag;

    /// Whether a charger is connected and charging
    fn charger_present(&mut self) -> bool;

    /// Route the amplifier input to the scale reference (`true`) or the
    /// electrodes (`false`)
    fn set_scale_switch(&mut self, closed: bool);

    /// Show or clear an indication
    fn indicate(&mut self, indication: Indication, active: bool);
}
