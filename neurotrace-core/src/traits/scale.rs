//! Calibration scale signal

/// Reference sine shown while the scale switch is closed
///
/// The signal is generated outside the loop (timer interrupt or clock
/// task); the loop only switches it on and off.
pub trait ScaleSignal {
    fn start(&mut self);

    /// Stop the signal and park the output at its lowest level
    fn stop(&mut self);
}
