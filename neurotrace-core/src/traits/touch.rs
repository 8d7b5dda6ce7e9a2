//! Touch sensor trait

/// Capacitive touch key
///
/// Measured once per touch tick by the recorder loop.
pub trait TouchSensor {
    /// Restart acquisition (called on every mode that listens for gestures)
    fn reset(&mut self);

    /// Take one measurement and report whether the key is touched
    ///
    /// `now_ms` is the wrapping millisecond clock advanced by the touch
    /// tick; drift compensation inside the sensor uses it.
    fn measure(&mut self, now_ms: u16) -> bool;

    /// Re-acquire the untouched reference level
    fn recalibrate(&mut self) {}
}
