//! Trimmable internal oscillator trait

/// Internal RC oscillator with a trim register and a reference counter
///
/// Used only by the boot calibration, before interrupts are enabled.
pub trait Oscillator {
    /// Apply a trim value and let the oscillator settle
    fn set_trim(&mut self, trim: u8);

    /// Count internal loop iterations while the external reference
    /// clock advances by `reference_ticks`
    ///
    /// Blocking. A faster oscillator yields a larger count.
    fn count_reference_window(&mut self, reference_ticks: u16) -> u32;

    /// Release the reference clock after calibration
    fn finish(&mut self) {}
}
