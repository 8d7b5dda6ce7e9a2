//! Capacitive sensing abstraction

/// Raw acquisition from a single self-capacitance pad
///
/// Implementations charge the pad and time its discharge (or use a
/// dedicated touch peripheral). Larger values mean more capacitance, so a
/// finger on the pad raises the reading above the untouched baseline.
pub trait CapacitiveChannel {
    /// Run one acquisition burst and return the raw count
    fn acquire(&mut self) -> u16;
}
