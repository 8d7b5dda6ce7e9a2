//! Sample source trait

/// Bio-signal sample source
///
/// The source delivers 8-bit samples into the shared
/// [`SampleChannel`](crate::channel::SampleChannel) from interrupt context.
pub trait SampleSource {
    /// Power up the converter and arm the sample clock
    fn start(&mut self);

    /// Disarm the sample clock and power the converter down
    fn stop(&mut self);

    /// Run one conversion
    ///
    /// Called by the loop when the sample clock has fired. The conversion
    /// result reaches the sample channel from the source's interrupt
    /// context, or synchronously for blocking converters.
    fn trigger_conversion(&mut self);
}
