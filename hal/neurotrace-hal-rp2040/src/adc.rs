//! ADC sample source
//!
//! RP2040 has a single 12-bit ADC with 5 channels (GPIO26-29 and the
//! internal temperature sensor). The electrode amplifier output is wired
//! to one of the GPIO channels and converted on demand, once per sample
//! clock tick.

use embassy_rp::adc::{Adc, Blocking, Channel};
use neurotrace_core::channel::Shared;
use neurotrace_core::traits::SampleSource;

/// Reduce a 12-bit conversion to the 8-bit sample width
pub const fn scale(raw: u16) -> u8 {
    ((raw >> 4) & 0xFF) as u8
}

/// Blocking ADC sampler
pub struct AdcSampler<'d> {
    adc: Adc<'d, Blocking>,
    channel: Channel<'d>,
    shared: &'d Shared,
    running: bool,
    errors: u32,
}

impl<'d> AdcSampler<'d> {
    pub fn new(adc: Adc<'d, Blocking>, channel: Channel<'d>, shared: &'d Shared) -> Self {
        Self {
            adc,
            channel,
            shared,
            running: false,
            errors: 0,
        }
    }
}

impl SampleSource for AdcSampler<'_> {
    fn start(&mut self) {
        self.running = true;
        self.shared.flags.run_sample_clock(true);
    }

    fn stop(&mut self) {
        self.shared.flags.run_sample_clock(false);
        self.running = false;
    }

    fn trigger_conversion(&mut self) {
        if !self.running {
            return;
        }
        match self.adc.blocking_read(&mut self.channel) {
            Ok(raw) => {
                self.shared.samples.produce(scale(raw));
            }
            Err(_) => {
                self.errors = self.errors.saturating_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("ADC conversion failed ({} total)", self.errors);
            }
        }
    }
}
