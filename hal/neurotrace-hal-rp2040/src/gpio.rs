//! GPIO wrappers
//!
//! embassy-rp pins implement embedded-hal 1.0, so the adapters from
//! `neurotrace_hal::compat` are all that is needed. These helpers pick the
//! initial level so the mirrored output state is right from the start.

use embassy_rp::gpio::{Input, Level, Output, Pin, Pull};
use embassy_rp::Peri;
use neurotrace_hal::compat;

/// Output pin as seen by drivers and board glue
pub type RpOutput<'d> = compat::Output<Output<'d>>;

/// Input pin as seen by drivers and board glue
pub type RpInput<'d> = compat::Input<Input<'d>>;

/// Configure `pin` as an output driven to `initial`
pub fn output<'d>(pin: Peri<'d, impl Pin>, initial: Level) -> RpOutput<'d> {
    compat::Output::new(Output::new(pin, initial), initial == Level::High)
}

/// Configure `pin` as an input with the given pull
pub fn input<'d>(pin: Peri<'d, impl Pin>, pull: Pull) -> RpInput<'d> {
    compat::Input::new(Input::new(pin, pull))
}
