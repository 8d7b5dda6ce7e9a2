//! Interrupt-to-loop handoff
//!
//! Everything interrupt handlers share with the recorder loop goes through
//! [`Shared`]: the sample ring and the event flags. A board declares one
//! `static` instance and hands references to both sides.

pub mod flags;
pub mod samples;

pub use flags::EventFlags;
pub use samples::{Produced, SampleChannel, CAPACITY};

/// State shared between interrupt producers and the loop
pub struct Shared {
    pub samples: SampleChannel,
    pub flags: EventFlags,
}

impl Shared {
    pub const fn new() -> Self {
        Self {
            samples: SampleChannel::new(),
            flags: EventFlags::new(),
        }
    }
}

impl Default for Shared {
    fn default() -> Self {
        Self::new()
    }
}
