//! Embassy async tasks
//!
//! The clock tasks play the part of interrupt handlers; the recorder task
//! is the cooperative main loop.

pub mod recorder;
pub mod sample_clock;
pub mod scale_signal;
pub mod tick;

pub use recorder::recorder_task;
pub use sample_clock::sample_clock_task;
pub use scale_signal::scale_signal_task;
pub use tick::touch_tick_task;
