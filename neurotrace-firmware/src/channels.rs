//! Interrupt-to-loop channels
//!
//! The producer tasks stand in for interrupt handlers: they only touch
//! [`SHARED`] and the flags here, then raise [`WAKE`] so the recorder task
//! runs one loop iteration.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicBool;

use neurotrace_core::channel::Shared;

/// Sample ring and event flags
pub static SHARED: Shared = Shared::new();

/// Wakes the recorder task after a producer raised something
pub static WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Last charger status sampled by the touch tick
pub static CHARGER_PRESENT: AtomicBool = AtomicBool::new(false);
