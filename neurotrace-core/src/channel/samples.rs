//! Sample ring buffer
//!
//! Single producer (sample interrupt) and single consumer (recorder loop).
//! Each operation runs inside one short critical section, so the write
//! position, read position and unread count always change together.
//!
//! Overflow policy: with all 256 slots unread, a new sample replaces the
//! oldest unread one and the overrun counter is incremented. The loop
//! drains the counter with [`SampleChannel::take_overruns`].

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Deque;

/// Ring capacity in samples
pub const CAPACITY: usize = 256;

/// Result of [`SampleChannel::produce`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Produced {
    /// Stored in a free slot
    Stored,
    /// Ring was full; the oldest unread sample was dropped
    Overwrote,
}

struct Ring {
    samples: Deque<u8, CAPACITY>,
    overruns: u32,
}

/// Sample handoff channel
pub struct SampleChannel {
    ring: Mutex<CriticalSectionRawMutex, RefCell<Ring>>,
}

impl SampleChannel {
    pub const fn new() -> Self {
        Self {
            ring: Mutex::new(RefCell::new(Ring {
                samples: Deque::new(),
                overruns: 0,
            })),
        }
    }

    /// Store a sample (interrupt context)
    pub fn produce(&self, sample: u8) -> Produced {
        self.ring.lock(|ring| {
            let mut ring = ring.borrow_mut();
            let produced = if ring.samples.is_full() {
                ring.samples.pop_front();
                ring.overruns = ring.overruns.saturating_add(1);
                Produced::Overwrote
            } else {
                Produced::Stored
            };
            // Cannot fail: a slot was just freed if the ring was full
            let _ = ring.samples.push_back(sample);
            produced
        })
    }

    /// Take the oldest unread sample (loop context)
    pub fn consume(&self) -> Option<u8> {
        self.ring.lock(|ring| ring.borrow_mut().samples.pop_front())
    }

    /// Number of unread samples
    pub fn unread(&self) -> usize {
        self.ring.lock(|ring| ring.borrow().samples.len())
    }

    pub fn is_empty(&self) -> bool {
        self.unread() == 0
    }

    /// Drop all unread samples; the overrun counter is kept
    pub fn clear(&self) {
        self.ring.lock(|ring| ring.borrow_mut().samples.clear());
    }

    /// Overruns since the last call, resetting the counter
    pub fn take_overruns(&self) -> u32 {
        self.ring
            .lock(|ring| core::mem::take(&mut ring.borrow_mut().overruns))
    }
}

impl Default for SampleChannel {
    fn default() -> Self {
        Self::new()
    }
}
