//! Three-LED status indicator
//!
//! Each [`Indication`] maps onto the red, green and blue LEDs, some steady
//! and some blinking:
//!
//! | Indication   | Red   | Green | Blue  |
//! |--------------|-------|-------|-------|
//! | Recording    |       | on    |       |
//! | DisplayScale | blink | blink |       |
//! | Charging     | on    |       |       |
//! | KeyPress     |       |       | blink |
//! | KeyHold      |       |       | on    |
//! | Fatal        | on (everything else off)  |
//!
//! Active indications combine by OR; with none active (Standby) all LEDs
//! stay dark. Blinking needs [`RgbIndicator::refresh`]
//! to be called periodically; state changes apply immediately.

use neurotrace_core::traits::Indication;
use neurotrace_hal::OutputPin;

/// Blink half-period
pub const BLINK_INTERVAL_MS: u32 = 250;

/// Lit LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lamps {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

/// Set of active indications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActiveSet(u8);

impl ActiveSet {
    const fn bit(indication: Indication) -> u8 {
        1 << (indication as u8)
    }

    pub fn set(&mut self, indication: Indication, active: bool) {
        if active {
            self.0 |= Self::bit(indication);
        } else {
            self.0 &= !Self::bit(indication);
        }
    }

    pub fn contains(self, indication: Indication) -> bool {
        self.0 & Self::bit(indication) != 0
    }

    /// LEDs to light for this set in the given blink phase
    pub fn lamps(self, blink_on: bool) -> Lamps {
        use Indication::*;

        if self.contains(Fatal) {
            return Lamps {
                red: true,
                green: false,
                blue: false,
            };
        }

        let display = self.contains(DisplayScale) && blink_on;
        Lamps {
            red: self.contains(Charging) || display,
            green: self.contains(Recording) || display,
            blue: self.contains(KeyHold) || (self.contains(KeyPress) && blink_on),
        }
    }
}

/// Red/green/blue LED driver
pub struct RgbIndicator<R, G, B> {
    red: R,
    green: G,
    blue: B,
    /// LEDs light when their pin is driven low
    active_low: bool,
    active: ActiveSet,
    blink_on: bool,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> RgbIndicator<R, G, B> {
    /// Take the LED pins and switch everything off
    pub fn new(red: R, green: G, blue: B, active_low: bool) -> Self {
        let mut indicator = Self {
            red,
            green,
            blue,
            active_low,
            active: ActiveSet::default(),
            blink_on: true,
        };
        indicator.apply();
        indicator
    }

    /// Show or clear an indication
    pub fn set(&mut self, indication: Indication, active: bool) {
        self.active.set(indication, active);
        self.apply();
    }

    pub fn active(&self) -> ActiveSet {
        self.active
    }

    /// Advance the blink phase from a millisecond clock
    pub fn refresh(&mut self, now_ms: u32) {
        let blink_on = (now_ms / BLINK_INTERVAL_MS) % 2 == 0;
        if blink_on != self.blink_on {
            self.blink_on = blink_on;
            self.apply();
        }
    }

    /// What the LEDs currently show
    pub fn lamps(&self) -> Lamps {
        self.active.lamps(self.blink_on)
    }

    fn apply(&mut self) {
        let lamps = self.lamps();
        let active_low = self.active_low;
        self.red.set_state(lamps.red != active_low);
        self.green.set_state(lamps.green != active_low);
        self.blue.set_state(lamps.blue != active_low);
    }
}
