//! Adapters from embedded-hal 1.0 to the traits in this crate
//!
//! Chip HALs that already implement embedded-hal (embassy-rp among them)
//! can be handed to the recorder drivers through these wrappers.

use core::cell::RefCell;

use embedded_hal::digital;
use embedded_hal::spi;

use crate::gpio::{InputPin, OutputPin};
use crate::spi::{Frame, SpiBus};

/// Wraps an embedded-hal output pin
#[derive(Debug)]
pub struct Output<P> {
    inner: P,
    driven_high: bool,
}

impl<P: digital::OutputPin> Output<P> {
    /// Wrap `inner`; `initially_high` must match the pin's current level
    pub fn new(inner: P, initially_high: bool) -> Self {
        Self {
            inner,
            driven_high: initially_high,
        }
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: digital::OutputPin> OutputPin for Output<P> {
    fn set_high(&mut self) {
        // GPIO writes are infallible on every chip the recorder targets
        let _ = self.inner.set_high();
        self.driven_high = true;
    }

    fn set_low(&mut self) {
        let _ = self.inner.set_low();
        self.driven_high = false;
    }

    fn is_set_high(&self) -> bool {
        self.driven_high
    }
}

/// Wraps an embedded-hal input pin
///
/// embedded-hal 1.0 reads take `&mut self`; the cell lets the wrapper
/// offer the `&self` reads of [`InputPin`].
#[derive(Debug)]
pub struct Input<P> {
    inner: RefCell<P>,
}

impl<P: digital::InputPin> Input<P> {
    /// Wrap `inner`
    pub fn new(inner: P) -> Self {
        Self {
            inner: RefCell::new(inner),
        }
    }
}

impl<P: digital::InputPin> InputPin for Input<P> {
    fn is_high(&self) -> bool {
        self.inner.borrow_mut().is_high().unwrap_or(false)
    }
}

/// Wraps an embedded-hal SPI bus
#[derive(Debug)]
pub struct Spi<B> {
    inner: B,
}

impl<B: spi::SpiBus> Spi<B> {
    /// Wrap `inner`
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

impl<B: spi::SpiBus> SpiBus for Spi<B> {
    type Error = B::Error;

    fn write_frame(&mut self, frame: Frame) -> Result<(), Self::Error> {
        self.inner.write(&frame)?;
        self.inner.flush()
    }

    fn exchange_frame(&mut self, frame: Frame) -> Result<Frame, Self::Error> {
        let mut word = frame;
        self.inner.transfer_in_place(&mut word)?;
        self.inner.flush()?;
        Ok(word)
    }
}
