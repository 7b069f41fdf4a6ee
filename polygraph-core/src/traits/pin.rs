//! GPIO output pin abstraction
//!
//! The transmit driver owns exactly one output pin and only ever drives
//! it high or low; implementations handle the actual register access for
//! the specific chip.

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Adapter for pins implementing the `embedded-hal` digital traits
///
/// Wrapping drives the pin low, matching the link's idle level. The
/// adapter tracks the commanded level itself so reads stay infallible.
#[cfg(feature = "embedded-hal")]
pub struct EhalPin<P> {
    pin: P,
    high: bool,
}

#[cfg(feature = "embedded-hal")]
impl<P: embedded_hal::digital::OutputPin> EhalPin<P> {
    /// Wrap an `embedded-hal` output pin, driving it to idle low
    pub fn new(mut pin: P) -> Self {
        pin.set_low().ok();
        Self { pin, high: false }
    }

    /// Give the wrapped pin back
    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(feature = "embedded-hal")]
impl<P: embedded_hal::digital::OutputPin> OutputPin for EhalPin<P> {
    fn set_high(&mut self) {
        self.pin.set_high().ok();
        self.high = true;
    }

    fn set_low(&mut self) {
        self.pin.set_low().ok();
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
