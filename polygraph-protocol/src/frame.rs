//! Frame layout and symbol encoding.
//!
//! A frame is twelve symbols, most significant first:
//!
//! ```text
//! symbol   0..=5      6      7       8        9..=11
//!         command   led_8  led_9  reserved  led_stripe
//!          group
//! ```
//!
//! The command group is the upper six bits of the command code; the
//! reserved symbol is always a logical 0 on the wire.

use crate::command::Command;
use crate::pulse::PulseShape;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of data symbols in a frame
pub const FRAME_SYMBOLS: usize = 12;

/// Number of command-group symbols at the head of a frame
pub const STATE_SYMBOLS: usize = 6;

/// Width of the LED stripe field, in symbols
pub const LED_STRIPE_BITS: usize = 3;

/// Largest value the LED stripe field can carry
pub const LED_STRIPE_MAX: u8 = (1 << LED_STRIPE_BITS) - 1;

/// Errors that can occur when building a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// LED stripe value does not fit its 3-bit field
    StripeOutOfRange,
}

/// A validated command-plus-flags frame
///
/// Construction checks the stripe range, so a `Frame` always encodes to
/// exactly [`FRAME_SYMBOLS`] symbols without overflowing any field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    command: Command,
    led_8: bool,
    led_9: bool,
    led_stripe: u8,
}

impl Frame {
    /// Build a frame, rejecting stripe values above [`LED_STRIPE_MAX`]
    pub fn new(
        command: Command,
        led_8: bool,
        led_9: bool,
        led_stripe: u8,
    ) -> Result<Self, FrameError> {
        if led_stripe > LED_STRIPE_MAX {
            return Err(FrameError::StripeOutOfRange);
        }
        Ok(Self {
            command,
            led_8,
            led_9,
            led_stripe,
        })
    }

    /// Build a frame from parser fields
    ///
    /// `led_stripe` must already be masked to [`LED_STRIPE_BITS`] bits.
    pub(crate) fn from_parts(command: Command, led_8: bool, led_9: bool, led_stripe: u8) -> Self {
        Self {
            command,
            led_8,
            led_9,
            led_stripe,
        }
    }

    /// The frame's command
    pub fn command(&self) -> Command {
        self.command
    }

    /// State of the LED 8 flag
    pub fn led_8(&self) -> bool {
        self.led_8
    }

    /// State of the LED 9 flag
    pub fn led_9(&self) -> bool {
        self.led_9
    }

    /// LED stripe level (0..=[`LED_STRIPE_MAX`])
    pub fn led_stripe(&self) -> u8 {
        self.led_stripe
    }

    /// The frame as a 12-bit value, first symbol in bit 11
    pub fn packed(&self) -> u16 {
        let mut bits = (self.command.state_bits() as u16) << 6;
        if self.led_8 {
            bits |= 1 << 5;
        }
        if self.led_9 {
            bits |= 1 << 4;
        }
        // bit 3 is the reserved symbol and stays clear
        bits |= self.led_stripe as u16;
        bits
    }

    /// The frame as its wire symbol sequence, transmit order
    pub fn symbols(&self) -> [PulseShape; FRAME_SYMBOLS] {
        let bits = self.packed();
        let mut symbols = [PulseShape::Long; FRAME_SYMBOLS];
        for (i, symbol) in symbols.iter_mut().enumerate() {
            let bit = bits & (1 << (FRAME_SYMBOLS - 1 - i)) != 0;
            *symbol = PulseShape::from_bit(bit);
        }
        symbols
    }
}
