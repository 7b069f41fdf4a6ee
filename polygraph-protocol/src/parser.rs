//! Receive-side frame reassembly from measured pulse widths.
//!
//! The parser is fed the width of every high pulse seen on the line.
//! Data symbols accumulate between start markers; a start marker both
//! closes the previous frame (which must hold exactly twelve symbols)
//! and opens the next, so back-to-back frame streams decode naturally.
//! The trailing frame of a transmission is only reported once the next
//! start marker arrives.

use heapless::Vec;

use crate::command::Command;
use crate::frame::{Frame, FRAME_SYMBOLS, LED_STRIPE_MAX, STATE_SYMBOLS};
use crate::pulse::{classify, PulseClass, PulseShape};

/// Errors that can occur while reassembling frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// A start-to-start span held this many symbols instead of twelve
    WrongBitCount(u8),
    /// The command group decoded to a code the board does not define
    UnknownCommand(u8),
}

/// Pulse-width parser for the single-wire link
#[derive(Debug, Clone, Default)]
pub struct PulseParser {
    /// A start marker has been seen; symbols are being collected
    collecting: bool,
    symbols: Vec<PulseShape, FRAME_SYMBOLS>,
    /// Symbols seen since the last start marker; may exceed the buffer
    n_symbols: u8,
}

impl PulseParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the parser to its pre-synchronization state
    pub fn reset(&mut self) {
        self.collecting = false;
        self.symbols.clear();
        self.n_symbols = 0;
    }

    /// Feed one measured high-pulse width
    ///
    /// Returns `Ok(Some(frame))` when a start marker closes a complete
    /// valid frame, `Ok(None)` otherwise. On error the parser stays
    /// synchronized to the start marker that exposed the problem.
    pub fn feed_pulse(&mut self, width_us: u64) -> Result<Option<Frame>, ParseError> {
        match classify(width_us) {
            // Sub-threshold glitch: ignore
            None => Ok(None),
            Some(PulseClass::Start) => self.close_frame(),
            Some(PulseClass::Long) => {
                self.push(PulseShape::Long);
                Ok(None)
            }
            Some(PulseClass::Tiny) => {
                self.push(PulseShape::Tiny);
                Ok(None)
            }
        }
    }

    /// Feed a sequence of high-pulse widths
    ///
    /// Returns the first complete frame found, if any. Remaining widths
    /// after a complete frame are not consumed.
    pub fn feed_pulses(&mut self, widths_us: &[u64]) -> Result<Option<Frame>, ParseError> {
        for &width in widths_us {
            if let Some(frame) = self.feed_pulse(width)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    fn push(&mut self, symbol: PulseShape) {
        if !self.collecting {
            // Data before the first start marker is noise
            return;
        }
        // The count check at the next start marker catches overflow
        let _ = self.symbols.push(symbol);
        self.n_symbols = self.n_symbols.saturating_add(1);
    }

    fn close_frame(&mut self) -> Result<Option<Frame>, ParseError> {
        if !self.collecting {
            self.collecting = true;
            return Ok(None);
        }

        let n = self.n_symbols;
        let result = if n as usize == FRAME_SYMBOLS {
            self.assemble().map(Some)
        } else if n == 0 {
            // Repeated start markers with no data in between
            Ok(None)
        } else {
            Err(ParseError::WrongBitCount(n))
        };

        self.symbols.clear();
        self.n_symbols = 0;
        result
    }

    fn assemble(&self) -> Result<Frame, ParseError> {
        let mut bits: u16 = 0;
        for symbol in &self.symbols {
            bits = bits << 1 | symbol.bit() as u16;
        }

        let code = ((bits >> (FRAME_SYMBOLS - STATE_SYMBOLS)) as u8) << 2;
        let command = Command::from_code(code).ok_or(ParseError::UnknownCommand(code))?;
        let led_8 = bits & (1 << 5) != 0;
        let led_9 = bits & (1 << 4) != 0;
        let led_stripe = (bits as u8) & LED_STRIPE_MAX;

        Ok(Frame::from_parts(command, led_8, led_9, led_stripe))
    }
}
