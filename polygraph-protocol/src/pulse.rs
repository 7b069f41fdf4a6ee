//! Pulse shapes and line timing.
//!
//! Every symbol on the wire is a high pulse whose width carries the
//! information, followed by a low gap. The receiver sorts high pulses
//! into three classes by minimum width:
//!
//! - start marker: >= 3000 us
//! - long: >= 1000 us
//! - tiny: >= 500 us
//!
//! Anything narrower is treated as line noise and ignored.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum width of a start marker, in microseconds
pub const START_MIN_US: u64 = 3000;

/// Minimum width of a long pulse, in microseconds
pub const LONG_MIN_US: u64 = 1000;

/// Minimum width of a tiny pulse, in microseconds
pub const TINY_MIN_US: u64 = 500;

/// The two data-bearing pulse shapes
///
/// A tiny pulse encodes a logical 1, a long pulse a logical 0. The toy's
/// receiver distinguishes them purely by high-time; gaps carry no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PulseShape {
    /// Short high pulse (logical 1)
    Tiny,
    /// Extended high pulse (logical 0)
    Long,
}

impl PulseShape {
    /// Shape encoding the given logical bit
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            PulseShape::Tiny
        } else {
            PulseShape::Long
        }
    }

    /// Logical bit carried by this shape
    pub fn bit(self) -> bool {
        matches!(self, PulseShape::Tiny)
    }
}

/// Classification of a measured high pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseClass {
    /// Frame start marker
    Start,
    /// Long data pulse (logical 0)
    Long,
    /// Tiny data pulse (logical 1)
    Tiny,
}

/// Classify a measured high-pulse width
///
/// Returns `None` for widths below the tiny threshold (noise).
pub fn classify(width_us: u64) -> Option<PulseClass> {
    if width_us >= START_MIN_US {
        Some(PulseClass::Start)
    } else if width_us >= LONG_MIN_US {
        Some(PulseClass::Long)
    } else if width_us >= TINY_MIN_US {
        Some(PulseClass::Tiny)
    } else {
        None
    }
}

/// Errors from [`PulseTiming::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// Start width would not classify as a start marker
    StartTooShort,
    /// Tiny width falls outside the tiny window
    TinyOutOfRange,
    /// Long width falls outside the long window
    LongOutOfRange,
    /// Inter-symbol gap must be non-zero for the receiver to see edges
    ZeroGap,
}

/// Emitted pulse and gap widths, in microseconds
///
/// The defaults sit centrally inside the receiver's classification
/// windows, leaving margin for transmit-side polling jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PulseTiming {
    /// Start marker high time
    pub start_us: u64,
    /// Tiny pulse high time
    pub tiny_us: u64,
    /// Long pulse high time
    pub long_us: u64,
    /// Low gap after the start marker and after every data pulse
    pub gap_us: u64,
}

impl Default for PulseTiming {
    fn default() -> Self {
        Self {
            start_us: 4000,
            tiny_us: 600,
            long_us: 1500,
            gap_us: 500,
        }
    }
}

impl PulseTiming {
    /// Check that each emitted width lands in its receiver window
    pub fn validate(&self) -> Result<(), TimingError> {
        if classify(self.start_us) != Some(PulseClass::Start) {
            return Err(TimingError::StartTooShort);
        }
        if classify(self.tiny_us) != Some(PulseClass::Tiny) {
            return Err(TimingError::TinyOutOfRange);
        }
        if classify(self.long_us) != Some(PulseClass::Long) {
            return Err(TimingError::LongOutOfRange);
        }
        if self.gap_us == 0 {
            return Err(TimingError::ZeroGap);
        }
        Ok(())
    }

    /// High time for a data pulse of the given shape
    pub fn shape_us(&self, shape: PulseShape) -> u64 {
        match shape {
            PulseShape::Tiny => self.tiny_us,
            PulseShape::Long => self.long_us,
        }
    }
}
