//! Command vocabulary of the pulse link.
//!
//! Each command is an 8-bit code whose upper six bits form the frame's
//! command group; the low two bits are constant filler. The codes are the
//! wire contract with the toy's sound/shock board and must be preserved
//! byte-for-byte.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Commands understood by the sound/shock board
///
/// The discriminants are the raw wire codes. Most codes only use the
/// upper nibble; `E7` is the one documented exception with a significant
/// bit below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Command {
    /// Power-on, short beep
    On = 0xa0,
    /// Vibration rattle
    OnVib = 0x30,
    /// Electricity crackle
    OnVibShock = 0x20,
    /// Calibration mutter
    Calib = 0x80,
    /// Calibration-done jingle
    CalibFinished = 0x90,
    /// Dramatic measurement suspense
    Measure = 0x10,
    /// Verdict: truthful, short beep
    MeasureFinOk = 0x00,
    /// Verdict: lying, scream plus shock
    MeasureFinShock = 0x60,
    /// Verdict: lying, scream plus vibration
    MeasureFinVib = 0x70,
    /// Loud alarm
    Beep = 0x40,

    // Undocumented codes the board accepts; E7 is a distinct high-pitch
    // beep, the rest sound like On.
    E1 = 0x50,
    E2 = 0xb0,
    E3 = 0xc0,
    E4 = 0xd0,
    E5 = 0xe0,
    E6 = 0xf0,
    E7 = 0xa8,
}

impl Command {
    /// Every command the board accepts
    pub const ALL: [Command; 17] = [
        Command::On,
        Command::OnVib,
        Command::OnVibShock,
        Command::Calib,
        Command::CalibFinished,
        Command::Measure,
        Command::MeasureFinOk,
        Command::MeasureFinShock,
        Command::MeasureFinVib,
        Command::Beep,
        Command::E1,
        Command::E2,
        Command::E3,
        Command::E4,
        Command::E5,
        Command::E6,
        Command::E7,
    ];

    /// Raw wire code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Upper six bits of the code: the frame's command group
    pub fn state_bits(self) -> u8 {
        self.code() >> 2
    }

    /// Look up a command by its raw wire code
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }
}
