//! Pulse-link protocol for the Polygraph shock toy.
//!
//! This crate defines the single-wire, one-directional protocol between
//! the toy's main unit and its sound/shock board. Every frame is a start
//! marker followed by twelve width-coded pulses:
//!
//! ```text
//! ┌────────┬─────────────────┬───────┬───────┬──────────┬────────────┐
//! │ START  │ command group   │ led_8 │ led_9 │ reserved │ led_stripe │
//! │ marker │ 6 symbols       │ 1     │ 1     │ 1        │ 3 symbols  │
//! └────────┴─────────────────┴───────┴───────┴──────────┴────────────┘
//! ```
//!
//! A tiny pulse carries a logical 1, a long pulse a logical 0; gaps
//! between pulses carry no data. There is no checksum and no reply:
//! the link is fire-and-forget.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod frame;
pub mod parser;
pub mod pulse;

pub use command::Command;
pub use frame::{Frame, FrameError, FRAME_SYMBOLS, LED_STRIPE_MAX};
pub use parser::{ParseError, PulseParser};
pub use pulse::{classify, PulseClass, PulseShape, PulseTiming, TimingError};
