//! Driver implementations for the Polygraph pulse link.
//!
//! This crate provides the transmit side of the link on top of the
//! traits defined in polygraph-core:
//!
//! - Frame transmitter (start marker + twelve width-coded pulses)

#![no_std]
#![deny(unsafe_code)]

pub mod transmitter;

pub use transmitter::{PacketGenerator, TxError, TxStatus};
