//! Board-agnostic core for the Polygraph pulse link.
//!
//! This crate contains the pieces that do not depend on specific
//! hardware:
//!
//! - Hardware abstraction traits (output pin, monotonic clock)
//! - The polled countdown timer the transmit driver paces itself with

#![no_std]
#![deny(unsafe_code)]

pub mod timer;
pub mod traits;
