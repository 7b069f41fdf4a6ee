//! Data-line GPIO adapter

use embassy_rp::gpio::Output;
use polygraph_core::traits::OutputPin;

/// Pulse-line output backed by an embassy-rp `Output`
///
/// Construct the `Output` with `Level::Low` so the line starts at its
/// idle level.
pub struct PulsePin<'d> {
    out: Output<'d>,
}

impl<'d> PulsePin<'d> {
    /// Wrap a configured output pin
    pub fn new(out: Output<'d>) -> Self {
        Self { out }
    }
}

impl OutputPin for PulsePin<'_> {
    fn set_high(&mut self) {
        self.out.set_high();
    }

    fn set_low(&mut self) {
        self.out.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.out.is_set_high()
    }
}
