//! Monotonic clock over the embassy time driver

use embassy_time::Instant;
use polygraph_core::traits::Clock;

/// Free-running microsecond clock
///
/// Zero-sized handle; copies all read the same hardware counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}
