// nfchal/src/platform/std_clock.rs

use std::time::{Duration, Instant};

use super::traits::DelayNs;
use super::Clock;

/// [`Clock`] and [`DelayNs`] on top of the host's monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    epoch: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn ticks_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

impl DelayNs for StdClock {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns as u64));
    }
}
