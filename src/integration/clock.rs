//! Frame timestamps.

use std::time::{Duration, Instant};

/// Source of non-decreasing frame timestamps.
pub trait Clock {
    /// Time since the clock's epoch.
    fn now(&mut self) -> Duration;
}

/// Wall-clock time measured from construction, backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&mut self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Clock advancing by a fixed step per reading, for replays and tests.
#[derive(Debug, Clone, Copy)]
pub struct SteppedClock {
    next: Duration,
    step: Duration,
}

impl SteppedClock {
    /// First reading is `start`, each later one `step` further.
    pub fn new(start: Duration, step: Duration) -> Self {
        Self { next: start, step }
    }

    /// Steps of `1 / fps` seconds starting at zero.
    pub fn at_fps(fps: u32) -> Self {
        Self::new(Duration::ZERO, Duration::from_secs(1) / fps.max(1))
    }
}

impl Clock for SteppedClock {
    fn now(&mut self) -> Duration {
        let now = self.next;
        self.next += self.step;
        now
    }
}
