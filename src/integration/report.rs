//! Periodic reporting of the cumulative presence count.

use std::time::Duration;

use tracing::info;

/// Logs the confirmed count at most once per interval.
///
/// The first observed frame always reports.
#[derive(Debug, Clone)]
pub struct CountReporter {
    interval: Duration,
    last_report: Option<Duration>,
}

impl CountReporter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_report: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Report `total` if the interval has passed. Returns whether it reported.
    pub fn observe(&mut self, now: Duration, total: u64) -> bool {
        let due = match self.last_report {
            None => true,
            Some(last) => now.saturating_sub(last) > self.interval,
        };
        if due {
            info!(count = total, "current count: {total}");
            self.last_report = Some(now);
        }
        due
    }
}

impl Default for CountReporter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
