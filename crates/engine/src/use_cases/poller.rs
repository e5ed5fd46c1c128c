//! Background clock sampling.

use std::sync::Arc;
use std::time::Duration;

use rtcbridge_domain::RtcTime;

use super::clock::ClockService;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// After this many failed reads in a row, failures are logged as errors.
const FAILURE_ESCALATION_THRESHOLD: u32 = 5;

/// Periodically reads the clock and logs the result.
///
/// Read failures are never fatal; the next cycle simply tries again.
pub struct ClockPoller {
    clock: Arc<ClockService>,
    interval: Duration,
    consecutive_failures: u32,
}

impl ClockPoller {
    pub fn new(clock: Arc<ClockService>, interval: Duration) -> Self {
        Self {
            clock,
            interval,
            consecutive_failures: 0,
        }
    }

    /// Poll forever.
    pub async fn run(mut self) {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Clock poller started");
        loop {
            tokio::time::sleep(self.interval).await;
            self.poll_once().await;
        }
    }

    /// One read-and-publish cycle, without the wait.
    pub async fn poll_once(&mut self) -> Option<RtcTime> {
        match self.clock.get_time().await {
            Ok(time) => {
                if self.consecutive_failures > 0 {
                    tracing::info!(
                        failures = self.consecutive_failures,
                        "Clock reads recovered"
                    );
                    self.consecutive_failures = 0;
                }
                tracing::info!(
                    "DS3231 Time: {} Date: {}",
                    time.time_string(),
                    time.date_string()
                );
                Some(time)
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                if self.consecutive_failures >= FAILURE_ESCALATION_THRESHOLD {
                    tracing::error!(
                        error = %e,
                        consecutive_failures = self.consecutive_failures,
                        "I2C read error"
                    );
                } else {
                    tracing::warn!(
                        error = %e,
                        consecutive_failures = self.consecutive_failures,
                        "I2C read error"
                    );
                }
                None
            }
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}
