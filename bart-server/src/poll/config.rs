//! Poll configuration.

use std::time::Duration;

/// Configuration for the background refresh.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Time between refresh cycles.
    pub interval: Duration,

    /// Maximum rows on the published board.
    pub max_rows: usize,
}

impl PollConfig {
    /// Set the refresh interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the row limit.
    pub fn with_max_rows(mut self, n: usize) -> Self {
        self.max_rows = n;
        self
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            max_rows: 6,
        }
    }
}
