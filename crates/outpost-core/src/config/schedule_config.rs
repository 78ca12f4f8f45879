use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Poll loop and retry schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Fixed interval between regular ticks.
    pub poll_interval_secs: u64,
    /// First backoff delay; doubles per consecutive failure.
    pub base_retry_delay_ms: u64,
    /// Upper bound for any single backoff delay.
    pub retry_ceiling_ms: u64,
    /// Consecutive unreachable probes tolerated before giving up until the next tick.
    pub max_retries: u32,
}

impl ScheduleConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn base_retry_delay(&self) -> Duration {
        Duration::from_millis(self.base_retry_delay_ms)
    }

    pub fn retry_ceiling(&self) -> Duration {
        Duration::from_millis(self.retry_ceiling_ms)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: defaults::DEFAULT_POLL_INTERVAL_SECS,
            base_retry_delay_ms: defaults::DEFAULT_BASE_RETRY_DELAY_MS,
            retry_ceiling_ms: defaults::DEFAULT_RETRY_CEILING_MS,
            max_retries: defaults::DEFAULT_MAX_RETRIES,
        }
    }
}
