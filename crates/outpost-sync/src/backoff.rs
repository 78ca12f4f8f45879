//! Exponential backoff with a ceiling and a maximum attempt count.

use std::time::Duration;

use outpost_core::config::ScheduleConfig;

use crate::state::SharedSyncState;

/// What to do after an unreachable probe has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffDecision {
    /// Probe again after `delay`; `attempt` counts consecutive failures so far.
    Retry { attempt: u32, delay: Duration },
    /// Stop re-probing until the next regular tick.
    Exhausted { attempts: u32 },
}

#[derive(Debug, Clone, Copy)]
pub struct BackoffScheduler {
    base_delay: Duration,
    ceiling: Duration,
    max_retries: u32,
}

impl BackoffScheduler {
    pub fn new(base_delay: Duration, ceiling: Duration, max_retries: u32) -> Self {
        Self {
            base_delay,
            ceiling,
            max_retries,
        }
    }

    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self::new(
            config.base_retry_delay(),
            config.retry_ceiling(),
            config.max_retries,
        )
    }

    /// `min(base × 2^retry_count, ceiling)`, saturating at the ceiling.
    pub fn next_delay(&self, retry_count: u32) -> Duration {
        2u32.checked_pow(retry_count)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.ceiling, |delay| delay.min(self.ceiling))
    }

    pub fn should_retry(retry_count: u32, max_retries: u32) -> bool {
        retry_count < max_retries
    }

    /// Decide from the failure count already recorded in `state`.
    ///
    /// With `max_retries = N` the N-th consecutive failure is terminal, so a
    /// single chain makes at most N probes.
    pub fn plan(&self, state: &SharedSyncState) -> BackoffDecision {
        let failures = state.retry_count();
        if !Self::should_retry(failures, self.max_retries) {
            return BackoffDecision::Exhausted { attempts: failures };
        }
        BackoffDecision::Retry {
            attempt: failures,
            delay: self.next_delay(failures.saturating_sub(1)),
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}
