//! Backoff delay schedule and the retry/exhaustion decision.

use std::time::Duration;

use outpost_sync::{BackoffDecision, BackoffScheduler, SharedSyncState};
use proptest::prelude::*;

fn scheduler() -> BackoffScheduler {
    BackoffScheduler::new(Duration::from_secs(1), Duration::from_secs(60), 5)
}

// ── delay schedule ─────────────────────────────────────────────────────────

#[test]
fn first_delay_is_the_base_delay() {
    assert_eq!(scheduler().next_delay(0), Duration::from_secs(1));
}

#[test]
fn delays_double_until_the_ceiling() {
    let s = scheduler();
    let delays: Vec<u64> = (0..8).map(|r| s.next_delay(r).as_secs()).collect();
    assert_eq!(delays, vec![1, 2, 4, 8, 16, 32, 60, 60]);
}

#[test]
fn huge_retry_counts_saturate_at_the_ceiling() {
    let s = scheduler();
    assert_eq!(s.next_delay(31), Duration::from_secs(60));
    assert_eq!(s.next_delay(32), Duration::from_secs(60));
    assert_eq!(s.next_delay(u32::MAX), Duration::from_secs(60));
}

#[test]
fn should_retry_below_max_only() {
    assert!(BackoffScheduler::should_retry(0, 5));
    assert!(BackoffScheduler::should_retry(4, 5));
    assert!(!BackoffScheduler::should_retry(5, 5));
    assert!(!BackoffScheduler::should_retry(0, 0));
}

// ── plan ───────────────────────────────────────────────────────────────────

#[test]
fn plan_uses_recorded_failure_count() {
    let s = scheduler();
    let state = SharedSyncState::new();

    state.update(|st| st.retry_count = 1);
    assert_eq!(
        s.plan(&state),
        BackoffDecision::Retry {
            attempt: 1,
            delay: Duration::from_secs(1)
        }
    );

    state.update(|st| st.retry_count = 3);
    assert_eq!(
        s.plan(&state),
        BackoffDecision::Retry {
            attempt: 3,
            delay: Duration::from_secs(4)
        }
    );
}

#[test]
fn fifth_consecutive_failure_is_terminal_with_max_five() {
    let s = scheduler();
    let state = SharedSyncState::new();
    state.update(|st| st.retry_count = 5);
    assert_eq!(s.plan(&state), BackoffDecision::Exhausted { attempts: 5 });
}

proptest! {
    #[test]
    fn delays_are_monotonic_and_bounded(
        base_ms in 1u64..5_000,
        extra_ms in 0u64..120_000,
        retry in 0u32..64,
    ) {
        let base = Duration::from_millis(base_ms);
        let ceiling = Duration::from_millis(base_ms + extra_ms);
        let s = BackoffScheduler::new(base, ceiling, 5);

        let now = s.next_delay(retry);
        let next = s.next_delay(retry + 1);
        prop_assert!(now <= next);
        prop_assert!(next <= ceiling);
        prop_assert!(now >= base.min(ceiling));
    }
}
