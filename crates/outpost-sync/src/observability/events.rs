//! Structured log events for key reconciliation transitions.
//!
//! Each function emits a `tracing` event with structured fields.

use std::time::Duration;

use outpost_core::errors::OutpostError;
use outpost_core::models::{EntityKind, SyncResult, SyncSummary};

use crate::probe::Connectivity;

pub fn auth_succeeded(admission_no: &str) {
    tracing::info!(
        event = "auth_succeeded",
        admission_no = %admission_no,
        "authenticated against remote"
    );
}

pub fn auth_failed(admission_no: &str, error: &OutpostError) {
    tracing::warn!(
        event = "auth_failed",
        admission_no = %admission_no,
        error = %error,
        "authentication failed"
    );
}

pub fn probe_classified(connectivity: &Connectivity, retry_count: u32) {
    tracing::debug!(
        event = "probe_classified",
        connectivity = %connectivity,
        retry_count = retry_count,
        "connectivity probe classified"
    );
}

pub fn backoff_scheduled(attempt: u32, delay: Duration, cause: &str) {
    tracing::warn!(
        event = "backoff_scheduled",
        attempt = attempt,
        delay_ms = delay.as_millis() as u64,
        cause = %cause,
        "remote unreachable, backing off"
    );
}

pub fn retries_exhausted(attempts: u32) {
    tracing::error!(
        event = "retries_exhausted",
        attempts = attempts,
        "max retries reached, waiting for next regular tick"
    );
}

pub fn kind_synced(kind: EntityKind, summary: SyncSummary) {
    tracing::info!(
        event = "kind_synced",
        kind = %kind,
        total = summary.total,
        created = summary.created,
        skipped = summary.skipped,
        failed = summary.failed,
        "entity kind reconciled"
    );
}

pub fn kind_nothing_to_sync(kind: EntityKind) {
    tracing::debug!(
        event = "kind_nothing_to_sync",
        kind = %kind,
        "local snapshot empty, nothing to sync"
    );
}

pub fn kind_failed(kind: EntityKind, error: &OutpostError) {
    tracing::warn!(
        event = "kind_failed",
        kind = %kind,
        error = %error,
        "entity kind pipeline failed"
    );
}

pub fn sync_completed(result: &SyncResult) {
    let totals = result.totals();
    tracing::info!(
        event = "sync_completed",
        kinds = result.kinds.len(),
        failed_kinds = result.failed_kinds().len(),
        created = totals.created,
        skipped = totals.skipped,
        failed = totals.failed,
        "reconciliation pass completed"
    );
}

pub fn orchestrator_started(poll_interval: Duration) {
    tracing::info!(
        event = "orchestrator_started",
        poll_interval_secs = poll_interval.as_secs(),
        "offline sync loop started"
    );
}

pub fn orchestrator_stopped() {
    tracing::info!(event = "orchestrator_stopped", "offline sync loop stopped");
}
