//! Process-wide reconciliation state, owned by one orchestrator and shared
//! by handle with the authenticator and backoff scheduler.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use outpost_core::models::SessionToken;
use serde::{Deserialize, Serialize};

/// Orchestrator state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Stopped,
    Authenticating,
    Idle,
    Probing,
    Syncing,
    Backoff,
}

/// Mutable state behind [`SharedSyncState`].
#[derive(Debug, Default)]
pub struct SyncState {
    pub is_online: bool,
    pub retry_count: u32,
    pub token: Option<SessionToken>,
    pub running: bool,
    /// Bumped on every start; work from an older epoch must not touch state.
    pub epoch: u64,
    pub phase: Phase,
    pub last_sync_at: Option<DateTime<Utc>>,
}

/// Point-in-time copy of the state, safe to hand to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorStatus {
    pub phase: Phase,
    pub running: bool,
    pub is_online: bool,
    pub retry_count: u32,
    pub authenticated: bool,
    pub last_sync_at: Option<DateTime<Utc>>,
}

/// Mutex-guarded handle to the single [`SyncState`].
#[derive(Debug, Clone, Default)]
pub struct SharedSyncState(Arc<Mutex<SyncState>>);

impl SharedSyncState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read<R>(&self, f: impl FnOnce(&SyncState) -> R) -> R {
        f(&self.lock())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut SyncState) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.lock().token.clone()
    }

    pub fn set_token(&self, token: SessionToken) {
        self.lock().token = Some(token);
    }

    pub fn clear_token(&self) {
        self.lock().token = None;
    }

    /// Store `token` only if the run started under `epoch` is still active.
    pub fn set_token_if_current(&self, epoch: u64, token: SessionToken) -> bool {
        let mut state = self.lock();
        if !(state.running && state.epoch == epoch) {
            return false;
        }
        state.token = Some(token);
        true
    }

    pub fn clear_token_if_current(&self, epoch: u64) -> bool {
        let mut state = self.lock();
        if !(state.running && state.epoch == epoch) {
            return false;
        }
        state.token = None;
        true
    }

    pub fn retry_count(&self) -> u32 {
        self.lock().retry_count
    }

    pub fn set_phase(&self, phase: Phase) {
        self.lock().phase = phase;
    }

    /// Whether work started under `epoch` may still mutate state.
    pub fn is_current(&self, epoch: u64) -> bool {
        let state = self.lock();
        state.running && state.epoch == epoch
    }

    pub fn status(&self) -> OrchestratorStatus {
        let state = self.lock();
        OrchestratorStatus {
            phase: state.phase,
            running: state.running,
            is_online: state.is_online,
            retry_count: state.retry_count,
            authenticated: state.token.is_some(),
            last_sync_at: state.last_sync_at,
        }
    }
}
