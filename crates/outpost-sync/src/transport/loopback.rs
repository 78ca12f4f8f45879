//! In-process remote backed by a [`RemoteStore`].
//!
//! Behaves like the real server (credential check, token issuance, 401 on
//! stale tokens, dedup on sync-local) and exposes switches for the failure
//! modes the loop has to survive.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use outpost_core::errors::{OutpostResult, SyncError};
use outpost_core::models::{Credentials, EntityKind, EntityRecord, SessionToken, SyncOutcome};
use outpost_core::traits::{HealthStatus, IRemoteApi};

use crate::dedup::RemoteStore;

#[derive(Debug, Default)]
struct LoopbackState {
    store: RemoteStore,
    accounts: HashMap<String, String>,
    issued: HashSet<String>,
    unreachable: bool,
    failing_kinds: HashSet<EntityKind>,
    latency: Duration,
}

#[derive(Debug, Default)]
pub struct LoopbackRemote {
    state: Mutex<LoopbackState>,
    login_calls: AtomicUsize,
    health_calls: AtomicUsize,
    sync_calls: AtomicUsize,
}

impl LoopbackRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, admission_no: &str, password: &str) -> Self {
        self.lock()
            .accounts
            .insert(admission_no.to_string(), password.to_string());
        self
    }

    fn lock(&self) -> MutexGuard<'_, LoopbackState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Toggle network reachability for every endpoint.
    pub fn set_reachable(&self, reachable: bool) {
        self.lock().unreachable = !reachable;
    }

    /// Revoke every issued token; later calls with them get 401.
    pub fn expire_tokens(&self) {
        self.lock().issued.clear();
    }

    /// Make sync-local for `kind` fail at the transport level.
    pub fn fail_kind(&self, kind: EntityKind) {
        self.lock().failing_kinds.insert(kind);
    }

    /// Delay applied before every response.
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    pub fn with_store<R>(&self, f: impl FnOnce(&mut RemoteStore) -> R) -> R {
        f(&mut self.lock().store)
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    pub fn sync_calls(&self) -> usize {
        self.sync_calls.load(Ordering::SeqCst)
    }

    async fn delay(&self) -> OutpostResult<()> {
        let (latency, unreachable) = {
            let state = self.lock();
            (state.latency, state.unreachable)
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if unreachable {
            return Err(SyncError::Transport {
                reason: "connection refused".into(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl IRemoteApi for LoopbackRemote {
    async fn login(&self, credentials: &Credentials) -> OutpostResult<SessionToken> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await?;

        let mut state = self.lock();
        let accepted = state
            .accounts
            .get(credentials.admission_no())
            .is_some_and(|password| password == credentials.password());
        if !accepted {
            return Err(SyncError::AuthFailed {
                reason: "credentials rejected (HTTP 401)".into(),
            }
            .into());
        }
        let token = uuid::Uuid::new_v4().to_string();
        state.issued.insert(token.clone());
        Ok(SessionToken::new(token))
    }

    async fn health(&self, token: &SessionToken) -> OutpostResult<HealthStatus> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await?;

        if self.lock().issued.contains(token.as_str()) {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unauthorized { status: 401 })
        }
    }

    async fn sync_local(
        &self,
        kind: EntityKind,
        records: &[EntityRecord],
        token: &SessionToken,
    ) -> OutpostResult<SyncOutcome> {
        self.sync_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await?;

        let submitted = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;

        let mut state = self.lock();
        if state.failing_kinds.contains(&kind) {
            return Err(SyncError::Transport {
                reason: format!("{kind} sync-local connection reset"),
            }
            .into());
        }
        if !state.issued.contains(token.as_str()) {
            return Err(SyncError::AuthFailed {
                reason: format!("{kind} sync-local rejected token (HTTP 401)"),
            }
            .into());
        }
        Ok(state.store.bulk_upsert(kind, submitted).to_outcome())
    }
}
