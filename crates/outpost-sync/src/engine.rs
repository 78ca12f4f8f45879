//! SyncOrchestrator: authentication, periodic probing, backoff, and the
//! fan-out of per-kind pipelines.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use outpost_core::config::OutpostConfig;
use outpost_core::errors::{OutpostError, OutpostResult, SyncError};
use outpost_core::models::{Credentials, KindReport, SessionToken, SyncResult};
use outpost_core::traits::{ILocalCache, IRemoteApi};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::auth::Authenticator;
use crate::backoff::{BackoffDecision, BackoffScheduler};
use crate::cache::FileCache;
use crate::observability::events;
use crate::pipeline::EntitySyncPipeline;
use crate::probe::{Connectivity, ConnectivityProbe};
use crate::state::{OrchestratorStatus, Phase, SharedSyncState};

/// Invoked with the consolidated result of every completed pass.
pub type CompletionCallback = Arc<dyn Fn(&SyncResult) + Send + Sync>;
/// Invoked with orchestrator-level failures.
pub type ErrorCallback = Arc<dyn Fn(&OutpostError) + Send + Sync>;

/// What one probe-and-sync cycle ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The remote was online and every configured kind ran.
    Synced(SyncResult),
    /// The remote was unreachable; a re-probe is pending.
    BackoffScheduled { attempt: u32, delay: Duration },
    /// The remote was unreachable and the retry budget is spent.
    RetriesExhausted { attempts: u32 },
    /// Re-authentication failed or the fresh token was rejected too.
    AuthFailed(String),
    /// The orchestrator is not running, or was stopped mid-cycle.
    Stopped,
}

type BoxedCycle = Pin<Box<dyn Future<Output = TickOutcome> + Send>>;

#[derive(Default)]
struct Timers {
    ticker: Option<JoinHandle<()>>,
    backoff: Option<JoinHandle<()>>,
    backoff_seq: u64,
}

struct Inner {
    state: SharedSyncState,
    credentials: Option<Credentials>,
    authenticator: Authenticator,
    probe: ConnectivityProbe,
    backoff: BackoffScheduler,
    pipelines: Vec<Arc<EntitySyncPipeline>>,
    poll_interval: Duration,
    on_complete: Option<CompletionCallback>,
    on_error: Option<ErrorCallback>,
    timers: Mutex<Timers>,
    last_result: Mutex<Option<SyncResult>>,
    /// Serializes `start` calls.
    lifecycle: tokio::sync::Mutex<()>,
}

/// Drives reconciliation between the local caches and the remote.
///
/// Dropping the orchestrator stops it.
pub struct SyncOrchestrator {
    inner: Arc<Inner>,
}

/// Builder for [`SyncOrchestrator`]. Every collaborator has a default except
/// the credentials, which [`SyncOrchestrator::start`] requires.
pub struct SyncOrchestratorBuilder {
    config: OutpostConfig,
    remote: Option<Arc<dyn IRemoteApi>>,
    cache: Option<Arc<dyn ILocalCache>>,
    credentials: Option<Credentials>,
    on_complete: Option<CompletionCallback>,
    on_error: Option<ErrorCallback>,
}

impl SyncOrchestratorBuilder {
    pub fn remote(mut self, remote: Arc<dyn IRemoteApi>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn cache(mut self, cache: Arc<dyn ILocalCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn on_complete(mut self, callback: impl Fn(&SyncResult) + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Arc::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&OutpostError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Validate the config and wire the collaborators.
    ///
    /// Without an explicit remote, an [`HttpRemote`](crate::transport::HttpRemote)
    /// is built from `config.remote`. Without an explicit cache, a
    /// [`FileCache`] rooted at `config.cache.dir` is used.
    pub fn build(self) -> OutpostResult<SyncOrchestrator> {
        let config = self.config;
        config.validate()?;

        let remote = match self.remote {
            Some(remote) => remote,
            None => default_remote(&config)?,
        };
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(FileCache::from_config(&config.cache)));

        let state = SharedSyncState::new();
        let kinds: BTreeSet<_> = config.sync.kinds.iter().copied().collect();
        let pipelines = kinds
            .into_iter()
            .map(|kind| {
                Arc::new(EntitySyncPipeline::new(
                    kind,
                    Arc::clone(&cache),
                    Arc::clone(&remote),
                    config.sync.timeout_for(kind),
                ))
            })
            .collect();

        let inner = Inner {
            authenticator: Authenticator::new(
                Arc::clone(&remote),
                state.clone(),
                config.remote.auth_timeout(),
            ),
            probe: ConnectivityProbe::new(remote, config.remote.probe_timeout()),
            backoff: BackoffScheduler::from_config(&config.schedule),
            state,
            credentials: self.credentials,
            pipelines,
            poll_interval: config.schedule.poll_interval(),
            on_complete: self.on_complete,
            on_error: self.on_error,
            timers: Mutex::new(Timers::default()),
            last_result: Mutex::new(None),
            lifecycle: tokio::sync::Mutex::new(()),
        };
        Ok(SyncOrchestrator {
            inner: Arc::new(inner),
        })
    }
}

fn missing_credentials() -> OutpostError {
    SyncError::Configuration {
        reason: "no credentials configured".into(),
    }
    .into()
}

#[cfg(feature = "http")]
fn default_remote(config: &OutpostConfig) -> OutpostResult<Arc<dyn IRemoteApi>> {
    Ok(Arc::new(crate::transport::HttpRemote::from_config(config)?))
}

#[cfg(not(feature = "http"))]
fn default_remote(_config: &OutpostConfig) -> OutpostResult<Arc<dyn IRemoteApi>> {
    Err(SyncError::Configuration {
        reason: "no remote supplied and the `http` feature is disabled".into(),
    }
    .into())
}

impl SyncOrchestrator {
    pub fn builder(config: OutpostConfig) -> SyncOrchestratorBuilder {
        SyncOrchestratorBuilder {
            config,
            remote: None,
            cache: None,
            credentials: None,
            on_complete: None,
            on_error: None,
        }
    }

    /// Authenticate, run one immediate cycle, then arm the poll timer.
    ///
    /// A start failure (missing credentials or a rejected login) is returned
    /// and reported to the error callback, and the loop is not entered. Starting a running orchestrator is a no-op.
    pub async fn start(&self) -> OutpostResult<()> {
        let inner = &self.inner;
        let _lifecycle = inner.lifecycle.lock().await;
        if inner.state.read(|s| s.running) {
            return Ok(());
        }

        let Some(credentials) = inner.credentials.clone() else {
            let err = missing_credentials();
            inner.report_error(&err);
            return Err(err);
        };

        let epoch = inner.state.update(|s| {
            s.running = true;
            s.epoch += 1;
            s.retry_count = 0;
            s.is_online = false;
            s.phase = Phase::Authenticating;
            s.epoch
        });

        if let Err(e) = inner.authenticator.authenticate_for(&credentials, epoch).await {
            inner.state.update(|s| {
                s.running = false;
                s.phase = Phase::Stopped;
            });
            inner.report_error(&e);
            return Err(e);
        }
        if !inner.state.is_current(epoch) {
            return Ok(());
        }

        inner.state.set_phase(Phase::Idle);
        events::orchestrator_started(inner.poll_interval);

        Arc::clone(inner).run_cycle(epoch).await;
        inner.arm_ticker(epoch);
        Ok(())
    }

    /// Cancel the timer and any pending backoff, drop the token, and reset
    /// the retry counter. Idempotent.
    pub fn stop(&self) {
        self.inner.halt();
    }

    /// Run one probe-and-sync cycle now, outside the timer.
    pub async fn check_connectivity_and_sync(&self) -> TickOutcome {
        let epoch = self.inner.state.read(|s| s.epoch);
        if !self.inner.state.is_current(epoch) {
            return TickOutcome::Stopped;
        }
        Arc::clone(&self.inner).run_cycle(epoch).await
    }

    pub fn status(&self) -> OrchestratorStatus {
        self.inner.state.status()
    }

    /// Result of the most recent completed pass, if any.
    pub fn last_result(&self) -> Option<SyncResult> {
        self.inner.lock_last_result().clone()
    }
}

impl Drop for SyncOrchestrator {
    fn drop(&mut self) {
        self.inner.halt();
    }
}

impl Inner {
    fn lock_timers(&self) -> MutexGuard<'_, Timers> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_last_result(&self) -> MutexGuard<'_, Option<SyncResult>> {
        self.last_result.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn halt(&self) {
        let was_running = self.state.update(|s| {
            let was_running = s.running;
            s.running = false;
            s.token = None;
            s.retry_count = 0;
            s.is_online = false;
            s.phase = Phase::Stopped;
            was_running
        });

        let mut timers = self.lock_timers();
        if let Some(ticker) = timers.ticker.take() {
            ticker.abort();
        }
        if let Some(backoff) = timers.backoff.take() {
            backoff.abort();
        }
        drop(timers);

        if was_running {
            events::orchestrator_stopped();
        }
    }

    fn arm_ticker(self: &Arc<Self>, epoch: u64) {
        let mut timers = self.lock_timers();
        // Checked under the timers lock so a concurrent stop either sees the
        // handle or prevents it from being stored.
        if !self.state.is_current(epoch) {
            return;
        }
        if let Some(previous) = timers.ticker.take() {
            previous.abort();
        }

        let inner = Arc::clone(self);
        let period = self.poll_interval;
        timers.ticker = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !inner.state.is_current(epoch) {
                    break;
                }
                Arc::clone(&inner).run_cycle(epoch).await;
            }
        }));
    }

    fn schedule_backoff(self: &Arc<Self>, epoch: u64, delay: Duration) {
        let mut timers = self.lock_timers();
        if !self.state.is_current(epoch) {
            return;
        }
        if let Some(previous) = timers.backoff.take() {
            previous.abort();
        }
        timers.backoff_seq += 1;
        let seq = timers.backoff_seq;

        let inner = Arc::clone(self);
        timers.backoff = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                // Release our own handle so a follow-up backoff scheduled
                // from this task does not abort it.
                let mut timers = inner.lock_timers();
                if timers.backoff_seq == seq {
                    timers.backoff = None;
                }
            }
            inner.run_cycle(epoch).await;
        }));
    }

    fn run_cycle(self: Arc<Self>, epoch: u64) -> BoxedCycle {
        Box::pin(async move { self.cycle(epoch).await })
    }

    async fn cycle(self: &Arc<Self>, epoch: u64) -> TickOutcome {
        if !self.state.is_current(epoch) {
            return TickOutcome::Stopped;
        }
        self.state.set_phase(Phase::Probing);

        let mut reauthenticated = false;
        loop {
            let token = self.state.token();
            let connectivity = self.probe.probe(token.as_ref()).await;
            if !self.state.is_current(epoch) {
                return TickOutcome::Stopped;
            }
            events::probe_classified(&connectivity, self.state.retry_count());

            // Online without a token cannot sync; it is handled as expired.
            match (connectivity, token) {
                (Connectivity::Online, Some(token)) => return self.sync_all(epoch, token).await,
                (Connectivity::Unreachable(cause), _) => return self.unreachable(epoch, &cause),
                (Connectivity::Online | Connectivity::AuthExpired, _) if reauthenticated => {
                    let err = SyncError::AuthFailed {
                        reason: "session rejected again after re-authentication".into(),
                    }
                    .into();
                    return self.auth_failure(err);
                }
                (Connectivity::Online | Connectivity::AuthExpired, _) => {
                    reauthenticated = true;
                    self.state.set_phase(Phase::Authenticating);
                    let result = self.reauthenticate(epoch).await;
                    if !self.state.is_current(epoch) {
                        return TickOutcome::Stopped;
                    }
                    if let Err(e) = result {
                        return self.auth_failure(e);
                    }
                    self.state.set_phase(Phase::Probing);
                }
            }
        }
    }

    async fn reauthenticate(&self, epoch: u64) -> OutpostResult<SessionToken> {
        let credentials = self.credentials.as_ref().ok_or_else(missing_credentials)?;
        self.authenticator.authenticate_for(credentials, epoch).await
    }

    fn auth_failure(&self, error: OutpostError) -> TickOutcome {
        self.state.update(|s| {
            s.is_online = false;
            s.phase = Phase::Idle;
        });
        self.report_error(&error);
        TickOutcome::AuthFailed(error.to_string())
    }

    fn unreachable(self: &Arc<Self>, epoch: u64, cause: &str) -> TickOutcome {
        self.state.update(|s| {
            s.is_online = false;
            s.retry_count = s.retry_count.saturating_add(1);
        });

        match self.backoff.plan(&self.state) {
            BackoffDecision::Exhausted { attempts } => {
                self.state.set_phase(Phase::Idle);
                events::retries_exhausted(attempts);
                self.report_error(&SyncError::RetriesExhausted { attempts }.into());
                TickOutcome::RetriesExhausted { attempts }
            }
            BackoffDecision::Retry { attempt, delay } => {
                self.state.set_phase(Phase::Backoff);
                events::backoff_scheduled(attempt, delay, cause);
                self.schedule_backoff(epoch, delay);
                TickOutcome::BackoffScheduled { attempt, delay }
            }
        }
    }

    async fn sync_all(self: &Arc<Self>, epoch: u64, token: SessionToken) -> TickOutcome {
        self.state.update(|s| {
            s.retry_count = 0;
            s.is_online = true;
            s.phase = Phase::Syncing;
        });

        let tasks: Vec<_> = self
            .pipelines
            .iter()
            .map(|pipeline| {
                let pipeline = Arc::clone(pipeline);
                let token = token.clone();
                let kind = pipeline.kind();
                let task =
                    tokio::spawn(async move { pipeline.sync_local_to_remote(&token).await });
                (kind, task)
            })
            .collect();

        let mut kinds = BTreeMap::new();
        for (kind, task) in tasks {
            let report = match task.await {
                Ok(Ok(report)) => report,
                Ok(Err(e)) => {
                    if e.is_auth_failure() && self.state.is_current(epoch) {
                        self.authenticator.invalidate();
                    }
                    events::kind_failed(kind, &e);
                    KindReport::Failed {
                        message: e.to_string(),
                    }
                }
                Err(join_err) => {
                    tracing::error!(kind = %kind, error = %join_err, "outpost: pipeline task did not complete");
                    KindReport::Failed {
                        message: format!("{kind} pipeline task did not complete: {join_err}"),
                    }
                }
            };
            kinds.insert(kind, report);
        }

        if !self.state.is_current(epoch) {
            return TickOutcome::Stopped;
        }

        let result = SyncResult::new(kinds);
        self.state.update(|s| {
            s.phase = Phase::Idle;
            s.last_sync_at = Some(result.completed_at);
        });
        events::sync_completed(&result);
        *self.lock_last_result() = Some(result.clone());
        self.report_complete(&result);
        TickOutcome::Synced(result)
    }

    fn report_complete(&self, result: &SyncResult) {
        if let Some(callback) = &self.on_complete {
            if catch_unwind(AssertUnwindSafe(|| callback(result))).is_err() {
                tracing::error!("outpost: completion callback panicked");
            }
        }
    }

    fn report_error(&self, error: &OutpostError) {
        if let Some(callback) = &self.on_error {
            if catch_unwind(AssertUnwindSafe(|| callback(error))).is_err() {
                tracing::error!("outpost: error callback panicked");
            }
        }
    }
}
