//! Authenticator and ConnectivityProbe against the loopback remote.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use outpost_core::errors::{OutpostError, OutpostResult, SyncError};
use outpost_core::models::{Credentials, EntityKind, EntityRecord, SessionToken, SyncOutcome};
use outpost_core::traits::{HealthStatus, IRemoteApi};
use outpost_sync::{Authenticator, Connectivity, ConnectivityProbe, LoopbackRemote, SharedSyncState};

fn remote() -> Arc<LoopbackRemote> {
    Arc::new(LoopbackRemote::new().with_account("ADM-001", "s3cret"))
}

fn authenticator(remote: &Arc<LoopbackRemote>, state: &SharedSyncState) -> Authenticator {
    Authenticator::new(remote.clone(), state.clone(), Duration::from_secs(10))
}

/// Remote whose health endpoint always answers with a fixed status.
struct FixedHealth(HealthStatus);

#[async_trait]
impl IRemoteApi for FixedHealth {
    async fn login(&self, _credentials: &Credentials) -> OutpostResult<SessionToken> {
        Ok(SessionToken::new("fixed"))
    }

    async fn health(&self, _token: &SessionToken) -> OutpostResult<HealthStatus> {
        Ok(self.0)
    }

    async fn sync_local(
        &self,
        _kind: EntityKind,
        _records: &[EntityRecord],
        _token: &SessionToken,
    ) -> OutpostResult<SyncOutcome> {
        Ok(SyncOutcome::default())
    }
}

// ── authenticate ───────────────────────────────────────────────────────────

#[tokio::test]
async fn valid_credentials_store_a_token() {
    let remote = remote();
    let state = SharedSyncState::new();
    let auth = authenticator(&remote, &state);

    let token = auth
        .authenticate(&Credentials::new("ADM-001", "s3cret"))
        .await
        .unwrap();

    assert_eq!(state.token(), Some(token.clone()));
    assert_eq!(auth.current_token(), Some(token));
    assert_eq!(remote.login_calls(), 1);
}

#[tokio::test]
async fn rejected_credentials_clear_the_previous_token() {
    let remote = remote();
    let state = SharedSyncState::new();
    state.set_token(SessionToken::new("stale"));
    let auth = authenticator(&remote, &state);

    let err = auth
        .authenticate(&Credentials::new("ADM-001", "wrong"))
        .await
        .unwrap_err();

    assert!(err.is_auth_failure());
    assert!(state.token().is_none());
}

#[tokio::test]
async fn login_for_a_stopped_run_returns_the_token_without_storing_it() {
    let remote = remote();
    let state = SharedSyncState::new();
    let epoch = state.update(|s| {
        s.running = true;
        s.epoch += 1;
        s.epoch
    });
    let auth = authenticator(&remote, &state);
    let credentials = Credentials::new("ADM-001", "s3cret");

    let token = auth.authenticate_for(&credentials, epoch).await.unwrap();
    assert_eq!(state.token(), Some(token));

    state.update(|s| s.running = false);
    state.clear_token();
    auth.authenticate_for(&credentials, epoch).await.unwrap();

    assert!(state.token().is_none());
    assert_eq!(remote.login_calls(), 2);
}

#[tokio::test]
async fn network_failure_during_login_is_an_auth_failure() {
    let remote = remote();
    remote.set_reachable(false);
    let state = SharedSyncState::new();

    let err = authenticator(&remote, &state)
        .authenticate(&Credentials::new("ADM-001", "s3cret"))
        .await
        .unwrap_err();

    assert!(matches!(err, OutpostError::Sync(SyncError::AuthFailed { .. })));
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn blank_credentials_fail_before_any_request() {
    let remote = remote();
    let state = SharedSyncState::new();

    let err = authenticator(&remote, &state)
        .authenticate(&Credentials::new("  ", "s3cret"))
        .await
        .unwrap_err();

    assert!(matches!(err, OutpostError::Sync(SyncError::Configuration { .. })));
    assert_eq!(remote.login_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_login_times_out_as_auth_failure() {
    let remote = remote();
    remote.set_latency(Duration::from_secs(30));
    let state = SharedSyncState::new();

    let err = authenticator(&remote, &state)
        .authenticate(&Credentials::new("ADM-001", "s3cret"))
        .await
        .unwrap_err();

    assert!(err.is_auth_failure());
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn invalidate_drops_the_token() {
    let remote = remote();
    let state = SharedSyncState::new();
    let auth = authenticator(&remote, &state);
    auth.authenticate(&Credentials::new("ADM-001", "s3cret"))
        .await
        .unwrap();

    auth.invalidate();
    assert!(auth.current_token().is_none());
}

// ── probe ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn probe_classifies_loopback_states() {
    let remote = remote();
    let state = SharedSyncState::new();
    let token = authenticator(&remote, &state)
        .authenticate(&Credentials::new("ADM-001", "s3cret"))
        .await
        .unwrap();
    let probe = ConnectivityProbe::new(remote.clone(), Duration::from_secs(5));

    assert_eq!(probe.probe(Some(&token)).await, Connectivity::Online);

    remote.set_reachable(false);
    assert!(matches!(probe.probe(Some(&token)).await, Connectivity::Unreachable(_)));

    remote.set_reachable(true);
    remote.expire_tokens();
    assert_eq!(probe.probe(Some(&token)).await, Connectivity::AuthExpired);
}

#[tokio::test]
async fn probe_without_token_makes_no_request() {
    let remote = remote();
    let probe = ConnectivityProbe::new(remote.clone(), Duration::from_secs(5));

    assert_eq!(probe.probe(None).await, Connectivity::AuthExpired);
    assert_eq!(remote.health_calls(), 0);
}

#[tokio::test]
async fn forbidden_is_auth_expired_and_server_error_is_unreachable() {
    let token = SessionToken::new("t");

    let forbidden = ConnectivityProbe::new(
        Arc::new(FixedHealth(HealthStatus::Unauthorized { status: 403 })),
        Duration::from_secs(5),
    );
    assert_eq!(forbidden.probe(Some(&token)).await, Connectivity::AuthExpired);

    let unavailable = ConnectivityProbe::new(
        Arc::new(FixedHealth(HealthStatus::Unavailable { status: 503 })),
        Duration::from_secs(5),
    );
    assert_eq!(
        unavailable.probe(Some(&token)).await,
        Connectivity::Unreachable("health check returned HTTP 503".into())
    );
}

#[tokio::test(start_paused = true)]
async fn hung_probe_times_out_as_unreachable() {
    let remote = remote();
    let state = SharedSyncState::new();
    let token = authenticator(&remote, &state)
        .authenticate(&Credentials::new("ADM-001", "s3cret"))
        .await
        .unwrap();
    remote.set_latency(Duration::from_secs(60));

    let probe = ConnectivityProbe::new(remote.clone(), Duration::from_secs(5));
    match probe.probe(Some(&token)).await {
        Connectivity::Unreachable(cause) => assert!(cause.contains("timed out")),
        other => panic!("expected unreachable, got {other}"),
    }
}
