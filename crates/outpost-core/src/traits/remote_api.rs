use async_trait::async_trait;

use crate::errors::OutpostResult;
use crate::models::{Credentials, EntityKind, EntityRecord, SessionToken, SyncOutcome};

/// Classified response of the liveness endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// 2xx.
    Healthy,
    /// 401 or 403: the token is expired or invalid.
    Unauthorized { status: u16 },
    /// Any other non-2xx status.
    Unavailable { status: u16 },
}

/// The authoritative server, as the reconciliation loop sees it.
///
/// Implementations map a rejected token or bad credentials to
/// `SyncError::AuthFailed` and every transport-level problem to
/// `SyncError::Transport`. Callers bound each call with their own timeout.
#[async_trait]
pub trait IRemoteApi: Send + Sync {
    /// `POST /auth/login`.
    async fn login(&self, credentials: &Credentials) -> OutpostResult<SessionToken>;

    /// `GET /api/health` with the bearer token.
    async fn health(&self, token: &SessionToken) -> OutpostResult<HealthStatus>;

    /// `POST /api/{kind}/sync-local` with identity-free records.
    async fn sync_local(
        &self,
        kind: EntityKind,
        records: &[EntityRecord],
        token: &SessionToken,
    ) -> OutpostResult<SyncOutcome>;
}
