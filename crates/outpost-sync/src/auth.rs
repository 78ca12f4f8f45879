//! Token lifecycle: credential exchange and invalidation.

use std::sync::Arc;
use std::time::Duration;

use outpost_core::errors::{OutpostError, OutpostResult, SyncError};
use outpost_core::models::{Credentials, SessionToken};
use outpost_core::traits::IRemoteApi;

use crate::observability::events;
use crate::state::SharedSyncState;

/// Exchanges credentials for a bearer token and owns the token slot in [`SharedSyncState`].
pub struct Authenticator {
    remote: Arc<dyn IRemoteApi>,
    state: SharedSyncState,
    timeout: Duration,
}

impl Authenticator {
    pub fn new(remote: Arc<dyn IRemoteApi>, state: SharedSyncState, timeout: Duration) -> Self {
        Self {
            remote,
            state,
            timeout,
        }
    }

    /// Log in once. The previous token is cleared first, so a failure leaves
    /// the system unauthenticated. No retries here.
    pub async fn authenticate(&self, credentials: &Credentials) -> OutpostResult<SessionToken> {
        self.login(credentials, None).await
    }

    /// As [`authenticate`](Self::authenticate), on behalf of the run started
    /// under `epoch`. If that run is stopped before the login completes, the
    /// token is returned but never stored.
    pub async fn authenticate_for(
        &self,
        credentials: &Credentials,
        epoch: u64,
    ) -> OutpostResult<SessionToken> {
        self.login(credentials, Some(epoch)).await
    }

    async fn login(
        &self,
        credentials: &Credentials,
        epoch: Option<u64>,
    ) -> OutpostResult<SessionToken> {
        match epoch {
            Some(epoch) => {
                self.state.clear_token_if_current(epoch);
            }
            None => self.state.clear_token(),
        }
        credentials.validate()?;

        let result = match tokio::time::timeout(self.timeout, self.remote.login(credentials)).await
        {
            Ok(result) => result,
            Err(_) => Err(SyncError::AuthFailed {
                reason: format!("login timed out after {:?}", self.timeout),
            }
            .into()),
        };

        match result {
            Ok(token) => {
                let stored = match epoch {
                    Some(epoch) => self.state.set_token_if_current(epoch, token.clone()),
                    None => {
                        self.state.set_token(token.clone());
                        true
                    }
                };
                if stored {
                    events::auth_succeeded(credentials.admission_no());
                } else {
                    tracing::debug!("outpost: login completed after stop, token discarded");
                }
                Ok(token)
            }
            Err(e) => {
                let err = as_auth_failure(e);
                events::auth_failed(credentials.admission_no(), &err);
                Err(err)
            }
        }
    }

    /// Drop the current token after the remote rejected it.
    pub fn invalidate(&self) {
        if self.state.token().is_some() {
            tracing::debug!("outpost: session token invalidated");
        }
        self.state.clear_token();
    }

    pub fn current_token(&self) -> Option<SessionToken> {
        self.state.token()
    }
}

/// Every login failure, network included, surfaces as an auth failure.
fn as_auth_failure(err: OutpostError) -> OutpostError {
    match err {
        OutpostError::Sync(SyncError::AuthFailed { .. }) => err,
        other => SyncError::AuthFailed {
            reason: other.to_string(),
        }
        .into(),
    }
}
