//! reqwest-backed remote with per-endpoint timeouts and gzip.

use std::time::Duration;

use async_trait::async_trait;
use outpost_core::config::{OutpostConfig, RemoteConfig, SyncConfig};
use outpost_core::errors::{OutpostError, OutpostResult, SyncError};
use outpost_core::models::{Credentials, EntityKind, EntityRecord, SessionToken, SyncOutcome};
use outpost_core::traits::{HealthStatus, IRemoteApi};
use reqwest::StatusCode;

use super::protocol::{sync_local_body, LoginRequest, LoginResponse, SyncLocalResponse};

/// Connection establishment bound, independent of per-request timeouts.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP transport to the authoritative server.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    remote: RemoteConfig,
    sync: SyncConfig,
}

impl HttpRemote {
    pub fn new(remote: RemoteConfig, sync: SyncConfig) -> OutpostResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .gzip(true)
            .build()
            .map_err(|e| SyncError::Configuration {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            remote,
            sync,
        })
    }

    pub fn from_config(config: &OutpostConfig) -> OutpostResult<Self> {
        Self::new(config.remote.clone(), config.sync.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.remote.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl IRemoteApi for HttpRemote {
    async fn login(&self, credentials: &Credentials) -> OutpostResult<SessionToken> {
        let body = LoginRequest {
            admission_no: credentials.admission_no().to_string(),
            password: credentials.password().to_string(),
        };
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(&body)
            .timeout(self.remote.auth_timeout())
            .send()
            .await
            .map_err(transport_err)?;

        let status = resp.status();
        if is_auth_status(status) {
            return Err(SyncError::AuthFailed {
                reason: format!("credentials rejected (HTTP {})", status.as_u16()),
            }
            .into());
        }
        if !status.is_success() {
            return Err(status_err(status, resp).await);
        }

        let login = resp
            .json::<LoginResponse>()
            .await
            .map_err(|e| SyncError::AuthFailed {
                reason: format!("malformed login response: {e}"),
            })?;
        Ok(SessionToken::new(login.access_token))
    }

    async fn health(&self, token: &SessionToken) -> OutpostResult<HealthStatus> {
        let resp = self
            .client
            .get(self.url("/api/health"))
            .bearer_auth(token.as_str())
            .timeout(self.remote.probe_timeout())
            .send()
            .await
            .map_err(transport_err)?;

        let status = resp.status();
        Ok(if status.is_success() {
            HealthStatus::Healthy
        } else if is_auth_status(status) {
            HealthStatus::Unauthorized {
                status: status.as_u16(),
            }
        } else {
            HealthStatus::Unavailable {
                status: status.as_u16(),
            }
        })
    }

    async fn sync_local(
        &self,
        kind: EntityKind,
        records: &[EntityRecord],
        token: &SessionToken,
    ) -> OutpostResult<SyncOutcome> {
        let body = sync_local_body(kind, records)?;
        let resp = self
            .client
            .post(self.url(&kind.sync_local_path()))
            .bearer_auth(token.as_str())
            .json(&body)
            .timeout(self.sync.timeout_for(kind))
            .send()
            .await
            .map_err(transport_err)?;

        let status = resp.status();
        if is_auth_status(status) {
            return Err(SyncError::AuthFailed {
                reason: format!("{kind} sync-local rejected token (HTTP {})", status.as_u16()),
            }
            .into());
        }
        if !status.is_success() {
            return Err(status_err(status, resp).await);
        }

        let response = resp
            .json::<SyncLocalResponse>()
            .await
            .map_err(|e| SyncError::Transport {
                reason: format!("malformed {kind} sync-local response: {e}"),
            })?;
        Ok(response.into_outcome(kind))
    }
}

fn is_auth_status(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

fn transport_err(e: reqwest::Error) -> OutpostError {
    let reason = if e.is_timeout() {
        format!("request timed out: {e}")
    } else {
        e.to_string()
    };
    SyncError::Transport { reason }.into()
}

async fn status_err(status: StatusCode, resp: reqwest::Response) -> OutpostError {
    let body = resp.text().await.unwrap_or_default();
    SyncError::Transport {
        reason: format!("HTTP {status}: {body}"),
    }
    .into()
}
