//! Liveness check classification.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use outpost_core::models::SessionToken;
use outpost_core::traits::{HealthStatus, IRemoteApi};

/// Outcome of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    AuthExpired,
    Unreachable(String),
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => f.write_str("online"),
            Self::AuthExpired => f.write_str("auth_expired"),
            Self::Unreachable(cause) => write!(f, "unreachable: {cause}"),
        }
    }
}

/// Bounded-timeout call to the remote liveness endpoint.
pub struct ConnectivityProbe {
    remote: Arc<dyn IRemoteApi>,
    timeout: Duration,
}

impl ConnectivityProbe {
    pub fn new(remote: Arc<dyn IRemoteApi>, timeout: Duration) -> Self {
        Self { remote, timeout }
    }

    /// Classify connectivity. Without a token there is nothing to check, so
    /// the result is `AuthExpired` and no request is made.
    pub async fn probe(&self, token: Option<&SessionToken>) -> Connectivity {
        let Some(token) = token else {
            return Connectivity::AuthExpired;
        };

        match tokio::time::timeout(self.timeout, self.remote.health(token)).await {
            Err(_) => Connectivity::Unreachable(format!("probe timed out after {:?}", self.timeout)),
            Ok(Ok(HealthStatus::Healthy)) => Connectivity::Online,
            Ok(Ok(HealthStatus::Unauthorized { .. })) => Connectivity::AuthExpired,
            Ok(Ok(HealthStatus::Unavailable { status })) => {
                Connectivity::Unreachable(format!("health check returned HTTP {status}"))
            }
            Ok(Err(e)) if e.is_auth_failure() => Connectivity::AuthExpired,
            Ok(Err(e)) => Connectivity::Unreachable(e.to_string()),
        }
    }
}
