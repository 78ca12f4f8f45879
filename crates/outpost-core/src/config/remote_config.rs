use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Where the authoritative server lives and how long auth and probe calls may take.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base address, e.g. `https://school.example.org`.
    pub base_url: String,
    /// Timeout for `POST /auth/login`.
    pub auth_timeout_ms: u64,
    /// Timeout for `GET /api/health`.
    pub probe_timeout_ms: u64,
}

impl RemoteConfig {
    pub fn auth_timeout(&self) -> Duration {
        Duration::from_millis(self.auth_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_BASE_URL.to_string(),
            auth_timeout_ms: defaults::DEFAULT_AUTH_TIMEOUT_MS,
            probe_timeout_ms: defaults::DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}
