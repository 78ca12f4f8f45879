//! Configuration for the reconciliation subsystem.
//!
//! Every section is `serde(default)`, so an empty TOML document yields a
//! fully usable configuration.

mod cache_config;
pub mod defaults;
mod observability_config;
mod remote_config;
mod schedule_config;
mod sync_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use cache_config::CacheConfig;
pub use observability_config::ObservabilityConfig;
pub use remote_config::RemoteConfig;
pub use schedule_config::ScheduleConfig;
pub use sync_config::SyncConfig;

use crate::errors::{ConfigError, OutpostResult};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutpostConfig {
    pub remote: RemoteConfig,
    pub schedule: ScheduleConfig,
    pub sync: SyncConfig,
    pub cache: CacheConfig,
    pub observability: ObservabilityConfig,
}

impl OutpostConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(toml_str: &str) -> OutpostResult<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> OutpostResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&contents)
    }

    /// Reject values that would make the loop spin or never retry sensibly.
    pub fn validate(&self) -> OutpostResult<()> {
        if self.remote.base_url.trim().is_empty() {
            return Err(invalid("remote.base_url", "must not be empty"));
        }
        if self.remote.auth_timeout_ms == 0 {
            return Err(invalid("remote.auth_timeout_ms", "must be greater than zero"));
        }
        if self.remote.probe_timeout_ms == 0 {
            return Err(invalid("remote.probe_timeout_ms", "must be greater than zero"));
        }
        if self.schedule.poll_interval_secs == 0 {
            return Err(invalid("schedule.poll_interval_secs", "must be greater than zero"));
        }
        if self.schedule.base_retry_delay_ms == 0 {
            return Err(invalid("schedule.base_retry_delay_ms", "must be greater than zero"));
        }
        if self.schedule.retry_ceiling_ms < self.schedule.base_retry_delay_ms {
            return Err(invalid(
                "schedule.retry_ceiling_ms",
                "must not be below schedule.base_retry_delay_ms",
            ));
        }
        for kind in &self.sync.kinds {
            if self.sync.timeout_for(*kind).is_zero() {
                return Err(invalid(
                    &format!("sync.{}_timeout_ms", kind.as_str()),
                    "must be greater than zero",
                ));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> crate::errors::OutpostError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
