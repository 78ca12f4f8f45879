use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::EntityKind;

/// Which entity kinds are reconciled and how long each bulk upload may take.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Kinds that get a pipeline. Order is irrelevant.
    pub kinds: Vec<EntityKind>,
    pub notices_timeout_ms: u64,
    pub reports_timeout_ms: u64,
    pub media_timeout_ms: u64,
}

impl SyncConfig {
    /// Bulk-upsert timeout for the given kind.
    pub fn timeout_for(&self, kind: EntityKind) -> Duration {
        let ms = match kind {
            EntityKind::Notices => self.notices_timeout_ms,
            EntityKind::Reports => self.reports_timeout_ms,
            EntityKind::Media => self.media_timeout_ms,
        };
        Duration::from_millis(ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            kinds: EntityKind::ALL.to_vec(),
            notices_timeout_ms: defaults::DEFAULT_NOTICES_TIMEOUT_MS,
            reports_timeout_ms: defaults::DEFAULT_REPORTS_TIMEOUT_MS,
            media_timeout_ms: defaults::DEFAULT_MEDIA_TIMEOUT_MS,
        }
    }
}
