//! One reconciliation pipeline per entity kind: load, strip, push.

use std::sync::Arc;
use std::time::Duration;

use outpost_core::errors::{OutpostResult, SyncError};
use outpost_core::models::{EntityKind, EntityRecord, KindReport, SessionToken};
use outpost_core::traits::{ILocalCache, IRemoteApi};

use crate::observability::events;

pub struct EntitySyncPipeline {
    kind: EntityKind,
    cache: Arc<dyn ILocalCache>,
    remote: Arc<dyn IRemoteApi>,
    timeout: Duration,
}

impl EntitySyncPipeline {
    pub fn new(
        kind: EntityKind,
        cache: Arc<dyn ILocalCache>,
        remote: Arc<dyn IRemoteApi>,
        timeout: Duration,
    ) -> Self {
        Self {
            kind,
            cache,
            remote,
            timeout,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Push the kind's local snapshot to the remote bulk-upsert endpoint.
    ///
    /// A missing or unreadable snapshot is nothing to sync. Identity fields
    /// are stripped before upload. The outcome is returned as the remote
    /// reported it; the local snapshot is left untouched.
    pub async fn sync_local_to_remote(&self, token: &SessionToken) -> OutpostResult<KindReport> {
        let records = match self.cache.load(self.kind) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(kind = %self.kind, error = %e, "outpost: local snapshot unreadable, treating as empty");
                Vec::new()
            }
        };

        if records.is_empty() {
            events::kind_nothing_to_sync(self.kind);
            return Ok(KindReport::NothingToSync);
        }

        let stripped: Vec<EntityRecord> = records.iter().map(EntityRecord::strip_identity).collect();

        let outcome = match tokio::time::timeout(
            self.timeout,
            self.remote.sync_local(self.kind, &stripped, token),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(SyncError::Transport {
                    reason: format!("{} sync-local timed out after {:?}", self.kind, self.timeout),
                }
                .into())
            }
        };

        events::kind_synced(self.kind, outcome.summary());
        Ok(KindReport::Completed(outcome))
    }
}
