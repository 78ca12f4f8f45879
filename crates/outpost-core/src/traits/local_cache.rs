use crate::errors::OutpostResult;
use crate::models::{EntityKind, EntityRecord};

/// Durable per-kind snapshot store on the client.
pub trait ILocalCache: Send + Sync {
    /// Load the snapshot for `kind`. A snapshot that was never written is empty, not an error.
    fn load(&self, kind: EntityKind) -> OutpostResult<Vec<EntityRecord>>;
}
