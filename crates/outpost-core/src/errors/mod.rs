//! Error types for the Outpost workspace.
//!
//! Each concern has its own `thiserror` enum; [`OutpostError`] wraps them so
//! every fallible operation can return [`OutpostResult`].

mod cache_error;
mod config_error;
mod sync_error;

pub use cache_error::CacheError;
pub use config_error::ConfigError;
pub use sync_error::SyncError;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum OutpostError {
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OutpostError {
    /// Bad credentials or a rejected/expired token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Sync(SyncError::AuthFailed { .. }))
    }

    /// Timeout, DNS, refused connection, or an unexpected HTTP status.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Sync(SyncError::Transport { .. }))
    }

    /// Backoff gave up on the current chain of probes.
    pub fn is_retries_exhausted(&self) -> bool {
        matches!(self, Self::Sync(SyncError::RetriesExhausted { .. }))
    }
}

/// Result alias used across the workspace.
pub type OutpostResult<T> = Result<T, OutpostError>;
