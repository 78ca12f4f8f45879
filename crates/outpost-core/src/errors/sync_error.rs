/// Reconciliation errors: the taxonomy every remote interaction maps into.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("authentication failed: {reason}")]
    AuthFailed { reason: String },

    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("record '{title}' rejected: {reason}")]
    Validation { title: String, reason: String },

    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    #[error("max retries reached after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}
