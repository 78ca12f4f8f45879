/// Local snapshot store errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error at {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("malformed snapshot at {path}: {reason}")]
    Malformed { path: String, reason: String },
}
