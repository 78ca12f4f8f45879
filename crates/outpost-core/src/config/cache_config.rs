use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Local snapshot store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one `<kind>.json` snapshot per entity kind.
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(defaults::DEFAULT_CACHE_DIR),
        }
    }
}
