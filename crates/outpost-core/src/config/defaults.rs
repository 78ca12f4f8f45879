// Single source of truth for all default values.

// --- Remote ---
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_AUTH_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;

// --- Schedule ---
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_BASE_RETRY_DELAY_MS: u64 = 1_000;
pub const DEFAULT_RETRY_CEILING_MS: u64 = 60_000;
pub const DEFAULT_MAX_RETRIES: u32 = 5;

// --- Sync ---
pub const DEFAULT_NOTICES_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_REPORTS_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_MEDIA_TIMEOUT_MS: u64 = 60_000;

// --- Cache ---
pub const DEFAULT_CACHE_DIR: &str = ".outpost/cache";

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
