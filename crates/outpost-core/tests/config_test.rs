use std::time::Duration;

use outpost_core::config::*;
use outpost_core::models::EntityKind;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = OutpostConfig::from_toml("").unwrap();

    // Remote defaults
    assert_eq!(config.remote.base_url, "http://127.0.0.1:5000");
    assert_eq!(config.remote.auth_timeout(), Duration::from_secs(10));
    assert_eq!(config.remote.probe_timeout(), Duration::from_secs(5));

    // Schedule defaults
    assert_eq!(config.schedule.poll_interval(), Duration::from_secs(30));
    assert_eq!(config.schedule.base_retry_delay(), Duration::from_secs(1));
    assert_eq!(config.schedule.retry_ceiling(), Duration::from_secs(60));
    assert_eq!(config.schedule.max_retries, 5);

    // Sync defaults
    assert_eq!(config.sync.kinds, EntityKind::ALL.to_vec());
    assert!(
        config.sync.timeout_for(EntityKind::Notices) < config.sync.timeout_for(EntityKind::Reports)
    );
    assert_eq!(
        config.sync.timeout_for(EntityKind::Reports),
        config.sync.timeout_for(EntityKind::Media)
    );

    // Cache + observability defaults
    assert_eq!(config.cache.dir, std::path::PathBuf::from(".outpost/cache"));
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[remote]
base_url = "https://school.example.org"

[schedule]
max_retries = 8
base_retry_delay_ms = 250

[sync]
kinds = ["notices", "media"]
"#;
    let config = OutpostConfig::from_toml(toml).unwrap();
    assert_eq!(config.remote.base_url, "https://school.example.org");
    assert_eq!(config.schedule.max_retries, 8);
    assert_eq!(config.schedule.base_retry_delay(), Duration::from_millis(250));
    // Non-overridden fields keep defaults
    assert_eq!(config.schedule.poll_interval_secs, 30);
    assert_eq!(config.remote.probe_timeout_ms, 5_000);
    assert_eq!(config.sync.kinds, vec![EntityKind::Notices, EntityKind::Media]);
}

#[test]
fn config_rejects_zero_poll_interval() {
    let err = OutpostConfig::from_toml("[schedule]\npoll_interval_secs = 0\n").unwrap_err();
    assert!(err.to_string().contains("schedule.poll_interval_secs"));
}

#[test]
fn config_rejects_ceiling_below_base_delay() {
    let toml = "[schedule]\nbase_retry_delay_ms = 5000\nretry_ceiling_ms = 1000\n";
    let err = OutpostConfig::from_toml(toml).unwrap_err();
    assert!(err.to_string().contains("schedule.retry_ceiling_ms"));
}

#[test]
fn config_rejects_unknown_kind() {
    let result = OutpostConfig::from_toml("[sync]\nkinds = [\"grades\"]\n");
    assert!(result.is_err());
}

#[test]
fn config_rejects_malformed_toml() {
    let err = OutpostConfig::from_toml("[remote\nbase_url = 1").unwrap_err();
    assert!(err.to_string().contains("failed to parse config"));
}

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("outpost.toml");
    std::fs::write(&path, "[schedule]\npoll_interval_secs = 90\n").unwrap();

    let config = OutpostConfig::from_file(&path).unwrap();
    assert_eq!(config.schedule.poll_interval(), Duration::from_secs(90));
}

#[test]
fn config_missing_file_reports_path() {
    let err = OutpostConfig::from_file("/nonexistent/outpost.toml").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/outpost.toml"));
}
