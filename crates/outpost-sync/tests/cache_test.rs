//! File-backed local snapshots.

use outpost_core::errors::{CacheError, OutpostError};
use outpost_core::models::EntityKind;
use outpost_core::traits::ILocalCache;
use outpost_sync::FileCache;
use serde_json::json;

#[test]
fn missing_file_is_an_empty_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(dir.path());
    assert!(cache.load(EntityKind::Notices).unwrap().is_empty());
}

#[test]
fn save_then_load_keeps_order_and_unknown_fields() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(dir.path().join("nested"));
    cache
        .save(
            EntityKind::Reports,
            &[
                json!({"_id": "r1", "title": "Q1", "pages": 3}),
                json!({"_id": "r2", "title": "Q2"}),
            ],
        )
        .unwrap();

    assert!(cache.path_for(EntityKind::Reports).ends_with("reports.json"));
    let records = cache.load(EntityKind::Reports).unwrap();
    let titles: Vec<_> = records.iter().filter_map(|r| r.title()).collect();
    assert_eq!(titles, vec!["Q1", "Q2"]);
    assert_eq!(records[0].extra().get("pages"), Some(&json!(3)));
    assert_eq!(records[0].local_id(), Some(&json!("r1")));
}

#[test]
fn save_leaves_no_temp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(dir.path());
    cache.save(EntityKind::Media, &[json!({"fileName": "a.png"})]).unwrap();

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["media.json".to_string()]);
}

#[test]
fn document_without_the_kind_key_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notices.json"), r#"{"other": []}"#).unwrap();
    let cache = FileCache::new(dir.path());
    assert!(cache.load(EntityKind::Notices).unwrap().is_empty());
}

#[test]
fn invalid_json_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notices.json"), "{not json").unwrap();
    let cache = FileCache::new(dir.path());

    let err = cache.load(EntityKind::Notices).unwrap_err();
    assert!(matches!(err, OutpostError::Cache(CacheError::Malformed { .. })));
}

#[test]
fn non_array_payload_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("media.json"), r#"{"media": {"fileName": "a"}}"#).unwrap();
    let cache = FileCache::new(dir.path());

    let err = cache.load(EntityKind::Media).unwrap_err();
    assert!(err.to_string().contains("media.json"));
}

#[test]
fn entry_failing_the_schema_is_kept_unchecked() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("media.json"),
        r#"{"media": [{"_id": 9, "fileName": ["a", "b"], "mediaType": "image"}]}"#,
    )
    .unwrap();
    let cache = FileCache::new(dir.path());

    let records = cache.load(EntityKind::Media).unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_unchecked());
    assert_eq!(records[0].kind(), EntityKind::Media);

    let wire = serde_json::to_value(records[0].strip_identity()).unwrap();
    assert_eq!(wire, json!({"fileName": ["a", "b"], "mediaType": "image"}));
}

#[test]
fn non_object_entries_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("reports.json"),
        r#"{"reports": [1, "two", {"title": "three"}]}"#,
    )
    .unwrap();
    let cache = FileCache::new(dir.path());

    let records = cache.load(EntityKind::Reports).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title(), Some("three"));
}
