//! EntitySyncPipeline: snapshot load, identity strip, bulk push.

use std::sync::Arc;
use std::time::Duration;

use outpost_core::models::{Credentials, EntityKind, KindReport, SessionToken};
use outpost_core::traits::{ILocalCache, IRemoteApi};
use outpost_sync::{EntitySyncPipeline, FileCache, LoopbackRemote};
use serde_json::json;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    cache: Arc<FileCache>,
    remote: Arc<LoopbackRemote>,
    token: SessionToken,
}

async fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(FileCache::new(dir.path()));
    let remote = Arc::new(LoopbackRemote::new().with_account("ADM-001", "s3cret"));
    let token = remote
        .login(&Credentials::new("ADM-001", "s3cret"))
        .await
        .unwrap();
    Fixture {
        _dir: dir,
        cache,
        remote,
        token,
    }
}

fn pipeline(f: &Fixture, kind: EntityKind) -> EntitySyncPipeline {
    EntitySyncPipeline::new(kind, f.cache.clone(), f.remote.clone(), Duration::from_secs(15))
}

fn notices() -> Vec<serde_json::Value> {
    vec![
        json!({
            "_id": "n1",
            "title": "Annual Day",
            "organizationName": "Student Council",
            "eventStartDate": "2024-03-01",
            "eventEndDate": "2024-03-02",
        }),
        json!({
            "id": 2,
            "title": "Sports Day",
            "organizationName": "PE Department",
            "eventStartDate": "2024-04-10",
            "eventEndDate": "2024-04-10",
        }),
    ]
}

#[tokio::test]
async fn missing_snapshot_is_nothing_to_sync() {
    let f = fixture().await;
    let report = pipeline(&f, EntityKind::Media).sync_local_to_remote(&f.token).await.unwrap();

    assert_eq!(report, KindReport::NothingToSync);
    assert_eq!(f.remote.sync_calls(), 0);
}

#[tokio::test]
async fn unreadable_snapshot_is_nothing_to_sync() {
    let f = fixture().await;
    std::fs::write(f.cache.path_for(EntityKind::Reports), "][").unwrap();

    let report = pipeline(&f, EntityKind::Reports).sync_local_to_remote(&f.token).await.unwrap();
    assert_eq!(report, KindReport::NothingToSync);
    assert_eq!(f.remote.sync_calls(), 0);
}

#[tokio::test]
async fn pushes_stripped_records_and_returns_outcome() {
    let f = fixture().await;
    f.cache.save(EntityKind::Notices, &notices()).unwrap();

    let report = pipeline(&f, EntityKind::Notices).sync_local_to_remote(&f.token).await.unwrap();
    let KindReport::Completed(outcome) = report else {
        panic!("expected completed report");
    };
    assert_eq!(outcome.created.len(), 2);

    f.remote.with_store(|store| {
        for stored in store.records(EntityKind::Notices) {
            assert!(stored.record.local_id().is_none());
        }
    });

    // Local snapshot is never pruned.
    assert_eq!(f.cache.load(EntityKind::Notices).unwrap().len(), 2);
}

#[tokio::test]
async fn wrongly_typed_entry_is_reported_as_failed_by_name() {
    let f = fixture().await;
    let mut entries = notices();
    entries.insert(
        1,
        json!({
            "_id": "n-bad",
            "title": 42,
            "organizationName": "Chess Club",
            "eventStartDate": "2024-05-01",
            "eventEndDate": "2024-05-01",
        }),
    );
    f.cache.save(EntityKind::Notices, &entries).unwrap();

    let report = pipeline(&f, EntityKind::Notices).sync_local_to_remote(&f.token).await.unwrap();
    let KindReport::Completed(outcome) = report else {
        panic!("expected completed report");
    };

    let summary = outcome.summary();
    assert_eq!((summary.total, summary.created, summary.failed), (3, 2, 1));
    assert_eq!(outcome.failed[0].title, "42");
    assert_eq!(f.remote.with_store(|s| s.len(EntityKind::Notices)), 2);
}

#[tokio::test]
async fn second_pass_skips_everything() {
    let f = fixture().await;
    f.cache.save(EntityKind::Notices, &notices()).unwrap();
    let pipeline = pipeline(&f, EntityKind::Notices);

    pipeline.sync_local_to_remote(&f.token).await.unwrap();
    let second = pipeline.sync_local_to_remote(&f.token).await.unwrap();

    let summary = second.summary();
    assert_eq!((summary.created, summary.skipped), (0, 2));
}

#[tokio::test]
async fn transport_failure_is_a_pipeline_error() {
    let f = fixture().await;
    f.cache.save(EntityKind::Notices, &notices()).unwrap();
    f.remote.fail_kind(EntityKind::Notices);

    let err = pipeline(&f, EntityKind::Notices)
        .sync_local_to_remote(&f.token)
        .await
        .unwrap_err();
    assert!(err.is_transport_failure());
}

#[tokio::test]
async fn rejected_token_is_an_auth_error() {
    let f = fixture().await;
    f.cache.save(EntityKind::Notices, &notices()).unwrap();
    f.remote.expire_tokens();

    let err = pipeline(&f, EntityKind::Notices)
        .sync_local_to_remote(&f.token)
        .await
        .unwrap_err();
    assert!(err.is_auth_failure());
}

#[tokio::test(start_paused = true)]
async fn slow_upload_times_out() {
    let f = fixture().await;
    f.cache.save(EntityKind::Notices, &notices()).unwrap();
    f.remote.set_latency(Duration::from_secs(120));

    let err = pipeline(&f, EntityKind::Notices)
        .sync_local_to_remote(&f.token)
        .await
        .unwrap_err();
    assert!(err.is_transport_failure());
    assert!(err.to_string().contains("timed out"));
    assert_eq!(f.remote.with_store(|s| s.len(EntityKind::Notices)), 0);
}
