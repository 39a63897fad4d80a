//! Storage backend tests
//!
//! Contract tests over both backends: uniqueness enforcement, cascade
//! deletion, the click-counter invariant (including under concurrency on
//! the in-memory backend) and ordering guarantees. SQLite runs against a
//! temporary database file.

use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;
use uuid::Uuid;

use linktracker::errors::LinkTrackerError;
use linktracker::storage::{ClickDetail, Link, MemoryStorage, SeaOrmStorage, Storage};

fn make_link(code: &str, destination: &str) -> Link {
    Link {
        id: Uuid::new_v4().to_string(),
        destination_url: destination.to_string(),
        short_code: code.to_string(),
        title: "Untitled Link".to_string(),
        source: None,
        created_at: Utc::now(),
        total_clicks: 0,
    }
}

fn make_click(link_id: &str, ip: &str) -> ClickDetail {
    ClickDetail::new(link_id, ip, "Mozilla/5.0", "https://a.com/page")
}

async fn create_sqlite_storage() -> (Arc<dyn Storage>, TempDir) {
    let td = TempDir::new().unwrap();
    let path = td.path().join("storage_test.db");
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let storage = SeaOrmStorage::new(&url, "sqlite").await.unwrap();
    (Arc::new(storage), td)
}

// =============================================================================
// Shared contract checks, run against both backends
// =============================================================================

async fn check_crud_roundtrip(storage: &Arc<dyn Storage>) {
    let link = make_link("Ab3dE9", "https://example.com/x");
    storage.create_link(link.clone()).await.unwrap();

    // timestamps may lose sub-millisecond precision in the database
    for reloaded in [
        storage.get_by_code("Ab3dE9").await.unwrap().unwrap(),
        storage.get_by_id(&link.id).await.unwrap().unwrap(),
    ] {
        assert_eq!(reloaded.id, link.id);
        assert_eq!(reloaded.short_code, link.short_code);
        assert_eq!(reloaded.destination_url, link.destination_url);
        assert_eq!(reloaded.title, link.title);
        assert_eq!(reloaded.total_clicks, 0);
        let drift = (reloaded.created_at - link.created_at).num_milliseconds().abs();
        assert!(drift < 5, "created_at drifted by {}ms", drift);
    }

    assert!(storage.get_by_code("nope00").await.unwrap().is_none());
    assert!(storage.get_by_id("no-such-id").await.unwrap().is_none());
}

async fn check_duplicate_code_conflict(storage: &Arc<dyn Storage>) {
    storage
        .create_link(make_link("dup123", "https://one.example"))
        .await
        .unwrap();

    let err = storage
        .create_link(make_link("dup123", "https://two.example"))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkTrackerError::CodeConflict(_)));

    // the original row is untouched
    let kept = storage.get_by_code("dup123").await.unwrap().unwrap();
    assert_eq!(kept.destination_url, "https://one.example");
}

async fn check_click_counter_invariant(storage: &Arc<dyn Storage>) {
    let link = make_link("clicks", "https://example.com");
    storage.create_link(link.clone()).await.unwrap();

    for i in 0..5 {
        storage
            .record_click(make_click(&link.id, &format!("203.0.113.{}", i)))
            .await
            .unwrap();
    }

    let reloaded = storage.get_by_id(&link.id).await.unwrap().unwrap();
    assert_eq!(reloaded.total_clicks, 5);

    let clicks = storage.clicks_for_link(&link.id).await.unwrap();
    assert_eq!(clicks.len(), 5);
    // most recent first
    assert!(clicks.windows(2).all(|w| w[0].clicked_at >= w[1].clicked_at));
}

async fn check_record_click_unknown_link(storage: &Arc<dyn Storage>) {
    let err = storage
        .record_click(make_click("no-such-id", "203.0.113.1"))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkTrackerError::NotFound(_)));
}

async fn check_delete_cascades(storage: &Arc<dyn Storage>) {
    let keep = make_link("keepme", "https://keep.example");
    let doomed = make_link("dropme", "https://drop.example");
    storage.create_link(keep.clone()).await.unwrap();
    storage.create_link(doomed.clone()).await.unwrap();

    storage.record_click(make_click(&keep.id, "198.51.100.1")).await.unwrap();
    storage.record_click(make_click(&doomed.id, "198.51.100.2")).await.unwrap();
    storage.record_click(make_click(&doomed.id, "198.51.100.3")).await.unwrap();

    storage.delete_link(&doomed.id).await.unwrap();

    assert!(storage.get_by_id(&doomed.id).await.unwrap().is_none());
    assert!(storage.get_by_code("dropme").await.unwrap().is_none());
    assert!(storage.clicks_for_link(&doomed.id).await.unwrap().is_empty());

    // the surviving link keeps its history
    assert_eq!(storage.clicks_for_link(&keep.id).await.unwrap().len(), 1);

    let stats = storage.stats().await.unwrap();
    assert_eq!(stats.links_count, 1);
    assert_eq!(stats.clicks_count, 1);

    // deleting again is not an error
    storage.delete_link(&doomed.id).await.unwrap();
}

// =============================================================================
// Memory backend
// =============================================================================

#[tokio::test]
async fn test_memory_crud_roundtrip() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    check_crud_roundtrip(&storage).await;
}

#[tokio::test]
async fn test_memory_duplicate_code_conflict() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    check_duplicate_code_conflict(&storage).await;
}

#[tokio::test]
async fn test_memory_click_counter_invariant() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    check_click_counter_invariant(&storage).await;
}

#[tokio::test]
async fn test_memory_record_click_unknown_link() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    check_record_click_unknown_link(&storage).await;
}

#[tokio::test]
async fn test_memory_delete_cascades() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    check_delete_cascades(&storage).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_memory_concurrent_clicks_no_lost_updates() {
    const CONCURRENT_CLICKS: usize = 50;

    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let link = make_link("burst1", "https://example.com");
    storage.create_link(link.clone()).await.unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..CONCURRENT_CLICKS {
        let storage = storage.clone();
        let link_id = link.id.clone();
        tasks.spawn(async move {
            storage
                .record_click(make_click(&link_id, &format!("203.0.113.{}", i % 16)))
                .await
                .unwrap();
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap();
    }

    let reloaded = storage.get_by_id(&link.id).await.unwrap().unwrap();
    assert_eq!(reloaded.total_clicks, CONCURRENT_CLICKS as i64);
    assert_eq!(
        storage.clicks_for_link(&link.id).await.unwrap().len(),
        CONCURRENT_CLICKS
    );
}

#[tokio::test]
async fn test_memory_list_order_deterministic() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

    // identical timestamps force the id tie-break
    let ts = Utc::now();
    let mut links: Vec<Link> = (0..4)
        .map(|i| {
            let mut link = make_link(&format!("same0{}", i), "https://example.com");
            link.created_at = ts;
            link
        })
        .collect();
    for link in &links {
        storage.create_link(link.clone()).await.unwrap();
    }

    links.sort_by(|a, b| b.id.cmp(&a.id));
    let expected: Vec<String> = links.into_iter().map(|l| l.id).collect();

    for _ in 0..3 {
        let listed: Vec<String> = storage
            .list_links()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(listed, expected);
    }
}

// =============================================================================
// SQLite backend
// =============================================================================

#[tokio::test]
async fn test_sqlite_crud_roundtrip() {
    let (storage, _td) = create_sqlite_storage().await;
    check_crud_roundtrip(&storage).await;
}

#[tokio::test]
async fn test_sqlite_duplicate_code_conflict() {
    let (storage, _td) = create_sqlite_storage().await;
    check_duplicate_code_conflict(&storage).await;
}

#[tokio::test]
async fn test_sqlite_click_counter_invariant() {
    let (storage, _td) = create_sqlite_storage().await;
    check_click_counter_invariant(&storage).await;
}

#[tokio::test]
async fn test_sqlite_record_click_unknown_link() {
    let (storage, _td) = create_sqlite_storage().await;
    check_record_click_unknown_link(&storage).await;
}

#[tokio::test]
async fn test_sqlite_delete_cascades() {
    let (storage, _td) = create_sqlite_storage().await;
    check_delete_cascades(&storage).await;
}

#[tokio::test]
async fn test_sqlite_list_newest_first() {
    let (storage, _td) = create_sqlite_storage().await;

    let mut ids = Vec::new();
    for i in 0..3 {
        let mut link = make_link(&format!("order{}", i), "https://example.com");
        link.created_at = Utc::now() + chrono::Duration::seconds(i);
        storage.create_link(link.clone()).await.unwrap();
        ids.push(link.id);
    }

    let listed: Vec<String> = storage
        .list_links()
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    ids.reverse();
    assert_eq!(listed, ids);
}
