//! LinkService integration tests
//!
//! Creation (generated and custom codes), validation, conflict handling,
//! listing order and idempotent deletion over the in-memory backend.

use std::sync::Arc;

use linktracker::errors::LinkTrackerError;
use linktracker::services::{CreateLinkRequest, LinkService};
use linktracker::storage::{MemoryStorage, Storage};

fn setup() -> (LinkService, Arc<dyn Storage>) {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    (LinkService::new(storage.clone()), storage)
}

fn create_request(destination: &str) -> CreateLinkRequest {
    CreateLinkRequest {
        destination_url: destination.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_then_get_by_code_roundtrip() {
    let (service, storage) = setup();

    let result = service
        .create_link(create_request("https://example.com/x"))
        .await
        .unwrap();

    let found = storage
        .get_by_code(&result.link.short_code)
        .await
        .unwrap()
        .expect("link should be retrievable by its short code");

    assert_eq!(found.destination_url, "https://example.com/x");
    assert_eq!(found.id, result.link.id);
    assert_eq!(found.total_clicks, 0);
}

#[tokio::test]
async fn test_generated_code_shape() {
    let (service, _) = setup();

    let first = service
        .create_link(create_request("https://example.com/a"))
        .await
        .unwrap();
    let second = service
        .create_link(create_request("https://example.com/b"))
        .await
        .unwrap();

    for result in [&first, &second] {
        assert!(result.generated_code);
        assert_eq!(result.link.short_code.len(), 6);
        assert!(result
            .link
            .short_code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric()));
    }
    assert_ne!(first.link.short_code, second.link.short_code);
}

#[tokio::test]
async fn test_default_title_and_source_passthrough() {
    let (service, _) = setup();

    let untitled = service
        .create_link(create_request("https://example.com"))
        .await
        .unwrap();
    assert_eq!(untitled.link.title, "Untitled Link");
    assert_eq!(untitled.link.source, None);

    let titled = service
        .create_link(CreateLinkRequest {
            destination_url: "https://example.com".to_string(),
            title: Some("Launch post".to_string()),
            source: Some("newsletter".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titled.link.title, "Launch post");
    assert_eq!(titled.link.source.as_deref(), Some("newsletter"));
}

#[tokio::test]
async fn test_empty_destination_rejected() {
    let (service, storage) = setup();

    for destination in ["", "   "] {
        let err = service
            .create_link(create_request(destination))
            .await
            .unwrap_err();
        assert!(matches!(err, LinkTrackerError::Validation(_)));
    }

    assert_eq!(storage.stats().await.unwrap().links_count, 0);
}

#[tokio::test]
async fn test_custom_code_is_used() {
    let (service, storage) = setup();

    let result = service
        .create_link(CreateLinkRequest {
            destination_url: "https://example.com".to_string(),
            custom_code: Some("launch-2026".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(!result.generated_code);
    assert_eq!(result.link.short_code, "launch-2026");
    assert!(storage.get_by_code("launch-2026").await.unwrap().is_some());
}

#[tokio::test]
async fn test_invalid_custom_code_rejected() {
    let (service, _) = setup();

    let err = service
        .create_link(CreateLinkRequest {
            destination_url: "https://example.com".to_string(),
            custom_code: Some("has space".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, LinkTrackerError::Validation(_)));
}

#[tokio::test]
async fn test_custom_code_conflict_leaves_store_unchanged() {
    let (service, storage) = setup();

    service
        .create_link(CreateLinkRequest {
            destination_url: "https://first.example".to_string(),
            custom_code: Some("taken".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let err = service
        .create_link(CreateLinkRequest {
            destination_url: "https://second.example".to_string(),
            custom_code: Some("taken".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, LinkTrackerError::CodeConflict(_)));

    let stats = storage.stats().await.unwrap();
    assert_eq!(stats.links_count, 1);
    let kept = storage.get_by_code("taken").await.unwrap().unwrap();
    assert_eq!(kept.destination_url, "https://first.example");
}

#[tokio::test]
async fn test_list_links_newest_first() {
    let (service, _) = setup();

    let mut created_ids = Vec::new();
    for i in 0..3 {
        let result = service
            .create_link(create_request(&format!("https://example.com/{}", i)))
            .await
            .unwrap();
        created_ids.push(result.link.id);
    }

    let listed = service.list_links().await.unwrap();
    assert_eq!(listed.len(), 3);
    // newest creation first: reverse of insertion order
    let listed_ids: Vec<String> = listed.into_iter().map(|l| l.id).collect();
    created_ids.reverse();
    assert_eq!(listed_ids, created_ids);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (service, storage) = setup();

    let result = service
        .create_link(create_request("https://example.com"))
        .await
        .unwrap();

    service.delete_link(&result.link.id).await.unwrap();
    assert!(storage.get_by_id(&result.link.id).await.unwrap().is_none());

    // second delete of the same id, and a delete of a never-existing id
    service.delete_link(&result.link.id).await.unwrap();
    service.delete_link("no-such-id").await.unwrap();
}
