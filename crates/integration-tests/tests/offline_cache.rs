//! Offline tolerance: reads fall back to the cache, writes never do, and
//! transient failures are retried within bounds.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use tandem_client::{ApiError, Source};
use tandem_core::{
    ActivityFilter, ActivityStatus, BookStatus, Category, Cost, Difficulty, NewActivity,
    NewBlogEntry, NewBook, NewGoal,
};
use tandem_integration_tests::{TestBackend, connect_paired, connect_with};

fn activity(title: &str, category: Category) -> NewActivity {
    NewActivity {
        title: title.to_owned(),
        description: String::new(),
        status: ActivityStatus::Planned,
        category,
        difficulty: Difficulty::Easy,
        duration: 60,
        cost: Cost::Free,
        season: None,
        mood: None,
    }
}

// ============================================================================
// Cache fallback
// ============================================================================

#[tokio::test]
async fn test_listing_falls_back_to_cache_when_the_backend_dies() {
    let mut backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;
    device
        .client
        .create_activity(&activity("Stargazing", Category::Outdoor))
        .await
        .unwrap();

    let live = device
        .client
        .list_activities(&ActivityFilter::default())
        .await
        .unwrap();
    assert_eq!(live.source, Source::Live);

    backend.stop().await;

    let cached = device
        .client
        .list_activities(&ActivityFilter::default())
        .await
        .unwrap();
    assert_eq!(cached.source, Source::Cache);
    assert_eq!(cached.value.len(), 1);
    assert_eq!(cached.value.first().unwrap().title, "Stargazing");
}

#[tokio::test]
async fn test_cache_survives_an_app_restart() {
    let mut backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;
    device
        .client
        .create_book(&NewBook {
            title: "Dune".to_owned(),
            author: "Frank Herbert".to_owned(),
            status: BookStatus::ToRead,
            review: None,
            rating: None,
        })
        .await
        .unwrap();
    device.client.list_books().await.unwrap();

    backend.stop().await;
    // Fresh process: only the preference file carries state across.
    let device = device.restart(&backend);

    let cached = device.client.list_books().await.unwrap();
    assert!(cached.is_cached());
    assert_eq!(cached.value.first().unwrap().title, "Dune");
}

#[tokio::test]
async fn test_no_cache_means_an_honest_offline_error() {
    let mut backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;
    backend.stop().await;

    let err = device.client.list_goals().await.unwrap_err();
    assert!(err.is_network_unavailable());
}

#[tokio::test]
async fn test_writes_are_never_served_from_cache() {
    let mut backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;
    device
        .client
        .create_activity(&activity("First", Category::Indoor))
        .await
        .unwrap();

    backend.stop().await;

    let err = device
        .client
        .create_activity(&activity("Second", Category::Indoor))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Offline(_)));
}

#[tokio::test]
async fn test_filtered_listings_cache_separately() {
    let mut backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;
    device
        .client
        .create_activity(&activity("Park walk", Category::Outdoor))
        .await
        .unwrap();
    device
        .client
        .create_activity(&activity("Board games", Category::Indoor))
        .await
        .unwrap();

    let outdoor_only = ActivityFilter {
        category: Some(Category::Outdoor),
        ..ActivityFilter::default()
    };
    device
        .client
        .list_activities(&ActivityFilter::default())
        .await
        .unwrap();
    device.client.list_activities(&outdoor_only).await.unwrap();

    backend.stop().await;

    let all = device
        .client
        .list_activities(&ActivityFilter::default())
        .await
        .unwrap();
    let outdoor = device.client.list_activities(&outdoor_only).await.unwrap();
    assert!(all.is_cached());
    assert!(outdoor.is_cached());
    assert_eq!(all.value.len(), 2);
    assert_eq!(outdoor.value.len(), 1);
}

// ============================================================================
// Retries and timeouts
// ============================================================================

#[tokio::test]
async fn test_reads_retry_through_transient_failures() {
    let backend = TestBackend::start().await;
    let device = connect_with(&backend, |config| {
        config.retry_backoff = Duration::from_millis(5);
    });
    device.pairing().join("7K2XQ9").await.unwrap();

    backend.fail_requests(2);

    let fetched = device.client.list_movies().await.unwrap();
    assert_eq!(fetched.source, Source::Live);
    assert_eq!(backend.hits("GET /movies/"), 3);
}

#[tokio::test]
async fn test_read_retries_are_bounded() {
    let backend = TestBackend::start().await;
    let device = connect_with(&backend, |config| {
        config.retry_backoff = Duration::from_millis(5);
    });
    device.pairing().join("7K2XQ9").await.unwrap();

    backend.fail_requests(10);

    let err = device.client.list_movies().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    // Two retries, then the final attempt's error surfaces.
    assert_eq!(backend.hits("GET /movies/"), 3);
}

#[tokio::test]
async fn test_writes_get_one_attempt_only() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;

    backend.fail_requests(1);

    let err = device
        .client
        .create_goal(&NewGoal::titled("Run a 10k together"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert_eq!(backend.hits("POST /goals/"), 1);
}

#[tokio::test]
async fn test_slow_backend_times_out_and_serves_cache() {
    let backend = TestBackend::start().await;
    let device = connect_with(&backend, |config| {
        config.request_timeout = Duration::from_millis(100);
        config.max_retries = 0;
    });
    device.pairing().join("7K2XQ9").await.unwrap();
    device
        .client
        .create_blog_entry(&NewBlogEntry {
            title: "Sunday".to_owned(),
            content: "Slept in, made pancakes.".to_owned(),
            mood: None,
        })
        .await
        .unwrap();
    device.client.list_blog_entries().await.unwrap();

    backend.delay_responses(Duration::from_millis(400));

    let cached = device.client.list_blog_entries().await.unwrap();
    assert!(cached.is_cached());
    assert_eq!(cached.value.first().unwrap().title, "Sunday");
}
