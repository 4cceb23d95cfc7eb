//! Badge reconciliation: counter rules, the union merge, and flushing.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use tandem_client::{ApiError, BadgeReconciler};
use tandem_core::{
    ActivityStatus, ActivityUpdate, BADGE_KEYS, BadgeState, Category, Cost, CoupleCode,
    Difficulty, MovieStatus, NewActivity, NewMovie,
};
use tandem_integration_tests::{TestBackend, TestClient, connect, connect_paired};

const CODE: &str = "7K2XQ9";

fn code() -> CoupleCode {
    CoupleCode::parse(CODE).unwrap()
}

fn date_night() -> NewActivity {
    NewActivity {
        title: "Date night".to_owned(),
        description: String::new(),
        status: ActivityStatus::Planned,
        category: Category::Dining,
        difficulty: Difficulty::Easy,
        duration: 120,
        cost: Cost::Medium,
        season: None,
        mood: None,
    }
}

async fn complete_one_activity(device: &TestClient) {
    let created = device.client.create_activity(&date_night()).await.unwrap();
    device
        .client
        .update_activity(created.id, &ActivityUpdate::completed())
        .await
        .unwrap();
}

// ============================================================================
// Counter rules end to end
// ============================================================================

#[tokio::test]
async fn test_first_completed_activity_earns_first_date() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, CODE).await;
    complete_one_activity(&device).await;

    let reconciler = BadgeReconciler::new(device.client.clone());
    let report = reconciler.sync().await.unwrap();

    assert_eq!(report.newly_earned, vec!["first_date".to_owned()]);
    assert!(report.flushed);
    assert!(backend.badge_state(&code()).earned("first_date"));
}

#[tokio::test]
async fn test_second_sync_converges_and_stops_flushing() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, CODE).await;
    complete_one_activity(&device).await;

    let reconciler = BadgeReconciler::new(device.client.clone());
    reconciler.sync().await.unwrap();
    let report = reconciler.sync().await.unwrap();

    assert!(report.newly_earned.is_empty());
    assert!(!report.flushed);
}

#[tokio::test]
async fn test_watching_ten_movies_earns_movie_buffs() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, CODE).await;
    for n in 1..=10 {
        device
            .client
            .create_movie(&NewMovie {
                title: format!("Movie night {n}"),
                genre: "Drama".to_owned(),
                status: MovieStatus::Watched,
                review: None,
                rating: None,
            })
            .await
            .unwrap();
    }

    let report = BadgeReconciler::new(device.client.clone())
        .sync()
        .await
        .unwrap();

    assert!(report.newly_earned.contains(&"movie_buffs".to_owned()));
    assert!(backend.badge_state(&code()).earned("movie_buffs"));
}

// ============================================================================
// Merging with the server
// ============================================================================

#[tokio::test]
async fn test_server_state_unions_with_local_awards() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, CODE).await;

    // Another device already flushed an earned badge.
    let mut from_partner = BadgeState::default();
    from_partner.award("bookworms");
    backend.set_badge_state(&code(), from_partner);

    let reconciler = BadgeReconciler::new(device.client.clone());
    assert!(reconciler.award_local("surprise_specialist").await);

    let pulled = reconciler.pull().await.unwrap();
    assert!(pulled.value.earned("bookworms"));
    assert!(pulled.value.earned("surprise_specialist"));
}

#[tokio::test]
async fn test_a_pull_can_never_unearn_a_badge() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, CODE).await;

    let reconciler = BadgeReconciler::new(device.client.clone());
    reconciler.award_local("night_owl").await;

    // A stale flush from elsewhere recorded it explicitly unearned.
    let stale: BadgeState = serde_json::from_value(json!({ "night_owl": false })).unwrap();
    backend.set_badge_state(&code(), stale);

    let pulled = reconciler.pull().await.unwrap();
    assert!(pulled.value.earned("night_owl"));
}

#[tokio::test]
async fn test_failed_flush_retries_on_the_next_sync() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, CODE).await;
    complete_one_activity(&device).await;

    let reconciler = BadgeReconciler::new(device.client.clone());

    backend.fail_matching("POST /badges/progress", 1);
    let err = reconciler.sync().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert!(!backend.badge_state(&code()).earned("first_date"));

    // The award survived the failed flush; this pass only pushes.
    let report = reconciler.sync().await.unwrap();
    assert!(report.flushed);
    assert!(report.newly_earned.is_empty());
    assert!(backend.badge_state(&code()).earned("first_date"));
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_catalog_lists_every_badge_key_without_pairing() {
    let backend = TestBackend::start().await;
    let device = connect(&backend);

    let catalog = device.client.badge_catalog().await.unwrap();

    let expected: Vec<String> = BADGE_KEYS.iter().map(|key| (*key).to_owned()).collect();
    assert_eq!(catalog.value, expected);
}
