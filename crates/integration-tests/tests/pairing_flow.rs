//! Pairing lifecycle: the couple code, the gate, and data isolation.

#![allow(clippy::unwrap_used)]

use tandem_client::{ApiError, Gate};
use tandem_core::{ActivityFilter, ActivityStatus, Category, Cost, Difficulty, NewActivity};
use tandem_integration_tests::{TestBackend, connect, connect_paired};

fn picnic(title: &str) -> NewActivity {
    NewActivity {
        title: title.to_owned(),
        description: "Blanket, basket, park".to_owned(),
        status: ActivityStatus::Planned,
        category: Category::Outdoor,
        difficulty: Difficulty::Easy,
        duration: 90,
        cost: Cost::Low,
        season: None,
        mood: None,
    }
}

// ============================================================================
// Code lifecycle
// ============================================================================

#[tokio::test]
async fn test_generated_code_survives_an_app_restart() {
    let backend = TestBackend::start().await;
    let device = connect(&backend);
    let code = device.pairing().generate().await.unwrap();

    let device = device.restart(&backend);
    assert_eq!(device.pairing().active_code().await.unwrap(), Some(code));
}

#[tokio::test]
async fn test_join_accepts_codes_the_way_people_type_them() {
    let backend = TestBackend::start().await;
    let device = connect(&backend);

    let code = device.pairing().join("  7k2xq9 ").await.unwrap();
    assert_eq!(code.as_str(), "7K2XQ9");
    assert_eq!(device.pairing().active_code().await.unwrap(), Some(code));
}

#[tokio::test]
async fn test_clear_returns_the_device_to_unpaired() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;

    device.pairing().clear().await.unwrap();

    let err = device.client.list_books().await.unwrap_err();
    assert!(matches!(err, ApiError::NotPaired));
}

// ============================================================================
// The pairing gate
// ============================================================================

#[tokio::test]
async fn test_unpaired_scoped_call_fails_without_touching_the_network() {
    let backend = TestBackend::start().await;
    let device = connect(&backend);

    let err = device
        .client
        .list_activities(&ActivityFilter::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NotPaired));
    assert_eq!(backend.total_hits(), 0);
}

#[tokio::test]
async fn test_gate_parks_the_destination_until_pairing_completes() {
    let backend = TestBackend::start().await;
    let device = connect(&backend);
    let pairing = device.pairing();

    let gate = pairing.require_code("/activities").await.unwrap();
    assert_eq!(gate, Gate::RedirectToPairing);

    pairing.join("7K2XQ9").await.unwrap();

    // Handed back exactly once, then the gate opens.
    assert_eq!(
        pairing.take_pending_destination().await.unwrap().as_deref(),
        Some("/activities")
    );
    assert_eq!(pairing.take_pending_destination().await.unwrap(), None);
    assert!(matches!(
        pairing.require_code("/activities").await.unwrap(),
        Gate::Ready(_)
    ));
}

// ============================================================================
// Couple scoping
// ============================================================================

#[tokio::test]
async fn test_two_devices_with_one_code_share_data() {
    let backend = TestBackend::start().await;
    let ana = connect_paired(&backend, "7K2XQ9").await;
    let ben = connect_paired(&backend, "7K2XQ9").await;

    ana.client
        .create_activity(&picnic("Picnic at the lake"))
        .await
        .unwrap();

    let seen = ben
        .client
        .list_activities(&ActivityFilter::default())
        .await
        .unwrap();
    assert!(!seen.is_cached());
    assert_eq!(seen.value.len(), 1);
    assert_eq!(seen.value.first().unwrap().title, "Picnic at the lake");
}

#[tokio::test]
async fn test_different_codes_never_see_each_other() {
    let backend = TestBackend::start().await;
    let ana = connect_paired(&backend, "7K2XQ9").await;
    let stranger = connect_paired(&backend, "ZZZZZZ").await;

    ana.client.create_activity(&picnic("Picnic")).await.unwrap();

    let seen = stranger
        .client
        .list_activities(&ActivityFilter::default())
        .await
        .unwrap();
    assert!(seen.value.is_empty());
}
