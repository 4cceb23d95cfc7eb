//! Accounts and sessions: registration, login, profile, couple linkage.

#![allow(clippy::unwrap_used)]

use tandem_client::{ApiError, keys};
use tandem_core::{CoupleCode, NewUser, ProfileUpdate};
use tandem_integration_tests::{TestBackend, connect, connect_paired};

fn registration(email: &str) -> NewUser {
    NewUser {
        email: email.to_owned(),
        password: "correct horse battery staple".to_owned(),
        display_name: Some("Ana".to_owned()),
        couple_code: None,
    }
}

// ============================================================================
// Register and log in
// ============================================================================

#[tokio::test]
async fn test_register_login_and_fetch_profile() {
    let backend = TestBackend::start().await;
    let device = connect(&backend);

    device
        .client
        .register(&registration("ana@example.com"))
        .await
        .unwrap();
    let user = device
        .client
        .login("ana@example.com", "correct horse battery staple")
        .await
        .unwrap();
    assert_eq!(user.email, "ana@example.com");

    // The session token lands in the store for later requests.
    assert!(device.store.read(keys::TOKEN).await.unwrap().is_some());

    let profile = device.client.fetch_profile().await.unwrap();
    assert!(!profile.is_cached());
    assert_eq!(profile.value.email, "ana@example.com");
    assert_eq!(profile.value.display_name.as_deref(), Some("Ana"));
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let backend = TestBackend::start().await;
    let device = connect(&backend);
    device
        .client
        .register(&registration("ana@example.com"))
        .await
        .unwrap();

    let err = device
        .client
        .register(&registration("ana@example.com"))
        .await
        .unwrap_err();
    let ApiError::Status { status, message } = err else {
        panic!("expected a status error, got {err}");
    };
    assert_eq!(status, 400);
    assert!(message.contains("already registered"));
}

#[tokio::test]
async fn test_wrong_password_is_a_401_with_detail() {
    let backend = TestBackend::start().await;
    let device = connect(&backend);
    device
        .client
        .register(&registration("ana@example.com"))
        .await
        .unwrap();

    let err = device
        .client
        .login("ana@example.com", "wrong")
        .await
        .unwrap_err();
    let ApiError::Status { status, message } = err else {
        panic!("expected a status error, got {err}");
    };
    assert_eq!(status, 401);
    assert_eq!(message, "Incorrect email or password");
}

#[tokio::test]
async fn test_logout_drops_the_session() {
    let backend = TestBackend::start().await;
    let device = connect(&backend);
    device
        .client
        .register(&registration("ana@example.com"))
        .await
        .unwrap();
    device
        .client
        .login("ana@example.com", "correct horse battery staple")
        .await
        .unwrap();

    device.client.logout().await.unwrap();

    assert!(device.store.read(keys::TOKEN).await.unwrap().is_none());
    let err = device.client.fetch_profile().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 401, .. }));
}

// ============================================================================
// Profile updates
// ============================================================================

#[tokio::test]
async fn test_display_name_update_round_trips() {
    let backend = TestBackend::start().await;
    let device = connect(&backend);
    device
        .client
        .register(&registration("ana@example.com"))
        .await
        .unwrap();
    device
        .client
        .login("ana@example.com", "correct horse battery staple")
        .await
        .unwrap();

    let updated = device
        .client
        .update_profile(&ProfileUpdate {
            display_name: Some("Ana Banana".to_owned()),
            ..ProfileUpdate::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.display_name.as_deref(), Some("Ana Banana"));

    let profile = device.client.fetch_profile().await.unwrap();
    assert_eq!(profile.value.display_name.as_deref(), Some("Ana Banana"));
}

// ============================================================================
// Couple linkage
// ============================================================================

#[tokio::test]
async fn test_registering_with_a_partner_code_links_immediately() {
    let backend = TestBackend::start().await;
    let device = connect(&backend);

    let mut new_user = registration("ben@example.com");
    new_user.couple_code = Some(CoupleCode::parse("7K2XQ9").unwrap());

    let user = device.client.register(&new_user).await.unwrap();
    assert_eq!(user.couple_code.unwrap().as_str(), "7K2XQ9");
}

#[tokio::test]
async fn test_account_remembers_the_couple_code_for_a_reinstall() {
    let backend = TestBackend::start().await;

    // First install: pair, sign up, link the code to the account.
    let device = connect_paired(&backend, "7K2XQ9").await;
    device
        .client
        .register(&registration("ana@example.com"))
        .await
        .unwrap();
    device
        .client
        .login("ana@example.com", "correct horse battery staple")
        .await
        .unwrap();
    let code = device.pairing().active_code().await.unwrap().unwrap();
    device.client.link_code(&code).await.unwrap();

    // Reinstall: fresh data dir, no local pairing, same account.
    let fresh = connect(&backend);
    let user = fresh
        .client
        .login("ana@example.com", "correct horse battery staple")
        .await
        .unwrap();
    assert_eq!(fresh.pairing().active_code().await.unwrap(), None);
    assert_eq!(user.couple_code, Some(code.clone()));

    let linked = fresh.client.linked_code().await.unwrap();
    assert_eq!(linked.code, Some(code));
}
