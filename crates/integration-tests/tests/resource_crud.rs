//! The couple-scoped resource surface, driven end to end through the client.

#![allow(clippy::unwrap_used)]

use chrono::Utc;
use tandem_client::ApiError;
use tandem_core::{
    ActivityFilter, ActivityStatus, ActivityUpdate, BookStatus, BookUpdate, CalendarEventUpdate,
    Category, ChallengeCompletion, Cost, Difficulty, GoalUpdate, MovieStatus, MovieUpdate,
    NewActivity, NewBlogEntry, NewBook, NewCalendarEvent, NewGoal, NewMovie,
};
use tandem_integration_tests::{TestBackend, connect_paired};

fn hike(title: &str) -> NewActivity {
    NewActivity {
        title: title.to_owned(),
        description: "Trailhead at dawn".to_owned(),
        status: ActivityStatus::Planned,
        category: Category::Outdoor,
        difficulty: Difficulty::Hard,
        duration: 240,
        cost: Cost::Free,
        season: None,
        mood: None,
    }
}

fn museum(title: &str) -> NewActivity {
    NewActivity {
        title: title.to_owned(),
        description: String::new(),
        status: ActivityStatus::Planned,
        category: Category::Entertainment,
        difficulty: Difficulty::Easy,
        duration: 120,
        cost: Cost::Low,
        season: None,
        mood: None,
    }
}

// ============================================================================
// Activities
// ============================================================================

#[tokio::test]
async fn test_activities_filter_on_the_server() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;
    device.client.create_activity(&hike("Ridge loop")).await.unwrap();
    device
        .client
        .create_activity(&museum("Modern art"))
        .await
        .unwrap();

    let outdoor = device
        .client
        .list_activities(&ActivityFilter {
            category: Some(Category::Outdoor),
            ..ActivityFilter::default()
        })
        .await
        .unwrap();

    assert_eq!(outdoor.value.len(), 1);
    assert_eq!(outdoor.value.first().unwrap().title, "Ridge loop");
}

#[tokio::test]
async fn test_completing_an_activity_updates_its_status() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;
    let created = device.client.create_activity(&hike("Ridge loop")).await.unwrap();
    assert_eq!(created.status, ActivityStatus::Planned);

    let updated = device
        .client
        .update_activity(created.id, &ActivityUpdate::completed())
        .await
        .unwrap();
    assert_eq!(updated.status, ActivityStatus::Completed);

    let listed = device
        .client
        .list_activities(&ActivityFilter::default())
        .await
        .unwrap();
    assert_eq!(
        listed.value.first().unwrap().status,
        ActivityStatus::Completed
    );
}

// ============================================================================
// Library
// ============================================================================

#[tokio::test]
async fn test_book_lifecycle_to_finished() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;
    let book = device
        .client
        .create_book(&NewBook {
            title: "The Left Hand of Darkness".to_owned(),
            author: "Ursula K. Le Guin".to_owned(),
            status: BookStatus::ToRead,
            review: None,
            rating: None,
        })
        .await
        .unwrap();

    let finished = device
        .client
        .update_book(
            book.id,
            &BookUpdate {
                status: BookStatus::Completed,
                review: Some("Read it aloud over two weeks.".to_owned()),
                rating: Some(5),
            },
        )
        .await
        .unwrap();

    assert_eq!(finished.status, BookStatus::Completed);
    assert_eq!(finished.rating, Some(5));
    assert!(finished.review.unwrap().contains("aloud"));
}

#[tokio::test]
async fn test_movie_lifecycle_to_watched() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;
    let movie = device
        .client
        .create_movie(&NewMovie {
            title: "Before Sunrise".to_owned(),
            genre: "Romance".to_owned(),
            status: MovieStatus::ToWatch,
            review: None,
            rating: None,
        })
        .await
        .unwrap();

    let watched = device
        .client
        .update_movie(
            movie.id,
            &MovieUpdate {
                status: MovieStatus::Watched,
                review: None,
                rating: Some(4),
            },
        )
        .await
        .unwrap();

    assert_eq!(watched.status, MovieStatus::Watched);
    assert_eq!(watched.rating, Some(4));
}

// ============================================================================
// Journal
// ============================================================================

#[tokio::test]
async fn test_journal_entries_round_trip() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;
    device
        .client
        .create_blog_entry(&NewBlogEntry {
            title: "Six months".to_owned(),
            content: "We cooked the first recipe we ever made together.".to_owned(),
            mood: Some("nostalgic".to_owned()),
        })
        .await
        .unwrap();

    let entries = device.client.list_blog_entries().await.unwrap();
    let entry = entries.value.first().unwrap();
    assert_eq!(entry.title, "Six months");
    assert_eq!(entry.mood.as_deref(), Some("nostalgic"));
}

// ============================================================================
// Calendar
// ============================================================================

#[tokio::test]
async fn test_calendar_event_update_and_delete() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;
    let event = device
        .client
        .create_calendar_event(&NewCalendarEvent::at("Anniversary dinner", Utc::now()))
        .await
        .unwrap();
    assert!(event.shared);

    let moved = device
        .client
        .update_calendar_event(
            event.id,
            &CalendarEventUpdate {
                location: Some("Trattoria Da Enzo".to_owned()),
                ..CalendarEventUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.location.as_deref(), Some("Trattoria Da Enzo"));
    assert_eq!(moved.title, "Anniversary dinner");

    device.client.delete_calendar_event(event.id).await.unwrap();
    let remaining = device.client.list_calendar_events().await.unwrap();
    assert!(remaining.value.is_empty());

    let err = device
        .client
        .delete_calendar_event(event.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
}

// ============================================================================
// Goals
// ============================================================================

#[tokio::test]
async fn test_goal_completion_sets_the_timestamp() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;
    let goal = device
        .client
        .create_goal(&NewGoal::titled("Save for a trip to Kyoto"))
        .await
        .unwrap();
    assert!(!goal.completed);
    assert!(goal.completed_at.is_none());

    let done = device
        .client
        .update_goal(goal.id, &GoalUpdate::mark_completed())
        .await
        .unwrap();
    assert!(done.completed);
    assert!(done.completed_at.is_some());
}

#[tokio::test]
async fn test_goal_delete_removes_it() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;
    let goal = device
        .client
        .create_goal(&NewGoal::titled("Learn to tango"))
        .await
        .unwrap();

    device.client.delete_goal(goal.id).await.unwrap();

    let remaining = device.client.list_goals().await.unwrap();
    assert!(remaining.value.is_empty());
}

// ============================================================================
// Challenges
// ============================================================================

#[tokio::test]
async fn test_challenge_flow_start_then_complete() {
    let backend = TestBackend::start().await;
    let id = backend.seed_challenge("Cook a new recipe together", 20);
    let device = connect_paired(&backend, "7K2XQ9").await;

    let fresh = device.client.list_challenges().await.unwrap();
    let row = fresh.value.first().unwrap();
    assert!(!row.started);
    assert!(!row.completed);

    let progress = device.client.start_challenge(id).await.unwrap();
    assert_eq!(progress.challenge_id, id);
    assert!(progress.completed_at.is_none());

    let completed = device
        .client
        .complete_challenge(
            id,
            &ChallengeCompletion {
                data: Some("Made fresh pasta".to_owned()),
            },
        )
        .await
        .unwrap();
    assert!(completed.completed_at.is_some());
    assert_eq!(completed.progress_data.as_deref(), Some("Made fresh pasta"));

    let listed = device.client.list_challenges().await.unwrap();
    let row = listed.value.first().unwrap();
    assert!(row.started);
    assert!(row.completed);
}

#[tokio::test]
async fn test_challenge_guards_reject_the_wrong_order() {
    let backend = TestBackend::start().await;
    let id = backend.seed_challenge("Stargazing night", 10);
    let device = connect_paired(&backend, "7K2XQ9").await;

    let err = device
        .client
        .complete_challenge(id, &ChallengeCompletion::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 400, .. }));

    device.client.start_challenge(id).await.unwrap();
    let err = device.client.start_challenge(id).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 400, .. }));

    device
        .client
        .complete_challenge(id, &ChallengeCompletion::default())
        .await
        .unwrap();
    let err = device
        .client
        .complete_challenge(id, &ChallengeCompletion::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 400, .. }));
}

// ============================================================================
// Photos
// ============================================================================

#[tokio::test]
async fn test_photo_upload_links_attachments() {
    let backend = TestBackend::start().await;
    let device = connect_paired(&backend, "7K2XQ9").await;
    let activity = device.client.create_activity(&hike("Sunset ridge")).await.unwrap();

    let photo = device
        .client
        .upload_photo(
            "sunset.jpg",
            b"not a real jpeg".to_vec(),
            Some(activity.id),
            None,
        )
        .await
        .unwrap();

    assert_eq!(photo.file_path, "/uploads/sunset.jpg");
    assert_eq!(photo.activity_id, Some(activity.id));
    assert!(photo.blog_entry_id.is_none());

    let gallery = device.client.list_photos().await.unwrap();
    assert_eq!(gallery.value.len(), 1);
}
