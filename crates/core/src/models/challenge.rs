//! Gamified challenges and the couple's progress through them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ChallengeId, ChallengeProgressId, CoupleCode};

/// A challenge definition from the shared catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    pub description: Option<String>,
    /// Catalog bucket, e.g. `daily`, `weekly`, `one-time`.
    pub category: Option<String>,
    /// Reward points for completing.
    pub points: i32,
    /// Icon or emoji name shown in lists.
    pub icon: Option<String>,
    /// Whether the challenge is currently offered.
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A challenge joined with this couple's progress, as returned by the
/// list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeWithProgress {
    #[serde(flatten)]
    pub challenge: Challenge,
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub completed: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A progress record for one couple on one challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeProgress {
    pub id: ChallengeProgressId,
    pub challenge_id: ChallengeId,
    pub couple_code: CoupleCode,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Free-form progress payload recorded at completion.
    pub progress_data: Option<String>,
}

/// Optional body for the completion endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChallengeCompletion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_flattens_into_challenge() {
        let json = serde_json::json!({
            "id": 3,
            "title": "Cook a new recipe together",
            "description": null,
            "category": "weekly",
            "points": 20,
            "icon": "🍳",
            "active": true,
            "created_at": "2025-01-01T00:00:00Z",
            "started": true,
            "completed": false,
            "started_at": "2025-02-01T10:00:00Z",
            "completed_at": null,
        });

        let with_progress: ChallengeWithProgress = serde_json::from_value(json).unwrap();
        assert_eq!(with_progress.challenge.id, ChallengeId::new(3));
        assert_eq!(with_progress.challenge.points, 20);
        assert!(with_progress.started);
        assert!(!with_progress.completed);
    }

    #[test]
    fn test_progress_fields_default_when_absent() {
        let json = serde_json::json!({
            "id": 9,
            "title": "Stargazing night",
            "description": "Find a dark spot and name three constellations",
            "category": "one-time",
            "points": 10,
            "icon": null,
            "active": true,
            "created_at": "2025-01-01T00:00:00Z",
            "started_at": null,
            "completed_at": null,
        });

        let with_progress: ChallengeWithProgress = serde_json::from_value(json).unwrap();
        assert!(!with_progress.started);
        assert!(!with_progress.completed);
    }
}
