//! Shared activities: the date ideas a couple plans and completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ActivityId, ActivityStatus, Category, Cost, Difficulty, Season};

/// An activity as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Unique ID.
    pub id: ActivityId,
    /// Short name shown in lists.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Planned or completed.
    pub status: ActivityStatus,
    /// Activity category.
    pub category: Category,
    /// How demanding it is.
    pub difficulty: Difficulty,
    /// Expected duration in minutes.
    pub duration: i32,
    /// Rough price band.
    pub cost: Cost,
    /// Season it suits best, if any.
    pub season: Option<Season>,
    /// Mood emoji or free text.
    pub mood: Option<String>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

/// Request body for creating an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: ActivityStatus,
    pub category: Category,
    pub difficulty: Difficulty,
    /// Expected duration in minutes.
    pub duration: i32,
    pub cost: Cost,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

/// Partial patch for an existing activity.
///
/// The backend requires `status` on every patch; everything else is
/// optional and omitted from the body when unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityUpdate {
    pub status: ActivityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// 1-5 star rating given after completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

impl ActivityUpdate {
    /// Patch that marks an activity completed right now.
    #[must_use]
    pub fn completed() -> Self {
        Self {
            status: ActivityStatus::Completed,
            completed_at: Some(Utc::now()),
            ..Self::default()
        }
    }
}

/// Query filter for listing activities. Unset fields are left out of the
/// query string entirely.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ActivityFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Cost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
}

impl ActivityFilter {
    /// True when no filter dimension is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.difficulty.is_none()
            && self.cost.is_none()
            && self.season.is_none()
    }
}
