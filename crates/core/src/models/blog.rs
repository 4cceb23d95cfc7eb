//! Shared journal entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::BlogEntryId;

/// A journal entry written by either partner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogEntry {
    pub id: BlogEntryId,
    pub title: String,
    pub content: String,
    /// Mood emoji or free text attached to the entry.
    pub mood: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for writing an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBlogEntry {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}
