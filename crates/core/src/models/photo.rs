//! Uploaded photos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ActivityId, BlogEntryId, CoupleCode, PhotoId};

/// A photo stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    /// Server-side path the image is served from.
    pub file_path: String,
    /// Activity the photo is attached to, if any.
    pub activity_id: Option<ActivityId>,
    /// Journal entry the photo is attached to, if any.
    pub blog_entry_id: Option<BlogEntryId>,
    pub couple_code: CoupleCode,
    pub uploaded_at: DateTime<Utc>,
}
