//! Shared calendar events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ActivityId, CalendarEventId, CoupleCode, EventType, Recurrence};

/// A calendar event as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: CalendarEventId,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub location: Option<String>,
    pub event_type: Option<EventType>,
    pub recurrence: Option<Recurrence>,
    /// Display color, as a CSS hex string.
    pub color: Option<String>,
    /// Reminder lead time in minutes before the event.
    pub reminder: Option<i32>,
    /// Whether both partners see the event.
    pub shared: bool,
    /// Activity this event was scheduled from, if any.
    pub activity_id: Option<ActivityId>,
    pub created_at: DateTime<Utc>,
    /// Display name of the partner who created it.
    pub created_by: Option<String>,
    pub couple_code: CoupleCode,
}

/// Request body for creating an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCalendarEvent {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<i32>,
    #[serde(default = "default_shared")]
    pub shared: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<ActivityId>,
}

impl NewCalendarEvent {
    /// A shared, non-recurring event with just a title and start time.
    #[must_use]
    pub fn at(title: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            start_time,
            end_time: None,
            all_day: false,
            location: None,
            event_type: None,
            recurrence: None,
            color: None,
            reminder: None,
            shared: true,
            activity_id: None,
        }
    }
}

const fn default_shared() -> bool {
    true
}

/// Partial patch for an event. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarEventUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<ActivityId>,
}
