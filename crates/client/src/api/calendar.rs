//! Calendar endpoints.

use tracing::instrument;

use tandem_core::{CalendarEvent, CalendarEventId, CalendarEventUpdate, NewCalendarEvent};

use super::{ApiClient, ApiError, Fetched};

impl ApiClient {
    /// The couple's calendar events.
    #[instrument(skip(self))]
    pub async fn list_calendar_events(&self) -> Result<Fetched<Vec<CalendarEvent>>, ApiError> {
        self.get_scoped("calendar/").await
    }

    /// Put an event on the shared calendar.
    #[instrument(skip(self, event))]
    pub async fn create_calendar_event(
        &self,
        event: &NewCalendarEvent,
    ) -> Result<CalendarEvent, ApiError> {
        self.post_scoped("calendar/", event).await
    }

    /// Reschedule or otherwise edit an event.
    #[instrument(skip(self, update), fields(event_id = %id))]
    pub async fn update_calendar_event(
        &self,
        id: CalendarEventId,
        update: &CalendarEventUpdate,
    ) -> Result<CalendarEvent, ApiError> {
        self.put_scoped(&format!("calendar/{id}"), update).await
    }

    /// Remove an event from the calendar.
    #[instrument(skip(self), fields(event_id = %id))]
    pub async fn delete_calendar_event(&self, id: CalendarEventId) -> Result<(), ApiError> {
        self.delete_scoped(&format!("calendar/{id}")).await
    }
}
