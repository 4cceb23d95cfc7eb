//! Activity endpoints.

use tracing::instrument;

use tandem_core::{Activity, ActivityFilter, ActivityId, ActivityUpdate, NewActivity};

use super::{ApiClient, ApiError, Fetched};

impl ApiClient {
    /// List the couple's activities. Filter dimensions that are set become
    /// query parameters and cache separately from the unfiltered list.
    #[instrument(skip(self, filter))]
    pub async fn list_activities(
        &self,
        filter: &ActivityFilter,
    ) -> Result<Fetched<Vec<Activity>>, ApiError> {
        self.get_scoped_query("activities/", filter).await
    }

    /// Record a new activity idea.
    #[instrument(skip(self, activity))]
    pub async fn create_activity(&self, activity: &NewActivity) -> Result<Activity, ApiError> {
        self.post_scoped("activities/", activity).await
    }

    /// Apply `update` to an activity, typically a planned-to-completed flip.
    #[instrument(skip(self, update), fields(activity_id = %id))]
    pub async fn update_activity(
        &self,
        id: ActivityId,
        update: &ActivityUpdate,
    ) -> Result<Activity, ApiError> {
        self.patch_scoped(&format!("activities/{id}"), update).await
    }
}
