//! Badge endpoints.

use tracing::instrument;

use tandem_core::BadgeState;

use super::{ApiClient, ApiError, Fetched};

impl ApiClient {
    /// Server-side badge state for the active couple: a flat map of badge
    /// key to earned flag.
    #[instrument(skip(self))]
    pub async fn badge_progress(&self) -> Result<Fetched<BadgeState>, ApiError> {
        self.get_scoped("badges/progress").await
    }

    /// Replace the server-side badge state with `state`. Whole-map
    /// overwrite; the reconciler guarantees `state` never drops an earned
    /// badge the server reported.
    #[instrument(skip(self, state), fields(earned = state.earned_count()))]
    pub async fn update_badge_progress(&self, state: &BadgeState) -> Result<BadgeState, ApiError> {
        self.post_scoped("badges/progress", state).await
    }

    /// Catalog of badge keys the backend knows about. Not couple-scoped.
    #[instrument(skip(self))]
    pub async fn badge_catalog(&self) -> Result<Fetched<Vec<String>>, ApiError> {
        self.get_unscoped("badges/").await
    }
}
