//! Goal endpoints.

use tracing::instrument;

use tandem_core::{Goal, GoalId, GoalUpdate, NewGoal};

use super::{ApiClient, ApiError, Fetched};

impl ApiClient {
    /// The couple's goals.
    #[instrument(skip(self))]
    pub async fn list_goals(&self) -> Result<Fetched<Vec<Goal>>, ApiError> {
        self.get_scoped("goals/").await
    }

    /// Set a new goal.
    #[instrument(skip(self, goal))]
    pub async fn create_goal(&self, goal: &NewGoal) -> Result<Goal, ApiError> {
        self.post_scoped("goals/", goal).await
    }

    /// Edit a goal. [`GoalUpdate::mark_completed`] builds the completion
    /// variant.
    #[instrument(skip(self, update), fields(goal_id = %id))]
    pub async fn update_goal(&self, id: GoalId, update: &GoalUpdate) -> Result<Goal, ApiError> {
        self.put_scoped(&format!("goals/{id}"), update).await
    }

    /// Drop a goal entirely.
    #[instrument(skip(self), fields(goal_id = %id))]
    pub async fn delete_goal(&self, id: GoalId) -> Result<(), ApiError> {
        self.delete_scoped(&format!("goals/{id}")).await
    }
}
