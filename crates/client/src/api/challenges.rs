//! Challenge endpoints.

use tracing::instrument;

use tandem_core::{ChallengeCompletion, ChallengeId, ChallengeProgress, ChallengeWithProgress};

use super::{ApiClient, ApiError, Fetched};

impl ApiClient {
    /// List challenges with the couple's progress folded into each row.
    #[instrument(skip(self))]
    pub async fn list_challenges(&self) -> Result<Fetched<Vec<ChallengeWithProgress>>, ApiError> {
        self.get_scoped("challenges/").await
    }

    /// Start a challenge for the couple.
    #[instrument(skip(self), fields(challenge_id = %id))]
    pub async fn start_challenge(&self, id: ChallengeId) -> Result<ChallengeProgress, ApiError> {
        self.post_scoped_empty(&format!("challenges/{id}/start")).await
    }

    /// Mark a started challenge complete, optionally attaching progress
    /// details.
    #[instrument(skip(self, completion), fields(challenge_id = %id))]
    pub async fn complete_challenge(
        &self,
        id: ChallengeId,
        completion: &ChallengeCompletion,
    ) -> Result<ChallengeProgress, ApiError> {
        self.post_scoped(&format!("challenges/{id}/complete"), completion)
            .await
    }
}
