//! Badge reconciliation between local rule evaluation and the backend.
//!
//! The backend stores a flat map of badge key to earned flag per couple,
//! but it never computes anything: earning happens client-side by running
//! the counter-backed rules in [`tandem_core::badges`] against what the
//! couple has actually done. [`BadgeReconciler`] owns the choreography:
//!
//! 1. **pull** server state and union it into a local working copy
//!    (earned wins, so neither side can take a badge away),
//! 2. **evaluate** the rules against fresh counters,
//! 3. **flush** the whole map back when the server is missing anything.
//!
//! Badges confetti the moment they fire locally ([`BadgeReconciler::award_local`]);
//! the server learns about them on the next flush. A flush that fails
//! offline keeps the award in the working copy and the next pass converges.

use tokio::sync::Mutex;
use tracing::{info, instrument};

use tandem_core::badges::evaluate;
use tandem_core::{
    ActivityFilter, ActivityStatus, BadgeState, BookStatus, CounterSnapshot, MovieStatus,
};

use crate::api::{ApiClient, ApiError, Fetched};

/// What a [`BadgeReconciler::sync`] pass did.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Badge state after evaluation.
    pub state: BadgeState,
    /// Keys that flipped to earned during this pass.
    pub newly_earned: Vec<String>,
    /// Whether the state was pushed to the backend.
    pub flushed: bool,
}

/// Merges locally computed achievements with server-confirmed state.
pub struct BadgeReconciler {
    client: ApiClient,
    // Working copy: server state unioned with local awards not yet flushed.
    state: Mutex<BadgeState>,
}

impl BadgeReconciler {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(BadgeState::new()),
        }
    }

    /// Current working copy.
    pub async fn snapshot(&self) -> BadgeState {
        self.state.lock().await.clone()
    }

    /// Optimistically mark a badge earned. Returns true when it was not
    /// already earned, which is the caller's cue for the celebration UI.
    /// The award reaches the server on the next flush or sync.
    pub async fn award_local(&self, key: &str) -> bool {
        let newly_earned = self.state.lock().await.award(key);
        if newly_earned {
            info!(badge = key, "badge earned locally");
        }
        newly_earned
    }

    /// Pull server state and union it into the working copy.
    ///
    /// Earned always wins in the union, so a pull can never take a local
    /// award away and a stale cached pull can never un-earn anything.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the underlying GET; offline with a
    /// prior cache, the pull succeeds with [`Source::Cache`](crate::api::Source::Cache).
    pub async fn pull(&self) -> Result<Fetched<BadgeState>, ApiError> {
        let fetched = self.client.badge_progress().await?;
        let mut state = self.state.lock().await;
        state.merge(&fetched.value);
        Ok(Fetched {
            value: state.clone(),
            source: fetched.source,
        })
    }

    /// Push the working copy to the backend as-is.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the POST. The working copy is unchanged
    /// on failure, so a later flush retries the same state.
    pub async fn flush(&self) -> Result<BadgeState, ApiError> {
        let state = self.snapshot().await;
        let confirmed = self.client.update_badge_progress(&state).await?;
        let mut guard = self.state.lock().await;
        guard.merge(&confirmed);
        Ok(guard.clone())
    }

    /// Full reconcile pass: pull, evaluate the counter-backed rules against
    /// fresh counters, and flush when the server is missing anything this
    /// install believes — including awards from an earlier pass that never
    /// reached it.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ApiError`] from the pull, the counter
    /// fan-out, or the flush. When the flush is what failed, the awards
    /// stay in the working copy for the next pass.
    #[instrument(skip(self))]
    pub async fn sync(&self) -> Result<SyncReport, ApiError> {
        let server = self.client.badge_progress().await?;
        let before = {
            let mut state = self.state.lock().await;
            state.merge(&server.value);
            state.clone()
        };

        let counters = self.counters().await?;
        let (next, _) = evaluate(&counters, &before);
        let newly_earned: Vec<String> = next
            .earned_keys()
            .filter(|key| !before.earned(key))
            .map(ToOwned::to_owned)
            .collect();

        let needs_flush = next != server.value;
        if needs_flush {
            {
                let mut state = self.state.lock().await;
                state.merge(&next);
            }
            self.client.update_badge_progress(&next).await?;
        }
        if !newly_earned.is_empty() {
            info!(badges = ?newly_earned, "new badges earned");
        }

        Ok(SyncReport {
            state: next,
            newly_earned,
            flushed: needs_flush,
        })
    }

    /// Gather the counters the badge rules run on, fanning out over the
    /// list endpoints concurrently.
    async fn counters(&self) -> Result<CounterSnapshot, ApiError> {
        let filter = ActivityFilter::default();
        let (activities, books, movies, goals, challenges, photos) = tokio::try_join!(
            self.client.list_activities(&filter),
            self.client.list_books(),
            self.client.list_movies(),
            self.client.list_goals(),
            self.client.list_challenges(),
            self.client.list_photos(),
        )?;

        Ok(CounterSnapshot {
            completed_activities: count(
                activities
                    .value
                    .iter()
                    .filter(|a| a.status == ActivityStatus::Completed),
            ),
            finished_books: count(
                books
                    .value
                    .iter()
                    .filter(|b| b.status == BookStatus::Completed),
            ),
            watched_movies: count(
                movies
                    .value
                    .iter()
                    .filter(|m| m.status == MovieStatus::Watched),
            ),
            completed_goals: count(goals.value.iter().filter(|g| g.completed)),
            completed_challenges: count(challenges.value.iter().filter(|c| c.completed)),
            uploaded_photos: count(photos.value.iter()),
        })
    }
}

impl std::fmt::Debug for BadgeReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeReconciler").finish_non_exhaustive()
    }
}

fn count<I: Iterator>(iter: I) -> u32 {
    u32::try_from(iter.count()).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use crate::api::Source;
    use crate::config::ClientConfig;
    use crate::store::{LayeredStore, keys};

    use super::*;

    /// Reconciler over a client whose backend refuses every connection.
    fn offline_reconciler() -> (BadgeReconciler, LayeredStore) {
        let mut config = ClientConfig::for_base(
            Url::parse("http://127.0.0.1:9").unwrap(),
            "/tmp/unused",
        );
        config.max_retries = 0;
        let store = LayeredStore::in_memory();
        let client = ApiClient::new(&config, store.clone()).unwrap();
        (BadgeReconciler::new(client), store)
    }

    #[tokio::test]
    async fn test_award_local_fires_once() {
        let (reconciler, _store) = offline_reconciler();

        assert!(reconciler.award_local("first_date").await);
        assert!(!reconciler.award_local("first_date").await);
        assert!(reconciler.snapshot().await.earned("first_date"));
    }

    #[tokio::test]
    async fn test_pull_unions_cached_server_state_with_local_awards() {
        let (reconciler, store) = offline_reconciler();
        store.write(keys::COUPLE_CODE, "AB12CD").await.unwrap();
        store
            .write(&keys::cache("/badges/progress"), r#"{"bookworms": true}"#)
            .await
            .unwrap();

        reconciler.award_local("first_date").await;
        let pulled = reconciler.pull().await.unwrap();

        assert_eq!(pulled.source, Source::Cache);
        assert!(pulled.value.earned("bookworms"), "server state merged in");
        assert!(pulled.value.earned("first_date"), "local award survived");
    }

    #[tokio::test]
    async fn test_pull_without_code_is_not_paired() {
        let (reconciler, _store) = offline_reconciler();
        let err = reconciler.pull().await.unwrap_err();
        assert!(matches!(err, ApiError::NotPaired));
    }
}
