//! Client-local milestone journal.
//!
//! Milestones (anniversaries, first dates, memorable places) never leave
//! the device: each couple's journal is a JSON array under
//! `milestones-<code>` in the preference store, so partners curate their
//! own copies. Absent or corrupt journals read as empty rather than
//! failing.

use uuid::Uuid;

use tandem_core::{CoupleCode, Milestone};

use crate::store::{LayeredStore, StoreError, keys};

/// Journal of couple milestones, one array per couple code.
#[derive(Debug, Clone)]
pub struct MilestoneJournal {
    store: LayeredStore,
}

impl MilestoneJournal {
    #[must_use]
    pub const fn new(store: LayeredStore) -> Self {
        Self { store }
    }

    /// All milestones for `code`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` for fast-tier store failures.
    pub async fn list(&self, code: &CoupleCode) -> Result<Vec<Milestone>, StoreError> {
        Ok(self
            .store
            .read_json(&keys::milestones(code))
            .await?
            .unwrap_or_default())
    }

    /// Append `milestone` to the couple's journal and hand it back.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the journal could not be persisted.
    pub async fn add(
        &self,
        code: &CoupleCode,
        milestone: Milestone,
    ) -> Result<Milestone, StoreError> {
        let key = keys::milestones(code);
        let mut entries: Vec<Milestone> = self.store.read_json(&key).await?.unwrap_or_default();
        entries.push(milestone.clone());
        self.store.write_json(&key, &entries).await?;
        Ok(milestone)
    }

    /// Remove the milestone with `id`. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the journal could not be persisted.
    pub async fn remove(&self, code: &CoupleCode, id: Uuid) -> Result<bool, StoreError> {
        let key = keys::milestones(code);
        let mut entries: Vec<Milestone> = self.store.read_json(&key).await?.unwrap_or_default();
        let before = entries.len();
        entries.retain(|m| m.id != id);
        let removed = entries.len() != before;
        if removed {
            self.store.write_json(&key, &entries).await?;
        }
        Ok(removed)
    }
}
