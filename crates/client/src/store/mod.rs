//! Two-tier preference store.
//!
//! Small per-couple state (the active couple code, session token, avatar
//! choices, milestone journals, cached response bodies) lives in a flat
//! string key-value store with two tiers:
//!
//! - [`MemoryStore`] - process-lifetime in-memory tier, always available
//! - [`FileStore`] - durable tier persisting a JSON object to disk
//!
//! [`LayeredStore`] composes the two write-through: reads hit the fast tier
//! first and fall back to the durable tier, writes land in the fast tier and
//! are mirrored to disk best-effort. Callers serialize structured values to
//! JSON before they land here; [`LayeredStore::read_json`] and
//! [`LayeredStore::write_json`] wrap that round trip.

use async_trait::async_trait;
use thiserror::Error;

mod file;
mod layered;
mod memory;

pub use file::FileStore;
pub use layered::LayeredStore;
pub use memory::MemoryStore;

/// Errors surfaced by preference store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference store value could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A flat string key-value store.
///
/// Both tiers of [`LayeredStore`] implement this, as do test doubles that
/// simulate storage failures.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Look up the value stored under `key`.
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the value stored under `key`, if any.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Well-known preference store keys.
///
/// Dynamic keys (per-couple journals, per-endpoint caches) are built by the
/// functions here so the naming scheme stays in one place.
pub mod keys {
    use tandem_core::CoupleCode;

    /// Active couple code for this installation.
    pub const COUPLE_CODE: &str = "coupleCode";

    /// Bearer token from the last successful login.
    pub const TOKEN: &str = "token";

    /// JSON of the logged-in user's profile.
    pub const USER: &str = "user";

    /// JSON of the user's avatar part selections.
    pub const USER_AVATAR_OPTIONS: &str = "userAvatarOptions";

    /// Rendered avatar image reference.
    pub const USER_AVATAR: &str = "userAvatar";

    /// Where to send the user once pairing completes.
    pub const PENDING_DESTINATION: &str = "pendingDestination";

    /// Cache slot for the last successful GET of `endpoint`.
    #[must_use]
    pub fn cache(endpoint: &str) -> String {
        format!("cache_{endpoint}")
    }

    /// Milestone journal for the couple identified by `code`.
    #[must_use]
    pub fn milestones(code: &CoupleCode) -> String {
        format!("milestones-{code}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tandem_core::CoupleCode;

    #[test]
    fn test_cache_key_shape() {
        assert_eq!(keys::cache("activities/?status=completed"), "cache_activities/?status=completed");
    }

    #[test]
    fn test_milestone_key_embeds_code() {
        let code = CoupleCode::parse("AB12CD").unwrap();
        assert_eq!(keys::milestones(&code), "milestones-AB12CD");
    }
}
