//! Write-through composition of the two tiers.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::{MemoryStore, PreferenceStore, StoreError};

/// Two-tier store used throughout the client.
///
/// Reads hit the fast tier first; a miss falls back to the durable tier and
/// repopulates the fast tier so later reads stay off the disk. Writes land
/// in the fast tier first and are mirrored to the durable tier best-effort:
/// a durable failure is logged and swallowed so the session keeps working
/// with in-memory state.
///
/// Fast-tier failures do propagate. With the standard [`MemoryStore`] fast
/// tier they cannot occur in practice.
#[derive(Clone)]
pub struct LayeredStore {
    fast: Arc<dyn PreferenceStore>,
    durable: Arc<dyn PreferenceStore>,
}

impl LayeredStore {
    pub fn new(
        fast: impl PreferenceStore + 'static,
        durable: impl PreferenceStore + 'static,
    ) -> Self {
        Self {
            fast: Arc::new(fast),
            durable: Arc::new(durable),
        }
    }

    /// Standard composition: an in-memory cache over `durable`.
    pub fn over(durable: impl PreferenceStore + 'static) -> Self {
        Self::new(MemoryStore::new(), durable)
    }

    /// Fully in-memory store for tests and ephemeral sessions.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), MemoryStore::new())
    }

    /// Look up `key`, falling back to the durable tier on a fast-tier miss.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only for fast-tier failures; durable-tier
    /// failures degrade to a miss.
    pub async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(value) = self.fast.read(key).await? {
            return Ok(Some(value));
        }
        match self.durable.read(key).await {
            Ok(Some(value)) => {
                if let Err(error) = self.fast.write(key, &value).await {
                    warn!(key, %error, "failed to repopulate fast tier");
                }
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(error) => {
                warn!(key, %error, "durable tier read failed; treating as a miss");
                Ok(None)
            }
        }
    }

    /// Store `value` under `key` in both tiers.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only for fast-tier failures; a durable-tier
    /// failure leaves the value held in memory and is logged.
    pub async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.fast.write(key, value).await?;
        if let Err(error) = self.durable.write(key, value).await {
            warn!(key, %error, "durable tier write failed; value held in memory only");
        }
        Ok(())
    }

    /// Delete `key` from both tiers.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only for fast-tier failures.
    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.fast.remove(key).await?;
        if let Err(error) = self.durable.remove(key).await {
            warn!(key, %error, "durable tier remove failed");
        }
        Ok(())
    }

    /// Read a JSON value stored under `key`.
    ///
    /// A value that fails to parse is logged and treated as absent rather
    /// than poisoning the caller.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only for fast-tier failures.
    pub async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.read(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                warn!(key, %error, "stored value is not valid JSON; treating as absent");
                Ok(None)
            }
        }
    }

    /// Serialize `value` to JSON and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialize` if `value` cannot be serialized, or a
    /// fast-tier failure from the underlying write.
    pub async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.write(key, &raw).await
    }
}

impl std::fmt::Debug for LayeredStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    /// Durable tier that fails every operation, standing in for a full disk
    /// or unwritable data directory.
    struct FailingStore;

    #[async_trait]
    impl PreferenceStore for FailingStore {
        async fn read(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk unavailable")))
        }

        async fn write(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk unavailable")))
        }

        async fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk unavailable")))
        }
    }

    #[tokio::test]
    async fn test_write_lands_in_both_tiers() {
        let fast = MemoryStore::new();
        let durable = MemoryStore::new();
        let layered = LayeredStore::new(fast.clone(), durable.clone());

        layered.write("coupleCode", "AB12CD").await.unwrap();

        assert_eq!(fast.read("coupleCode").await.unwrap().as_deref(), Some("AB12CD"));
        assert_eq!(durable.read("coupleCode").await.unwrap().as_deref(), Some("AB12CD"));
    }

    #[tokio::test]
    async fn test_read_prefers_fast_tier() {
        let fast = MemoryStore::new();
        let durable = MemoryStore::new();
        let layered = LayeredStore::new(fast.clone(), durable.clone());

        fast.write("k", "from-memory").await.unwrap();
        durable.write("k", "from-disk").await.unwrap();

        assert_eq!(layered.read("k").await.unwrap().as_deref(), Some("from-memory"));
    }

    #[tokio::test]
    async fn test_read_falls_back_and_repopulates() {
        let fast = MemoryStore::new();
        let durable = MemoryStore::new();
        let layered = LayeredStore::new(fast.clone(), durable.clone());

        // Simulates a fresh process: durable state survives, memory is cold.
        durable.write("coupleCode", "AB12CD").await.unwrap();

        assert_eq!(layered.read("coupleCode").await.unwrap().as_deref(), Some("AB12CD"));
        assert_eq!(fast.read("coupleCode").await.unwrap().as_deref(), Some("AB12CD"));
    }

    #[tokio::test]
    async fn test_durable_write_failure_is_swallowed() {
        let layered = LayeredStore::new(MemoryStore::new(), FailingStore);

        layered.write("coupleCode", "AB12CD").await.unwrap();
        assert_eq!(layered.read("coupleCode").await.unwrap().as_deref(), Some("AB12CD"));
    }

    #[tokio::test]
    async fn test_durable_read_failure_degrades_to_miss() {
        let layered = LayeredStore::new(MemoryStore::new(), FailingStore);
        assert!(layered.read("coupleCode").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_survives_durable_failure() {
        let layered = LayeredStore::new(MemoryStore::new(), FailingStore);

        layered.write("coupleCode", "AB12CD").await.unwrap();
        layered.remove("coupleCode").await.unwrap();

        assert!(layered.read("coupleCode").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_clears_both_tiers() {
        let fast = MemoryStore::new();
        let durable = MemoryStore::new();
        let layered = LayeredStore::new(fast.clone(), durable.clone());

        layered.write("token", "abc").await.unwrap();
        layered.remove("token").await.unwrap();

        assert!(fast.read("token").await.unwrap().is_none());
        assert!(durable.read("token").await.unwrap().is_none());
        assert!(layered.read("token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let layered = LayeredStore::in_memory();
        layered.write_json("pair", &vec![1, 2, 3]).await.unwrap();
        let back: Option<Vec<i32>> = layered.read_json("pair").await.unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_corrupt_json_value_reads_as_absent() {
        let layered = LayeredStore::in_memory();
        layered.write("broken", "{oops").await.unwrap();
        let back: Option<Vec<i32>> = layered.read_json("broken").await.unwrap();
        assert!(back.is_none());
    }
}
