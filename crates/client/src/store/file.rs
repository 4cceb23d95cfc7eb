//! Durable file-backed tier.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use super::{PreferenceStore, StoreError};

/// Durable preference tier persisting a flat JSON object to disk.
///
/// Every mutation rewrites the whole map through a temp file followed by a
/// rename, so a crash mid-write leaves the previous contents intact. The
/// file is the source of truth; nothing is cached in memory between calls.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Store backed by the file at `path`. The file and its parent
    /// directories are created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(entries) => Ok(entries),
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    %error,
                    "preference file is corrupt; starting from an empty map"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore").field("path", &self.path).finish()
    }
}

#[async_trait]
impl PreferenceStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileStore {
        FileStore::new(dir.path().join("preferences.json"))
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.write("coupleCode", "AB12CD").await.unwrap();
        assert_eq!(store.read("coupleCode").await.unwrap().as_deref(), Some("AB12CD"));
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        FileStore::new(&path).write("token", "abc123").await.unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.read("token").await.unwrap().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.read("anything").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_is_durable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let store = FileStore::new(&path);
        store.write("token", "abc123").await.unwrap();
        store.remove("token").await.unwrap();

        let reopened = FileStore::new(&path);
        assert!(reopened.read("token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        tokio::fs::write(&path, b"{not json at all").await.unwrap();

        let store = FileStore::new(&path);
        assert!(store.read("coupleCode").await.unwrap().is_none());

        // A write replaces the corrupt contents with a valid map.
        store.write("coupleCode", "AB12CD").await.unwrap();
        assert_eq!(store.read("coupleCode").await.unwrap().as_deref(), Some("AB12CD"));
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("preferences.json");
        let store = FileStore::new(&path);
        store.write("coupleCode", "AB12CD").await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let store = FileStore::new(&path);
        store.write("coupleCode", "AB12CD").await.unwrap();
        assert!(!path.with_extension("json.tmp").exists());
    }
}
