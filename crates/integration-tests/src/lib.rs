//! End-to-end tests for the Tandem client stack.
//!
//! [`TestBackend`] is an in-process stand-in for the production backend:
//! same routes, same `{"detail": ...}` error shape, same couple-code
//! partitioning, backed by plain in-memory maps. Tests drive the real
//! [`ApiClient`] against it over real HTTP, so everything from the retry
//! policy to the cache fallback runs the production code path.
//!
//! The scenarios live under `tests/`; this crate only provides the harness.

#![cfg_attr(not(test), forbid(unsafe_code))]
// A panicking harness is a failing test; unwrap/expect are fine here.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

mod backend;

pub use backend::TestBackend;

use tandem_client::{ApiClient, ClientConfig, FileStore, LayeredStore, PairingResolver};
use tempfile::TempDir;

/// A full client stack wired to a [`TestBackend`], with its own data dir.
///
/// Each instance models one installed device: separate preference file,
/// separate cache, separate session. The temp dir lives as long as the
/// value does.
pub struct TestClient {
    pub client: ApiClient,
    pub store: LayeredStore,
    data_dir: TempDir,
}

impl TestClient {
    /// Pairing operations on this device's store.
    #[must_use]
    pub fn pairing(&self) -> PairingResolver {
        PairingResolver::new(self.store.clone())
    }

    /// Rebuild the stack over the same data dir, dropping all in-memory
    /// state. This is what an app restart looks like: the fast tier starts
    /// empty and only the preference file survives.
    #[must_use]
    pub fn restart(self, backend: &TestBackend) -> Self {
        build(backend, self.data_dir, |_| {})
    }
}

/// A fresh, unpaired device against `backend`.
#[must_use]
pub fn connect(backend: &TestBackend) -> TestClient {
    connect_with(backend, |_| {})
}

/// A fresh device with config tweaks applied before the client is built.
pub fn connect_with(
    backend: &TestBackend,
    configure: impl FnOnce(&mut ClientConfig),
) -> TestClient {
    let data_dir = tempfile::tempdir().expect("create data dir");
    build(backend, data_dir, configure)
}

/// A fresh device already paired with `code`.
pub async fn connect_paired(backend: &TestBackend, code: &str) -> TestClient {
    let device = connect(backend);
    device.pairing().join(code).await.expect("join couple");
    device
}

fn build(
    backend: &TestBackend,
    data_dir: TempDir,
    configure: impl FnOnce(&mut ClientConfig),
) -> TestClient {
    let mut config = ClientConfig::for_base(backend.url(), data_dir.path());
    configure(&mut config);
    let store = LayeredStore::over(FileStore::new(config.preferences_path()));
    let client = ApiClient::new(&config, store.clone()).expect("construct client");
    TestClient {
        client,
        store,
        data_dir,
    }
}
