//! Command implementations.
//!
//! Every command builds its own client stack from the environment; nothing
//! is shared between invocations. Scoped commands go through
//! [`require_paired`] so an unpaired device gets one consistent hint and the
//! attempted destination is parked for after pairing.

use tandem_client::{ApiClient, ClientConfig, FileStore, Gate, LayeredStore, PairingResolver};
use tandem_core::CoupleCode;

pub mod account;
pub mod activities;
pub mod badges;
pub mod calendar;
pub mod challenges;
pub mod goals;
pub mod journal;
pub mod library;
pub mod milestones;
pub mod pair;
pub mod photos;
pub mod profile;

/// The preference store backing every command: an in-memory tier over the
/// preferences file in the configured data directory.
pub(crate) fn open_store() -> Result<(ClientConfig, LayeredStore), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let store = LayeredStore::over(FileStore::new(config.preferences_path()));
    Ok((config, store))
}

/// An API client wired to the configured backend and store.
pub(crate) fn connect() -> Result<ApiClient, Box<dyn std::error::Error>> {
    let (config, store) = open_store()?;
    Ok(ApiClient::new(&config, store)?)
}

/// The active couple code, or a pairing hint with `destination` parked so
/// `pair join` can point the user back here.
pub(crate) async fn require_paired(
    store: &LayeredStore,
    destination: &str,
) -> Result<CoupleCode, Box<dyn std::error::Error>> {
    let pairing = PairingResolver::new(store.clone());
    match pairing.require_code(destination).await? {
        Gate::Ready(code) => Ok(code),
        Gate::RedirectToPairing => Err(format!(
            "not paired: run `tandem pair generate` or `tandem pair join <CODE>`, \
             then retry `tandem {destination}`"
        )
        .into()),
    }
}

/// Flag listings that were served from the offline cache.
#[allow(clippy::print_stdout)]
pub(crate) fn note_cached<T>(fetched: &tandem_client::Fetched<T>) {
    if fetched.is_cached() {
        println!("(offline: showing the last synced copy)");
    }
}
