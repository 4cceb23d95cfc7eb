//! Couple code lifecycle and the pairing gate.
//!
//! A couple code is the only thing tying two installations together. One
//! partner generates a code, the other joins with it; from then on every
//! scoped request carries the code and the backend partitions data by it.
//!
//! Screens that need couple data call [`PairingResolver::require_code`]
//! before doing anything else. When no code is set, the intended
//! destination is parked and the caller is told to run pairing first; after
//! pairing completes, [`PairingResolver::take_pending_destination`] hands
//! the destination back exactly once.

use rand::seq::IndexedRandom;
use thiserror::Error;
use tracing::{info, warn};

use tandem_core::{CoupleCode, CoupleCodeError};

use crate::store::{LayeredStore, StoreError, keys};

/// Errors from pairing operations.
#[derive(Debug, Error)]
pub enum PairingError {
    #[error("invalid couple code: {0}")]
    InvalidCode(#[from] CoupleCodeError),
    #[error("preference store failed: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of a pairing check before entering a couple-scoped screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// A code is set; proceed with it.
    Ready(CoupleCode),
    /// No code is set; the destination has been parked and the caller
    /// should run pairing first.
    RedirectToPairing,
}

/// Owns the stored couple code and the pairing redirect handshake.
#[derive(Debug, Clone)]
pub struct PairingResolver {
    store: LayeredStore,
}

impl PairingResolver {
    #[must_use]
    pub const fn new(store: LayeredStore) -> Self {
        Self { store }
    }

    /// Generate a fresh couple code and make it the active one.
    ///
    /// Codes are drawn uniformly from the code alphabet. There is no
    /// server-side reservation: with 36^6 possible codes, collisions are
    /// accepted as a theoretical risk rather than checked for.
    ///
    /// # Errors
    ///
    /// Returns `PairingError::Store` if the code could not be persisted.
    pub async fn generate(&self) -> Result<CoupleCode, PairingError> {
        let code = random_code()?;
        self.store.write(keys::COUPLE_CODE, code.as_str()).await?;
        info!(code = %code, "generated new couple code");
        Ok(code)
    }

    /// Adopt a partner's code as the active one.
    ///
    /// Input is normalized the way people type codes: surrounding
    /// whitespace is dropped and lowercase letters are accepted.
    ///
    /// # Errors
    ///
    /// Returns `PairingError::InvalidCode` if `input` does not normalize to
    /// a valid code, or `PairingError::Store` if it could not be persisted.
    pub async fn join(&self, input: &str) -> Result<CoupleCode, PairingError> {
        let code = CoupleCode::parse(input)?;
        self.store.write(keys::COUPLE_CODE, code.as_str()).await?;
        info!(code = %code, "joined couple");
        Ok(code)
    }

    /// The currently active couple code, if any.
    ///
    /// A stored value that no longer parses is logged, cleared, and treated
    /// as unpaired, which routes the user back through pairing.
    ///
    /// # Errors
    ///
    /// Returns `PairingError::Store` for fast-tier store failures.
    pub async fn active_code(&self) -> Result<Option<CoupleCode>, PairingError> {
        let Some(raw) = self.store.read(keys::COUPLE_CODE).await? else {
            return Ok(None);
        };
        match CoupleCode::parse(&raw) {
            Ok(code) => Ok(Some(code)),
            Err(error) => {
                warn!(%error, "stored couple code is invalid; clearing it");
                self.store.remove(keys::COUPLE_CODE).await?;
                Ok(None)
            }
        }
    }

    /// Drop the active code, unpairing this installation.
    ///
    /// # Errors
    ///
    /// Returns `PairingError::Store` if the removal failed.
    pub async fn clear(&self) -> Result<(), PairingError> {
        self.store.remove(keys::COUPLE_CODE).await?;
        info!("cleared couple code");
        Ok(())
    }

    /// Gate a couple-scoped screen on an active code.
    ///
    /// When unpaired, `destination` is parked so the flow can resume there
    /// after pairing.
    ///
    /// # Errors
    ///
    /// Returns `PairingError::Store` if the destination could not be parked.
    pub async fn require_code(&self, destination: &str) -> Result<Gate, PairingError> {
        if let Some(code) = self.active_code().await? {
            return Ok(Gate::Ready(code));
        }
        self.store
            .write(keys::PENDING_DESTINATION, destination)
            .await?;
        Ok(Gate::RedirectToPairing)
    }

    /// Take the parked destination, clearing it.
    ///
    /// # Errors
    ///
    /// Returns `PairingError::Store` for fast-tier store failures.
    pub async fn take_pending_destination(&self) -> Result<Option<String>, PairingError> {
        let destination = self.store.read(keys::PENDING_DESTINATION).await?;
        if destination.is_some() {
            self.store.remove(keys::PENDING_DESTINATION).await?;
        }
        Ok(destination)
    }
}

fn random_code() -> Result<CoupleCode, CoupleCodeError> {
    let mut rng = rand::rng();
    let raw: String = (0..CoupleCode::LENGTH)
        .filter_map(|_| CoupleCode::ALPHABET.choose(&mut rng))
        .map(|&byte| char::from(byte))
        .collect();
    CoupleCode::parse(&raw)
}
