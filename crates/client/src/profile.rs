//! Avatar and account profile persistence.
//!
//! Avatar choices are local-first: selections persist to the preference
//! store immediately and then sync to the server profile best-effort, so
//! losing the network never loses the avatar. The profile itself follows
//! the same posture the other way around: reads prefer the stored copy
//! refreshed by the last live fetch.

use tracing::{instrument, warn};

use tandem_core::{AvatarOptions, ProfileUpdate, User};

use crate::api::{ApiClient, ApiError};
use crate::store::{LayeredStore, StoreError, keys};

/// Local-first avatar and profile state.
#[derive(Debug, Clone)]
pub struct ProfileManager {
    client: ApiClient,
}

impl ProfileManager {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn store(&self) -> &LayeredStore {
        self.client.store()
    }

    /// The stored avatar part selections. Absent or unreadable selections
    /// fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` for fast-tier store failures.
    pub async fn avatar_options(&self) -> Result<AvatarOptions, StoreError> {
        Ok(self
            .store()
            .read_json(keys::USER_AVATAR_OPTIONS)
            .await?
            .unwrap_or_default())
    }

    /// Persist avatar part selections locally, then mirror them onto the
    /// server profile best-effort.
    ///
    /// The server copy rides in the profile's `profile_pic` field as JSON.
    /// A failed mirror is logged and the local save stands; the next save
    /// retries naturally.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only if the local save itself failed.
    #[instrument(skip(self, options))]
    pub async fn save_avatar_options(&self, options: &AvatarOptions) -> Result<(), StoreError> {
        self.store()
            .write_json(keys::USER_AVATAR_OPTIONS, options)
            .await?;

        let update = ProfileUpdate {
            profile_pic: serde_json::to_string(options).ok(),
            ..ProfileUpdate::default()
        };
        if let Err(error) = self.client.update_profile(&update).await {
            warn!(%error, "could not mirror avatar to the server profile; local copy stands");
        }
        Ok(())
    }

    /// Persist the rendered avatar reference (a URL or data URI).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the reference could not be stored.
    pub async fn save_avatar(&self, reference: &str) -> Result<(), StoreError> {
        self.store().write(keys::USER_AVATAR, reference).await
    }

    /// The rendered avatar reference, if one was saved.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` for fast-tier store failures.
    pub async fn avatar(&self) -> Result<Option<String>, StoreError> {
        self.store().read(keys::USER_AVATAR).await
    }

    /// The stored copy of the signed-in user's profile, from the last
    /// login or live profile fetch.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` for fast-tier store failures.
    pub async fn cached_user(&self) -> Result<Option<User>, StoreError> {
        self.store().read_json(keys::USER).await
    }

    /// Name to show for the signed-in user: the display name when set,
    /// otherwise the account email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` for fast-tier store failures.
    pub async fn display_name(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .cached_user()
            .await?
            .map(|user| user.display_name.unwrap_or(user.email)))
    }

    /// Change the display name on the server, refreshing the stored copy.
    ///
    /// Unlike avatar mirroring this is user-initiated data entry, so
    /// failures surface instead of being swallowed.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the profile update.
    #[instrument(skip(self), fields(name = %name))]
    pub async fn set_display_name(&self, name: &str) -> Result<User, ApiError> {
        let update = ProfileUpdate {
            display_name: Some(name.to_owned()),
            ..ProfileUpdate::default()
        };
        self.client.update_profile(&update).await
    }
}
