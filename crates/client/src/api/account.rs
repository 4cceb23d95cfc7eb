//! Account endpoints: registration, login, and the stored session.

use reqwest::Method;
use tracing::{info, instrument};

use tandem_core::{LoginResponse, NewUser, ProfileUpdate, User};

use super::{ApiClient, ApiError, Fetched, Source};
use crate::store::keys;

impl ApiClient {
    /// Create an account. Registration does not sign the user in; follow
    /// with [`Self::login`].
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub async fn register(&self, new_user: &NewUser) -> Result<User, ApiError> {
        self.post_unscoped("user/register", new_user).await
    }

    /// Exchange credentials for a bearer token and persist the session.
    ///
    /// The token and user profile land in the preference store under the
    /// `token` and `user` keys, which is where every later request picks
    /// the token up from.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        // OAuth2 password grant form; the username field carries the email.
        let form = [("username", email), ("password", password)];
        let builder = self.unscoped(Method::POST, "user/login").await?.form(&form);
        let login: LoginResponse = self.send_parsed(builder).await?;

        self.store().write(keys::TOKEN, &login.access_token).await?;
        self.store().write_json(keys::USER, &login.user).await?;
        info!(user_id = %login.user.id, "logged in");
        Ok(login.user)
    }

    /// Drop the stored session. Purely local; there is no server-side
    /// session to end.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.store().remove(keys::TOKEN).await?;
        self.store().remove(keys::USER).await?;
        info!("logged out");
        Ok(())
    }

    /// The signed-in user's profile. A live fetch refreshes the stored copy.
    #[instrument(skip(self))]
    pub async fn fetch_profile(&self) -> Result<Fetched<User>, ApiError> {
        let fetched = self.get_unscoped::<User>("user/profile").await?;
        if fetched.source == Source::Live {
            self.store().write_json(keys::USER, &fetched.value).await?;
        }
        Ok(fetched)
    }

    /// Update profile fields, refreshing the stored copy.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let user: User = self.put_unscoped("user/profile", update).await?;
        self.store().write_json(keys::USER, &user).await?;
        Ok(user)
    }
}
