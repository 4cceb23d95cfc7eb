//! Couple linkage endpoints.
//!
//! These are account-level: they tie the signed-in account to a couple code
//! server-side so the code survives a reinstall. The locally active code
//! lives with [`PairingResolver`](crate::pairing::PairingResolver); the two
//! agree once both halves of a couple have paired and logged in.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tandem_core::CoupleCode;

use super::{ApiClient, ApiError};

/// Wire shape of the couple linkage record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoupleLink {
    /// Code the account is linked to; absent when not yet linked.
    pub code: Option<CoupleCode>,
}

impl ApiClient {
    /// The couple code linked to the signed-in account.
    ///
    /// Deliberately not served from cache: pairing decisions need the live
    /// answer or an honest failure.
    #[instrument(skip(self))]
    pub async fn linked_code(&self) -> Result<CoupleLink, ApiError> {
        let builder = self.unscoped(Method::GET, "couple/code").await?;
        self.send_parsed(builder).await
    }

    /// Link the signed-in account to `code` server-side.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn link_code(&self, code: &CoupleCode) -> Result<CoupleLink, ApiError> {
        self.post_unscoped(
            "couple/link",
            &CoupleLink {
                code: Some(code.clone()),
            },
        )
        .await
    }
}
