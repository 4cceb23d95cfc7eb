//! User accounts, login, and avatar customization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CoupleCode, UserId};

/// A user account as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    /// Avatar identifier; this app renders avatars from options, not photos.
    pub profile_pic: Option<String>,
    /// The couple this account belongs to, once linked.
    pub couple_code: Option<CoupleCode>,
    pub created_at: DateTime<Utc>,
}

/// Request body for registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Joining an existing couple at signup, if the partner shared a code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub couple_code: Option<CoupleCode>,
}

/// Partial patch for the profile endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub couple_code: Option<CoupleCode>,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    pub user: User,
}

/// The dimensions of a customizable avatar.
///
/// Field values are the avatar library's style tokens (`ShortHairFlat`,
/// `BrownDark`, ...). Kept camelCase on the wire and in local storage so
/// saved avatars from older installs still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarOptions {
    pub top_type: String,
    pub accessories_type: String,
    pub hair_color: String,
    pub facial_hair_type: String,
    pub facial_hair_color: String,
    pub clothe_type: String,
    pub clothe_color: String,
    pub eye_type: String,
    pub eyebrow_type: String,
    pub mouth_type: String,
    pub skin_color: String,
}

impl Default for AvatarOptions {
    fn default() -> Self {
        Self {
            top_type: "ShortHairFlat".to_owned(),
            accessories_type: "None".to_owned(),
            hair_color: "BrownDark".to_owned(),
            facial_hair_type: "None".to_owned(),
            facial_hair_color: "BrownDark".to_owned(),
            clothe_type: "GraphicShirt".to_owned(),
            clothe_color: "Blue03".to_owned(),
            eye_type: "Default".to_owned(),
            eyebrow_type: "Default".to_owned(),
            mouth_type: "Smile".to_owned(),
            skin_color: "Light".to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_options_use_camel_case_keys() {
        let json = serde_json::to_value(AvatarOptions::default()).unwrap();
        assert_eq!(json["topType"], "ShortHairFlat");
        assert_eq!(json["skinColor"], "Light");
        assert!(json.get("top_type").is_none());
    }

    #[test]
    fn test_login_response_parses() {
        let json = serde_json::json!({
            "access_token": "abc.def.ghi",
            "token_type": "bearer",
            "user": {
                "id": 1,
                "email": "ana@example.com",
                "display_name": "Ana",
                "profile_pic": null,
                "couple_code": "7K2XQ9",
                "created_at": "2025-01-01T00:00:00Z",
            },
        });

        let login: LoginResponse = serde_json::from_value(json).unwrap();
        assert_eq!(login.token_type, "bearer");
        assert_eq!(login.user.id, UserId::new(1));
        assert_eq!(
            login.user.couple_code.unwrap().as_str(),
            "7K2XQ9"
        );
    }
}
