//! User and authentication wire types.

use serde::{Deserialize, Serialize};

use super::id::{ProfileId, UserId};

/// The authenticated user, as returned by `GET /auth/users/me/` and inside
/// the login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Account email.
    pub email: String,
    /// Display username.
    pub username: String,
}

/// The user's profile, as returned by `GET /api/user-profile/`.
///
/// Exactly one profile exists per user; the API boundary normalizes the
/// backend's list-vs-object ambiguity before this type is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Profile ID (distinct from the user ID).
    pub id: ProfileId,
    /// Owning user.
    pub user: UserId,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Phone number.
    #[serde(default)]
    pub phone_number: String,
    /// Saved billing address (flattened string).
    #[serde(default)]
    pub billing_address: String,
    /// Saved shipping address (flattened string).
    #[serde(default)]
    pub shipping_address: String,
}

/// Login payload for `POST /auth/login/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Plain-text password (sent over TLS, never stored).
    pub password: String,
}

/// Registration payload for `POST /auth/users/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Account email.
    pub email: String,
    /// Display username.
    pub username: String,
    /// Plain-text password (sent over TLS, never stored).
    pub password: String,
}

/// Successful response from `POST /auth/login/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Short-lived access token (sent as `Authorization: JWT <access>`).
    pub access: String,
    /// Long-lived refresh token.
    pub refresh: String,
    /// The user that just authenticated.
    pub user: User,
}

/// Mutable profile fields for `POST`/`PATCH api/user-profile/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePayload {
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Phone number.
    #[serde(default)]
    pub phone_number: String,
    /// Billing address (flattened string).
    #[serde(default)]
    pub billing_address: String,
    /// Shipping address (flattened string).
    #[serde(default)]
    pub shipping_address: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_deserializes() {
        let json = r#"{
            "access": "aaa.bbb.ccc",
            "refresh": "ddd.eee.fff",
            "user": {"id": 4, "email": "a@b.c", "username": "ab"}
        }"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.user.id, UserId::new(4));
        assert_eq!(resp.access, "aaa.bbb.ccc");
    }

    #[test]
    fn test_profile_defaults_for_sparse_response() {
        let json = r#"{"id": 1, "user": 4}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert!(profile.billing_address.is_empty());
        assert!(profile.phone_number.is_empty());
    }
}
