use crate::{User, UserRole};
use serde::{Deserialize, Serialize};

/// Body of `POST /auth/login`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plain-text password, sent over TLS.
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Desired display handle.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Plain-text password, sent over TLS.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Requested role. The backend decides whether to honor it.
    pub role: UserRole,
    /// Optional profile picture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// The user object as returned by the auth endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    /// Backend identifier.
    pub id: String,
    /// Display handle.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Platform role.
    pub role: UserRole,
    /// Avatar image location.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl From<AuthUser> for User {
    fn from(user: AuthUser) -> Self {
        User {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            avatar_url: user.avatar_url,
        }
    }
}

/// Successful login response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Opaque bearer token.
    pub token: String,
    /// The authenticated user.
    pub user: AuthUser,
}

/// Successful register response.
///
/// Backend revisions disagree on whether registering also issues a token, so both
/// shapes are accepted. Only the user is kept either way.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RegisterResponse {
    /// `{ token, user }`.
    WithToken(AuthResponse),
    /// The bare created user.
    User(AuthUser),
}

impl RegisterResponse {
    /// The created user, normalized.
    pub fn into_user(self) -> User {
        match self {
            RegisterResponse::WithToken(response) => response.user.into(),
            RegisterResponse::User(user) => user.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_request_is_camel_case() {
        let request = RegisterRequest {
            username: "ana".into(),
            email: "ana@x.com".into(),
            password: "secret1".into(),
            first_name: "Ana".into(),
            last_name: "Ruiz".into(),
            role: UserRole::Player,
            photo_url: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["firstName"], "Ana");
        assert_eq!(value["lastName"], "Ruiz");
        assert_eq!(value["role"], "player");
        assert!(value.get("photoUrl").is_none());
    }

    #[test]
    fn register_response_accepts_both_shapes() {
        let user = json!({
            "id": "u2",
            "username": "ref",
            "email": "ref@x.com",
            "role": "referee"
        });

        let bare: RegisterResponse = serde_json::from_value(user.clone()).unwrap();
        assert!(matches!(bare, RegisterResponse::User(_)));
        assert_eq!(bare.into_user().role, UserRole::Referee);

        let wrapped: RegisterResponse =
            serde_json::from_value(json!({ "token": "t", "user": user })).unwrap();
        assert!(matches!(wrapped, RegisterResponse::WithToken(_)));
        assert_eq!(wrapped.into_user().id, "u2");
    }

    #[test]
    fn auth_user_normalizes_into_user() {
        let auth_user: AuthUser = serde_json::from_value(json!({
            "id": "u1",
            "username": "org",
            "email": "org@x.com",
            "firstName": "Olga",
            "role": "organizer",
            "avatarUrl": "https://cdn/x.png"
        }))
        .unwrap();
        let user = User::from(auth_user);
        assert_eq!(user.first_name.as_deref(), Some("Olga"));
        assert_eq!(user.last_name, None);
        assert_eq!(user.avatar_url.as_deref(), Some("https://cdn/x.png"));
    }
}
