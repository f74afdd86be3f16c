//! # Tournify Core
//!
//! `tournify-core` provides the foundational types shared by every tournify client crate.
//! It defines the authenticated user identity, the wire models exchanged with the
//! backend's authentication endpoints, the normalized error taxonomy and the
//! per-deployment client configuration.

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Client configuration and deployment presets.
pub mod config;

/// Errors that can occur while talking to the backend or managing the session.
pub mod error;

/// Wire models for the authentication endpoints.
pub mod models;

/// Navigation sink used for side-effect redirects.
pub mod navigation;

/// Unverified inspection of bearer token payloads.
pub mod token;

pub use config::ClientConfig;
pub use error::AuthError;
pub use models::{AuthResponse, AuthUser, LoginRequest, RegisterRequest, RegisterResponse};
pub use navigation::{Navigator, NoopNavigator, RecordingNavigator};
pub use token::TokenPayload;

/// The role a user holds on the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Registers for tournaments and plays matches.
    Player,
    /// Creates and runs tournaments.
    Organizer,
    /// Officiates matches.
    Referee,
    /// Platform administrator.
    Admin,
}

impl UserRole {
    /// The wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Player => "player",
            UserRole::Organizer => "organizer",
            UserRole::Referee => "referee",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(UserRole::Player),
            "organizer" => Ok(UserRole::Organizer),
            "referee" => Ok(UserRole::Referee),
            "admin" => Ok(UserRole::Admin),
            other => Err(AuthError::Decode(format!("Unknown role `{other}`"))),
        }
    }
}

/// The authenticated user's public profile, cached client-side.
///
/// This is the identity held by the session store and persisted next to the
/// bearer token. It is serialized with camelCase keys, the same shape the
/// backend returns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend identifier (a UUID in practice, opaque here).
    pub id: String,
    /// Display handle.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Given name, when the backend knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name, when the backend knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Platform role.
    pub role: UserRole,
    /// Avatar image location.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl User {
    /// Returns true if the user's role is one of `roles`.
    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        roles.contains(&self.role)
    }
}
