use crate::{error::AuthError, UserRole};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by the backend's JWT bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    /// Subject user id.
    pub user_id: String,
    /// Subject email.
    pub email: String,
    /// Role at issue time.
    pub role: UserRole,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Issue time, seconds since the epoch.
    pub iat: i64,
}

impl TokenPayload {
    /// Reads the payload segment of a JWT without checking its signature.
    ///
    /// For display only. The client never trusts these claims; the backend
    /// rejects bad tokens with 401.
    pub fn decode_unverified(token: &str) -> Result<Self, AuthError> {
        let mut segments = token.split('.');
        let payload = match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(AuthError::Decode("Token is not a JWT".to_string())),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| AuthError::Decode(format!("Invalid token payload encoding: {e}")))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| AuthError::Decode(format!("Invalid token payload: {e}")))
    }

    /// Expiry as a timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Issue time as a timestamp.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Whether the token had expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map_or(true, |exp| exp <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jwt(payload: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.signature")
    }

    #[test]
    fn decodes_claims_without_verifying() {
        let token = jwt(json!({
            "userId": "u1",
            "email": "org@x.com",
            "role": "organizer",
            "exp": 1_900_000_000,
            "iat": 1_800_000_000
        }));
        let payload = TokenPayload::decode_unverified(&token).unwrap();
        assert_eq!(payload.user_id, "u1");
        assert_eq!(payload.role, UserRole::Organizer);
        assert_eq!(payload.expires_at().unwrap().timestamp(), 1_900_000_000);

        let before = DateTime::from_timestamp(1_850_000_000, 0).unwrap();
        let after = DateTime::from_timestamp(1_950_000_000, 0).unwrap();
        assert!(!payload.is_expired_at(before));
        assert!(payload.is_expired_at(after));
    }

    #[test]
    fn opaque_tokens_are_rejected() {
        assert!(matches!(
            TokenPayload::decode_unverified("abc123"),
            Err(AuthError::Decode(_))
        ));
        assert!(matches!(
            TokenPayload::decode_unverified("a.!!!.c"),
            Err(AuthError::Decode(_))
        ));
    }
}
