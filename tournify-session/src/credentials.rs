use crate::storage::{KeyValueStorage, StorageError};
use std::fmt;
use std::sync::Arc;
use tournify_core::{ClientConfig, User};
use tracing::warn;

/// A persisted token together with the user it was issued for.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Opaque bearer token.
    pub token: String,
    /// Snapshot of the user at the time of the last write.
    pub user: User,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Durable storage of the bearer token and the serialized user.
///
/// The two values live under separate keys and are written one after the
/// other, user first. A crash in between leaves a user without a token, which
/// [`CredentialPersistence::load`] reports as no credentials at all.
#[derive(Clone)]
pub struct CredentialPersistence {
    storage: Arc<dyn KeyValueStorage>,
    token_key: String,
    user_key: String,
}

impl fmt::Debug for CredentialPersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPersistence")
            .field("token_key", &self.token_key)
            .field("user_key", &self.user_key)
            .finish_non_exhaustive()
    }
}

impl CredentialPersistence {
    /// Persist under explicit key names.
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        token_key: impl Into<String>,
        user_key: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            token_key: token_key.into(),
            user_key: user_key.into(),
        }
    }

    /// Persist under the key names of `config`.
    pub fn from_config(storage: Arc<dyn KeyValueStorage>, config: &ClientConfig) -> Self {
        Self::new(storage, config.token_key.clone(), config.user_key.clone())
    }

    /// Write both the token and the user.
    pub fn save(&self, token: &str, user: &User) -> Result<(), StorageError> {
        self.save_user(user)?;
        self.storage.set_item(&self.token_key, token)
    }

    /// Overwrite only the user snapshot, keeping the token.
    pub fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let json = serde_json::to_string(user)?;
        self.storage.set_item(&self.user_key, &json)
    }

    /// Read both values. Returns `None` unless a non-empty token and a parseable
    /// user are both present.
    pub fn load(&self) -> Option<Credentials> {
        let token = self.token()?;
        let user = self.user()?;
        Some(Credentials { token, user })
    }

    /// The stored token, if any. Empty strings count as absent.
    pub fn token(&self) -> Option<String> {
        match self.storage.get_item(&self.token_key) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                None
            }
        }
    }

    /// The stored user, if present and parseable.
    pub fn user(&self) -> Option<User> {
        let json = match self.storage.get_item(&self.user_key) {
            Ok(json) => json?,
            Err(e) => {
                warn!(error = %e, "Failed to read stored user");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Ignoring unparseable stored user");
                None
            }
        }
    }

    /// Whether either key currently holds a value, parseable or not.
    pub fn has_any(&self) -> bool {
        [&self.token_key, &self.user_key]
            .into_iter()
            .any(|key| matches!(self.storage.get_item(key), Ok(Some(_))))
    }

    /// Remove both values. Both removals are attempted; the first failure is returned.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.storage.remove_item(&self.token_key);
        let user = self.storage.remove_item(&self.user_key);
        token.and(user)
    }
}
