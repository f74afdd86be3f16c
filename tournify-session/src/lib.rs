//! # Tournify Session
//!
//! Client-side session state: the in-memory [`SessionStore`] broadcasting the
//! current user, the durable [`CredentialPersistence`] for the token and user
//! snapshot, the single-slot [`ReturnUrl`] marker, and the [`Session`] handle
//! that keeps the first two in step.

#![warn(missing_docs)]

/// Token and user persistence.
pub mod credentials;
/// Return-URL marker.
pub mod return_url;
/// Storage backends.
pub mod storage;
/// Reactive identity store.
pub mod store;

pub use credentials::{CredentialPersistence, Credentials};
pub use return_url::ReturnUrl;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{SessionStore, Subscription};

use tournify_core::{AuthError, User};
use tracing::{debug, warn};

/// The process-wide session: identity store plus persisted credentials.
///
/// Clones share state. Build one at startup with [`Session::restore`] and hand
/// clones to every component that needs it.
#[derive(Clone, Debug)]
pub struct Session {
    store: SessionStore,
    credentials: CredentialPersistence,
}

impl Session {
    /// Hydrate the store from persisted credentials.
    ///
    /// A token without a readable user, or a user without a token, is left over
    /// from an interrupted write. Both keys are cleared and the session starts empty.
    pub fn restore(credentials: CredentialPersistence) -> Self {
        let user = match credentials.load() {
            Some(stored) => {
                debug!(user_id = %stored.user.id, "Restored persisted session");
                Some(stored.user)
            }
            None => {
                if credentials.has_any() {
                    warn!("Discarding partially persisted credentials");
                    if let Err(e) = credentials.clear() {
                        warn!(error = %e, "Failed to clear partial credentials");
                    }
                }
                None
            }
        };
        Self {
            store: SessionStore::new(user),
            credentials,
        }
    }

    /// The identity store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The credential persistence.
    pub fn credentials(&self) -> &CredentialPersistence {
        &self.credentials
    }

    /// The current user.
    pub fn current_user(&self) -> Option<User> {
        self.store.current()
    }

    /// The persisted bearer token.
    ///
    /// Meant for the request middleware only; UI code has no business with it.
    pub fn bearer_token(&self) -> Option<String> {
        self.credentials.token()
    }

    /// Whether a non-empty token is persisted right now.
    pub fn has_token(&self) -> bool {
        self.credentials.token().is_some()
    }

    /// Persist `token` and `user`, then publish `user`.
    ///
    /// The store is left untouched if persisting fails.
    pub fn establish(&self, token: &str, user: User) -> Result<(), StorageError> {
        self.credentials.save(token, &user)?;
        self.store.set(Some(user));
        Ok(())
    }

    /// Replace the user snapshot, keeping the token.
    ///
    /// Fails with [`AuthError::SessionExpired`] and changes nothing when no token
    /// is persisted, e.g. after a logout that raced a profile fetch.
    pub fn replace_user(&self, user: User) -> Result<(), AuthError> {
        if !self.has_token() {
            debug!(user_id = %user.id, "No token persisted; dropping user update");
            return Err(AuthError::SessionExpired);
        }
        self.credentials.save_user(&user)?;
        self.store.set(Some(user));
        Ok(())
    }

    /// Clear persisted credentials and the store. Never fails.
    pub fn invalidate(&self) {
        if let Err(e) = self.credentials.clear() {
            warn!(error = %e, "Failed to clear persisted credentials");
        }
        self.store.set(None);
    }
}
