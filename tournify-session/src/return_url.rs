use crate::storage::{KeyValueStorage, StorageError};
use std::sync::Arc;
use tournify_core::ClientConfig;
use tracing::warn;

/// Single-slot marker remembering where an unauthenticated user was headed.
///
/// Writes overwrite, reads through [`ReturnUrl::take`] consume. Meant to sit on
/// session-scoped storage, not on the durable storage used for credentials.
#[derive(Clone)]
pub struct ReturnUrl {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl std::fmt::Debug for ReturnUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReturnUrl")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl ReturnUrl {
    /// Use `key` on `storage`.
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Use the return-URL key of `config`.
    pub fn from_config(storage: Arc<dyn KeyValueStorage>, config: &ClientConfig) -> Self {
        Self::new(storage, config.return_url_key.clone())
    }

    /// Remember `url`, replacing whatever was stored.
    pub fn store(&self, url: &str) -> Result<(), StorageError> {
        self.storage.set_item(&self.key, url)
    }

    /// Read without consuming.
    pub fn peek(&self) -> Option<String> {
        match self.storage.get_item(&self.key) {
            Ok(url) => url.filter(|u| !u.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read return URL");
                None
            }
        }
    }

    /// Read and delete.
    pub fn take(&self) -> Option<String> {
        let url = self.peek()?;
        if let Err(e) = self.storage.remove_item(&self.key) {
            warn!(error = %e, "Failed to clear return URL");
        }
        Some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn last_write_wins_and_take_consumes() {
        let config = ClientConfig::default();
        let marker = ReturnUrl::from_config(Arc::new(MemoryStorage::new()), &config);
        assert_eq!(marker.take(), None);

        marker.store("/tournaments/7").unwrap();
        marker.store("/tournaments/join/42").unwrap();
        assert_eq!(marker.peek().as_deref(), Some("/tournaments/join/42"));

        assert_eq!(marker.take().as_deref(), Some("/tournaments/join/42"));
        assert_eq!(marker.take(), None);
    }
}
