use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::watch;
use tournify_core::User;

type Observer = Arc<dyn Fn(Option<&User>) + Send + Sync>;

struct Inner {
    observers: Mutex<Vec<(u64, Observer)>>,
    next_id: AtomicU64,
    // Sole holder of the current value.
    watch: watch::Sender<Option<User>>,
}

impl Inner {
    fn remove(&self, id: u64) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(observer_id, _)| *observer_id != id);
    }
}

/// Holds the current identity and broadcasts every change.
///
/// Clones are handles to the same store. Subscribers are called synchronously,
/// in subscription order, before [`SessionStore::set`] returns. A new subscriber
/// immediately receives the current value.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("current", &self.current())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionStore {
    /// Create a store holding `initial`.
    pub fn new(initial: Option<User>) -> Self {
        let (watch, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                observers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                watch,
            }),
        }
    }

    /// The latest value.
    pub fn current(&self) -> Option<User> {
        self.inner.watch.borrow().clone()
    }

    /// Whether a user is currently set.
    pub fn is_present(&self) -> bool {
        self.inner.watch.borrow().is_some()
    }

    /// Replace the current value and notify every subscriber.
    ///
    /// Observers run without any lock held, so they may read the store or
    /// subscribe again from inside the callback.
    pub fn set(&self, user: Option<User>) {
        // Stored under the observer lock: an observer registered afterwards
        // picks the value up through the replay in `subscribe`.
        let observers: Vec<Observer> = {
            let observers = self
                .inner
                .observers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.inner.watch.send_replace(user.clone());
            observers.iter().map(|(_, observer)| observer.clone()).collect()
        };
        for observer in observers {
            observer(user.as_ref());
        }
    }

    /// Register `observer` for every future change.
    ///
    /// The observer is called once right away with the current value. It stays
    /// registered until the returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(Option<&User>) + Send + Sync + 'static,
    {
        let observer: Observer = Arc::new(observer);
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, observer.clone()));

        observer(self.current().as_ref());

        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// A receiver for async consumers. It starts at the current value.
    pub fn watch(&self) -> watch::Receiver<Option<User>> {
        self.inner.watch.subscribe()
    }

    /// Number of live callback subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Keeps an observer registered on a [`SessionStore`]. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    store: Weak<Inner>,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn unsubscribe(self) {}
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner.remove(self.id);
        }
    }
}
