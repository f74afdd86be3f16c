use std::sync::{Arc, Mutex, PoisonError};

/// Performs a route change on behalf of a component that cannot return a redirect.
///
/// Guards return their redirects as values; the request middleware, which runs
/// outside any navigation, routes through this trait instead.
pub trait Navigator: Send + Sync {
    /// Navigate the application to `url`.
    fn navigate(&self, url: &str);
}

impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    fn navigate(&self, url: &str) {
        (**self).navigate(url)
    }
}

impl<T: Navigator + ?Sized> Navigator for Box<T> {
    fn navigate(&self, url: &str) {
        (**self).navigate(url)
    }
}

/// A navigator that ignores every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _url: &str) {}
}

/// A navigator that records every destination, in order.
///
/// Clones share the same history.
#[derive(Clone, Debug, Default)]
pub struct RecordingNavigator {
    visits: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All destinations navigated to so far.
    pub fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent destination.
    pub fn last(&self) -> Option<String> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
    }
}
