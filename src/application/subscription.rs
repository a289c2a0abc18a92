//! Ownership handles over active feeds.

use std::fmt;

type Release = Box<dyn FnOnce() + Send>;

/// Handle owning one active feed subscription.
///
/// Releasing runs the feed's teardown exactly once. Dropping a handle releases
/// it, so a subscription cannot outlive its owner by accident.
///
/// ```
/// use live_timeago::Subscription;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let releases = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&releases);
/// let mut subscription = Subscription::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// subscription.release();
/// subscription.release();
/// drop(subscription);
/// assert_eq!(releases.load(Ordering::SeqCst), 1);
/// ```
#[must_use = "dropping a Subscription releases it immediately"]
pub struct Subscription {
    release: Option<Release>,
}

impl Subscription {
    /// Create a handle that runs `release` when released or dropped.
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A handle with nothing to release.
    pub fn empty() -> Self {
        Self { release: None }
    }

    /// Release the feed. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    /// Whether the handle has already been released.
    pub fn is_released(&self) -> bool {
        self.release.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("released", &self.is_released())
            .finish()
    }
}
