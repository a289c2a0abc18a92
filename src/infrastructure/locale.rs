//! Process-wide locale table with change notifications.

use crate::application::ports::{ChangeSink, LocaleStore};
use crate::application::signal::Signal;
use crate::application::subscription::Subscription;
use crate::domain::strings::{LocaleStrings, StringTableError};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug)]
struct StoreInner {
    strings: RwLock<LocaleStrings>,
    changes: Signal<()>,
}

/// Shared, clonable locale store.
///
/// All clones see the same table. Every replacement or update notifies each
/// subscriber exactly once, after the new table is in place.
///
/// # Example
/// ```
/// use live_timeago::{LocaleStore, LocaleStrings, SharedLocaleStore};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let store = SharedLocaleStore::default();
/// let changes = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&changes);
/// let _subscription = store.subscribe(Arc::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// store.update(|table| table.suffix_ago = Some("back".to_string()));
/// assert_eq!(changes.load(Ordering::SeqCst), 1);
/// assert_eq!(store.strings().suffix_ago.as_deref(), Some("back"));
/// ```
#[derive(Debug, Clone)]
pub struct SharedLocaleStore {
    inner: Arc<StoreInner>,
}

impl SharedLocaleStore {
    /// Create a store holding `strings`.
    pub fn new(strings: LocaleStrings) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                strings: RwLock::new(strings),
                changes: Signal::new(),
            }),
        }
    }

    /// A copy of the current table.
    pub fn strings(&self) -> LocaleStrings {
        self.with_strings(LocaleStrings::clone)
    }

    /// Read the current table without copying it.
    pub fn with_strings<R>(&self, f: impl FnOnce(&LocaleStrings) -> R) -> R {
        let strings = self
            .inner
            .strings
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&strings)
    }

    /// Replace the table and notify subscribers.
    pub fn set_strings(&self, strings: LocaleStrings) {
        self.update(|table| *table = strings);
    }

    /// Modify the table in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut LocaleStrings)) {
        {
            let mut strings = self
                .inner
                .strings
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            f(&mut strings);
        }
        let notified = self.inner.changes.next(());
        tracing::debug!(subscribers = notified, "locale table changed");
    }

    /// Replace the table with one loaded from JSON.
    ///
    /// # Errors
    /// Returns `StringTableError` and leaves the current table untouched if the
    /// document is invalid.
    pub fn load_json(&self, json: &str) -> Result<(), StringTableError> {
        let strings = LocaleStrings::from_json(json)?;
        self.set_strings(strings);
        Ok(())
    }

    /// Number of live change subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.changes.observer_count()
    }
}

impl Default for SharedLocaleStore {
    fn default() -> Self {
        Self::new(LocaleStrings::english())
    }
}

impl LocaleStore for SharedLocaleStore {
    fn subscribe(&self, sink: ChangeSink) -> Subscription {
        self.inner.changes.subscribe(move |_: &()| sink())
    }
}
