//! Multicast notification stream used as a binding's merged render trigger.
//!
//! A [`Signal`] fans notifications from any number of producers out to its
//! observers, synchronously and in the order `next` is called. It never
//! reorders or coalesces. Once completed it delivers nothing further and
//! detaches every observer.

use crate::application::subscription::Subscription;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Sink<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Observer<T> {
    id: u64,
    active: AtomicBool,
    sink: Sink<T>,
}

struct SignalInner<T> {
    observers: Mutex<Vec<Arc<Observer<T>>>>,
    next_id: AtomicU64,
    completed: AtomicBool,
}

impl<T> SignalInner<T> {
    fn observers(&self) -> MutexGuard<'_, Vec<Arc<Observer<T>>>> {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// A multicast notification stream.
///
/// ```
/// use live_timeago::Signal;
/// use std::sync::{Arc, Mutex};
///
/// let signal = Signal::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let seen_clone = Arc::clone(&seen);
/// let _subscription = signal.subscribe(move |value: &u32| seen_clone.lock().unwrap().push(*value));
///
/// signal.next(1);
/// signal.next(2);
/// signal.complete();
/// signal.next(3);
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
/// ```
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T: 'static> Signal<T> {
    /// Create an open signal with no observers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalInner {
                observers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                completed: AtomicBool::new(false),
            }),
        }
    }

    /// Attach an observer.
    ///
    /// Subscribing to a completed signal returns an already released handle.
    pub fn subscribe<F>(&self, sink: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        if self.is_completed() {
            return Subscription::empty();
        }

        let observer = Arc::new(Observer {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            active: AtomicBool::new(true),
            sink: Arc::new(sink),
        });
        self.inner.observers().push(Arc::clone(&observer));

        let signal: Weak<SignalInner<T>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            observer.active.store(false, Ordering::Release);
            if let Some(signal) = signal.upgrade() {
                signal.observers().retain(|o| o.id != observer.id);
            }
        })
    }

    /// Deliver `value` to every active observer, returning how many saw it.
    ///
    /// Observers are invoked outside the internal lock, so a sink may
    /// subscribe, release or complete without deadlocking. An observer
    /// released mid-delivery is skipped.
    pub fn next(&self, value: T) -> usize {
        if self.is_completed() {
            return 0;
        }

        let snapshot: Vec<Arc<Observer<T>>> = self.inner.observers().clone();
        let mut delivered = 0;
        for observer in snapshot {
            if self.is_completed() {
                break;
            }
            if observer.active.load(Ordering::Acquire) {
                (observer.sink)(&value);
                delivered += 1;
            }
        }
        delivered
    }

    /// Terminate the signal and detach all observers. Idempotent.
    pub fn complete(&self) {
        if self.inner.completed.swap(true, Ordering::AcqRel) {
            return;
        }
        let detached: Vec<Arc<Observer<T>>> = self.inner.observers().drain(..).collect();
        for observer in detached {
            observer.active.store(false, Ordering::Release);
        }
    }

    /// Whether `complete` has been called.
    pub fn is_completed(&self) -> bool {
        self.inner.completed.load(Ordering::Acquire)
    }

    /// Number of attached observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers().len()
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("observers", &self.inner.observers().len())
            .field("completed", &self.inner.completed.load(Ordering::Acquire))
            .finish()
    }
}
