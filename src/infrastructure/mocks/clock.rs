//! Mock clocks for testing.

use crate::application::ports::{Clock, Tick, TickSink, TimeSource};
use crate::application::subscription::Subscription;
use crate::domain::date::ResolvedInstant;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock time source for testing.
///
/// Time only moves when the test says so.
///
/// # Examples
///
/// ```
/// use live_timeago::infrastructure::mocks::MockTimeSource;
/// use live_timeago::{ResolvedInstant, TimeSource};
/// use std::time::Duration;
///
/// let start = ResolvedInstant::from_millis(1_000);
/// let time = MockTimeSource::new(start);
/// assert_eq!(time.now(), start);
///
/// time.advance(Duration::from_secs(10));
/// assert_eq!(time.now().as_millis(), 11_000);
///
/// time.set(ResolvedInstant::from_millis(0));
/// assert_eq!(time.now().as_millis(), 0);
/// ```
///
/// All clones share the same current time.
#[derive(Debug, Clone)]
pub struct MockTimeSource {
    current: Arc<Mutex<ResolvedInstant>>,
}

impl MockTimeSource {
    /// Create a mock time source frozen at `start`.
    pub fn new(start: ResolvedInstant) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Move time forward.
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().expect(
            "MockTimeSource mutex poisoned - a test thread panicked while holding the lock",
        );
        *current = ResolvedInstant::from_millis(current.as_millis() + duration.as_millis() as i64);
    }

    /// Jump to a specific instant.
    pub fn set(&self, instant: ResolvedInstant) {
        *self.current.lock().expect(
            "MockTimeSource mutex poisoned - a test thread panicked while holding the lock",
        ) = instant;
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> ResolvedInstant {
        *self
            .current
            .lock()
            .expect("MockTimeSource mutex poisoned - a test thread panicked while holding the lock")
    }
}

/// Something that happened to a [`ManualClock`] feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// A feed was registered; feeds are numbered from 0 in registration order
    Registered {
        feed: usize,
        instant: ResolvedInstant,
    },
    /// A tick was delivered to a feed's sink
    Ticked { feed: usize, index: u64 },
    /// A feed's subscription was released
    Released { feed: usize },
}

struct Feed {
    instant: ResolvedInstant,
    sink: TickSink,
    next_index: u64,
    released: Arc<AtomicBool>,
}

#[derive(Default)]
struct ManualClockInner {
    feeds: Vec<Feed>,
    log: Vec<ClockEvent>,
}

/// Scripted tick feed for testing.
///
/// Delivers tick 0 inside `register`, like any conforming clock, and further
/// ticks only when the test calls [`advance`](Self::advance). Every
/// registration, tick and release is logged so tests can check ordering.
///
/// All clones share the same feeds.
#[derive(Clone, Default)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualClockInner>>,
}

impl ManualClock {
    /// Create a clock with no feeds.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualClockInner> {
        self.inner
            .lock()
            .expect("ManualClock mutex poisoned - a test thread panicked while holding the lock")
    }

    /// Deliver the next tick to every unreleased feed. Returns how many feeds ticked.
    pub fn advance(&self) -> usize {
        let pending: Vec<(TickSink, Tick)> = {
            let mut inner = self.lock();
            let ManualClockInner { feeds, log } = &mut *inner;
            feeds
                .iter_mut()
                .enumerate()
                .filter(|(_, feed)| !feed.released.load(Ordering::Acquire))
                .map(|(id, feed)| next_tick(id, feed, log))
                .collect()
        };
        for (sink, tick) in &pending {
            sink(*tick);
        }
        pending.len()
    }

    /// Deliver the next tick to `feed` even if it was released, as a late
    /// in-flight tick would be.
    ///
    /// # Panics
    /// Panics if `feed` was never registered.
    pub fn emit_unchecked(&self, feed: usize) {
        let (sink, tick) = {
            let mut inner = self.lock();
            let ManualClockInner { feeds, log } = &mut *inner;
            next_tick(feed, &mut feeds[feed], log)
        };
        sink(tick);
    }

    /// Number of feeds ever registered.
    pub fn registrations(&self) -> usize {
        self.lock().feeds.len()
    }

    /// Number of feeds not yet released.
    pub fn active_feeds(&self) -> usize {
        self.lock()
            .feeds
            .iter()
            .filter(|feed| !feed.released.load(Ordering::Acquire))
            .count()
    }

    /// Whether `feed` has been released.
    ///
    /// # Panics
    /// Panics if `feed` was never registered.
    pub fn is_released(&self, feed: usize) -> bool {
        self.lock().feeds[feed].released.load(Ordering::Acquire)
    }

    /// Everything that happened so far, in order.
    pub fn log(&self) -> Vec<ClockEvent> {
        self.lock().log.clone()
    }
}

fn next_tick(id: usize, feed: &mut Feed, log: &mut Vec<ClockEvent>) -> (TickSink, Tick) {
    let tick = Tick {
        index: feed.next_index,
        instant: feed.instant,
    };
    feed.next_index += 1;
    log.push(ClockEvent::Ticked {
        feed: id,
        index: tick.index,
    });
    (Arc::clone(&feed.sink), tick)
}

impl Clock for ManualClock {
    fn register(&self, instant: ResolvedInstant, sink: TickSink) -> Subscription {
        let released = Arc::new(AtomicBool::new(false));
        let (id, first) = {
            let mut inner = self.lock();
            let id = inner.feeds.len();
            inner.log.push(ClockEvent::Registered { feed: id, instant });
            inner.feeds.push(Feed {
                instant,
                sink,
                next_index: 0,
                released: Arc::clone(&released),
            });
            let ManualClockInner { feeds, log } = &mut *inner;
            (id, next_tick(id, &mut feeds[id], log))
        };

        let (sink, tick) = first;
        sink(tick);

        let inner = Arc::clone(&self.inner);
        Subscription::new(move || {
            if !released.swap(true, Ordering::AcqRel) {
                inner
                    .lock()
                    .expect("ManualClock mutex poisoned - a test thread panicked while holding the lock")
                    .log
                    .push(ClockEvent::Released { feed: id });
            }
        })
    }
}

impl std::fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualClock")
            .field("registrations", &self.registrations())
            .field("active_feeds", &self.active_feeds())
            .finish()
    }
}
