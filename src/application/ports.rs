//! Ports (interfaces) for the application layer.
//!
//! The binding only talks to its collaborators through these traits.
//! Infrastructure provides the concrete adapters (`AdaptiveClock`,
//! `IntlFormatter`, `SharedLocaleStore`, `TextNode`) and the test doubles.

use crate::application::subscription::Subscription;
use crate::domain::date::ResolvedInstant;
use std::fmt::Debug;
use std::sync::Arc;

/// One notification from a clock feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Zero-based, strictly increasing position in the feed
    pub index: u64,
    /// The instant the feed was registered for
    pub instant: ResolvedInstant,
}

/// Receiver of clock ticks.
pub type TickSink = Arc<dyn Fn(Tick) + Send + Sync>;

/// Receiver of locale change notifications.
pub type ChangeSink = Arc<dyn Fn() + Send + Sync>;

/// Port for obtaining the current wall-clock time.
///
/// Infrastructure provides `SystemTimeSource` for production and
/// `MockTimeSource` for tests.
pub trait TimeSource: Send + Sync + Debug {
    /// Current time as an absolute instant.
    fn now(&self) -> ResolvedInstant;
}

/// Port for the adaptive tick scheduler.
///
/// # Contract
/// - Tick 0 is delivered to `sink` synchronously, before `register` returns.
/// - Later ticks carry strictly increasing indices and arrive at the clock's
///   own cadence.
/// - Releasing the returned subscription stops all further ticks without a
///   final tick.
/// - Every call is an independent feed, even for an instant registered before.
pub trait Clock: Send + Sync {
    /// Start a tick feed for `instant`.
    fn register(&self, instant: ResolvedInstant, sink: TickSink) -> Subscription;
}

/// Port for turning an instant into a label.
///
/// Implementations must be pure with respect to their inputs, the current time
/// and the current locale table: no side effects, no I/O.
pub trait Formatter: Send + Sync {
    /// Produce the label for `instant`, with or without the ago/from-now words.
    fn format(&self, instant: ResolvedInstant, suffix: bool) -> String;
}

/// Port for the shared locale table's change feed.
pub trait LocaleStore: Send + Sync {
    /// Be notified every time the table is replaced or updated.
    fn subscribe(&self, sink: ChangeSink) -> Subscription;
}

/// Port for the text-bearing node a binding writes into.
pub trait RenderTarget: Send {
    /// Replace the node's text.
    fn set_text(&mut self, text: &str);
}

impl RenderTarget for String {
    fn set_text(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}
