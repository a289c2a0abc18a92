//! # live-timeago
//!
//! Self-updating "time ago" labels.
//!
//! A [`Binding`] owns one label and keeps it current. It re-renders when:
//! - its clock ticks (the clock decides how often, slowing down as the date recedes),
//! - the shared locale table changes,
//! - the host changes the date, the live flag, or the suffix flag.
//!
//! The binding never computes strings or tick cadence itself. It decides
//! *whether and when* to ask its [`Formatter`] for a new label, and makes sure
//! no feed outlives it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use live_timeago::{AdaptiveClock, Binding, IntlFormatter, SharedLocaleStore, TextNode};
//! use std::time::{Duration, SystemTime};
//!
//! #[tokio::main]
//! async fn main() {
//!     let locale = SharedLocaleStore::default();
//!     let node = TextNode::new();
//!
//!     let mut binding = Binding::builder(
//!         AdaptiveClock::new(),
//!         IntlFormatter::new(locale.clone()),
//!         node.clone(),
//!     )
//!     .with_locale_store(locale.clone())
//!     .build();
//!
//!     binding.set_date(SystemTime::now() - Duration::from_secs(120));
//!     assert_eq!(node.text(), "2 minutes ago");
//!
//!     // switching language re-renders every binding on the store
//!     locale.load_json(r#"{"suffixAgo": "geleden", "minutes": "%d minuten"}"#).unwrap();
//!     assert_eq!(node.text(), "2 minuten geleden");
//!
//!     binding.teardown();
//! }
//! ```
//!
//! ## Inputs
//!
//! | Input    | Accepts                                         | Effect on change                          |
//! |----------|-------------------------------------------------|-------------------------------------------|
//! | `date`   | text, epoch milliseconds, `DateTime`, `SystemTime` | new clock feed, immediate render        |
//! | `live`   | `bool`, attribute text, `Option`                | false→true forces one render              |
//! | `suffix` | `bool`, attribute text, `Option`                | any change forces one render              |
//!
//! Changes can be applied one at a time (`set_date`, `set_live`,
//! `set_suffix`) or as one batch with [`InputChanges`].
//!
//! ## The Live Gate
//!
//! Every clock feed starts with tick 0, delivered synchronously while the feed
//! is registered. Tick 0 always renders. Later ticks render only while the
//! binding is live. Ticks dropped while not live are never replayed; resuming
//! renders once and then follows the clock again.
//!
//! ## Invalid Dates
//!
//! An unparsable date never fails the caller. The binding logs a `WARN`
//! event through `tracing`, keeps its previous instant and clock feed, and
//! reports [`DateAssignment::Rejected`].
//!
//! ## Teardown
//!
//! [`Binding::teardown`] (also run on drop) releases the locale subscription
//! and the clock feed and completes the render signal. Ticks or locale changes
//! that arrive afterwards write nothing.
//!
//! ## Observability
//!
//! ```rust,no_run
//! # use live_timeago::{Binding, DefaultFormatter, TextNode, AdaptiveClock};
//! # let binding = Binding::builder(AdaptiveClock::new(), DefaultFormatter::new(), TextNode::new()).build();
//! let snapshot = binding.metrics().snapshot();
//! println!("renders: {}", snapshot.renders);
//! println!("ticks dropped by the gate: {:.0}%", snapshot.drop_rate() * 100.0);
//! ```

// Domain layer - pure types and rules
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    date::{DateInput, DateParseError, ResolvedInstant},
    flag::FlagInput,
    gate::{GateDecision, LiveGate},
    relative::{Direction, Elapsed, RelativeTime, TimeUnit},
    strings::{LocaleStrings, StringTableError},
};

pub use application::{
    binding::{Binding, BindingBuilder, DateAssignment, InputChanges, Trigger},
    metrics::{BindingMetrics, MetricsSnapshot},
    ports::{ChangeSink, Clock, Formatter, LocaleStore, RenderTarget, Tick, TickSink, TimeSource},
    signal::Signal,
    subscription::Subscription,
};

pub use infrastructure::{
    clock::{CadenceConfig, CadenceConfigError, CadenceStep, SystemTimeSource},
    formatter::{DefaultFormatter, IntlFormatter},
    locale::SharedLocaleStore,
    target::TextNode,
};

#[cfg(feature = "async")]
pub use infrastructure::clock::AdaptiveClock;
