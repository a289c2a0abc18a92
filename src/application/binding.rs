//! The binding: one live relative-time label.
//!
//! A binding merges three kinds of triggers into a single render signal:
//! clock ticks (filtered by the live gate), locale table changes, and forced
//! renders caused by input changes. Every notification that reaches the
//! signal reads the current instant and suffix flag, formats them, and writes
//! the result into the render target.
//!
//! # Lifecycle
//!
//! - Construction subscribes to the locale store (if any) and attaches the
//!   render observer to the signal.
//! - Each valid date assignment releases the previous clock feed before
//!   registering a new one. At most one feed is alive at any time.
//! - Teardown releases both feeds and completes the signal. It is idempotent
//!   and also runs on drop.

use crate::application::metrics::BindingMetrics;
use crate::application::ports::{Clock, Formatter, LocaleStore, RenderTarget, Tick, TickSink};
use crate::application::signal::Signal;
use crate::application::subscription::Subscription;
use crate::domain::date::{DateInput, DateParseError, ResolvedInstant};
use crate::domain::flag::FlagInput;
use crate::domain::gate::{GateDecision, LiveGate};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace, warn};

/// Why the render signal fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A clock tick that passed the live gate
    Tick {
        /// Index of the tick within its feed
        index: u64,
        /// Date assignment the feed belongs to
        generation: u64,
    },
    /// The shared locale table changed
    LocaleChanged,
    /// The live flag went from false to true
    LiveResumed,
    /// The suffix flag changed
    SuffixChanged,
}

/// Outcome of assigning a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateAssignment {
    /// The date resolved and a fresh clock feed was registered
    Registered(ResolvedInstant),
    /// The date did not resolve; the previous instant and feed are kept
    Rejected(DateParseError),
    /// The binding was already torn down
    Ignored,
}

impl DateAssignment {
    /// Returns true if a new clock feed was registered.
    pub fn is_registered(&self) -> bool {
        matches!(self, DateAssignment::Registered(_))
    }
}

/// One batch of host input changes.
///
/// Reactions are computed once per batch. All flag values are stored first;
/// then the date (if any) is assigned and rendered, then a live false→true
/// transition forces one render, then a suffix change forces one render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputChanges {
    pub date: Option<DateInput>,
    pub live: Option<FlagInput>,
    pub suffix: Option<FlagInput>,
}

impl InputChanges {
    /// An empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: impl Into<DateInput>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_live(mut self, live: impl Into<FlagInput>) -> Self {
        self.live = Some(live.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<FlagInput>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Returns true if the batch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.live.is_none() && self.suffix.is_none()
    }
}

/// Everything a render reads, guarded by one mutex that is held for the whole
/// format-and-write so teardown and feed switches wait for a render in flight.
#[derive(Debug)]
struct RenderState {
    instant: Option<ResolvedInstant>,
    suffix: bool,
    generation: u64,
    closed: bool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builder for configuring a [`Binding`].
pub struct BindingBuilder {
    clock: Arc<dyn Clock>,
    formatter: Arc<dyn Formatter>,
    target: Box<dyn RenderTarget>,
    locale: Option<Arc<dyn LocaleStore>>,
    live: bool,
    suffix: bool,
}

impl BindingBuilder {
    /// Receive locale change notifications from `store` for the binding's lifetime.
    pub fn with_locale_store<L>(mut self, store: L) -> Self
    where
        L: LocaleStore + 'static,
    {
        self.locale = Some(Arc::new(store));
        self
    }

    /// Initial live flag (default: true).
    pub fn with_live(mut self, live: impl Into<FlagInput>) -> Self {
        self.live = live.into().coerce();
        self
    }

    /// Initial suffix flag (default: true).
    pub fn with_suffix(mut self, suffix: impl Into<FlagInput>) -> Self {
        self.suffix = suffix.into().coerce();
        self
    }

    /// Build the binding. No render happens until a date is assigned or a
    /// trigger arrives.
    pub fn build(self) -> Binding {
        Binding::assemble(
            self.locale,
            self.clock,
            self.formatter,
            self.target,
            self.live,
            self.suffix,
        )
    }
}

/// A self-updating relative-time label bound to one render target.
///
/// # Example
/// ```
/// use live_timeago::{Binding, Clock, Formatter, ResolvedInstant, Subscription, TextNode, Tick, TickSink};
///
/// // a clock that only ever delivers the initial tick
/// struct OnceClock;
///
/// impl Clock for OnceClock {
///     fn register(&self, instant: ResolvedInstant, sink: TickSink) -> Subscription {
///         sink(Tick { index: 0, instant });
///         Subscription::empty()
///     }
/// }
///
/// struct Millis;
///
/// impl Formatter for Millis {
///     fn format(&self, instant: ResolvedInstant, suffix: bool) -> String {
///         let tail = if suffix { " ago" } else { "" };
///         format!("{}ms{}", instant.as_millis(), tail)
///     }
/// }
///
/// let node = TextNode::new();
/// let mut binding = Binding::builder(OnceClock, Millis, node.clone()).build();
///
/// binding.set_date(1_500_i64);
/// assert_eq!(node.text(), "1500ms ago");
///
/// binding.set_suffix(false);
/// assert_eq!(node.text(), "1500ms");
///
/// binding.teardown();
/// ```
pub struct Binding {
    clock: Arc<dyn Clock>,
    gate: LiveGate,
    state: Arc<Mutex<RenderState>>,
    signal: Signal<Trigger>,
    clock_subscription: Option<Subscription>,
    locale_subscription: Option<Subscription>,
    render_subscription: Option<Subscription>,
    metrics: BindingMetrics,
    torn_down: bool,
}

impl Binding {
    /// Start configuring a binding with its required collaborators.
    pub fn builder<C, F, T>(clock: C, formatter: F, target: T) -> BindingBuilder
    where
        C: Clock + 'static,
        F: Formatter + 'static,
        T: RenderTarget + 'static,
    {
        BindingBuilder {
            clock: Arc::new(clock),
            formatter: Arc::new(formatter),
            target: Box::new(target),
            locale: None,
            live: true,
            suffix: true,
        }
    }

    /// Create a binding with default flags (live, with suffix).
    ///
    /// If `locale` is present the binding re-renders on every table change
    /// until teardown.
    pub fn new(
        locale: Option<Arc<dyn LocaleStore>>,
        clock: Arc<dyn Clock>,
        formatter: Arc<dyn Formatter>,
        target: Box<dyn RenderTarget>,
    ) -> Self {
        Self::assemble(locale, clock, formatter, target, true, true)
    }

    fn assemble(
        locale: Option<Arc<dyn LocaleStore>>,
        clock: Arc<dyn Clock>,
        formatter: Arc<dyn Formatter>,
        target: Box<dyn RenderTarget>,
        live: bool,
        suffix: bool,
    ) -> Self {
        let signal = Signal::new();
        let metrics = BindingMetrics::new();
        let state = Arc::new(Mutex::new(RenderState {
            instant: None,
            suffix,
            generation: 0,
            closed: false,
        }));

        let locale_subscription = locale.map(|store| {
            let signal = signal.clone();
            let metrics = metrics.clone();
            store.subscribe(Arc::new(move || {
                metrics.record_locale_change();
                signal.next(Trigger::LocaleChanged);
            }))
        });

        let render_subscription = {
            let state = Arc::clone(&state);
            let metrics = metrics.clone();
            let target = Mutex::new(target);
            signal.subscribe(move |trigger: &Trigger| {
                let state = lock(&state);
                if state.closed {
                    return;
                }
                if let Trigger::Tick { generation, .. } = *trigger {
                    if generation != state.generation {
                        trace!(?trigger, "tick from a replaced feed ignored");
                        return;
                    }
                }
                let Some(instant) = state.instant else {
                    metrics.record_render_skipped();
                    trace!(?trigger, "no date assigned, render skipped");
                    return;
                };
                let label = formatter.format(instant, state.suffix);
                lock(&target).set_text(&label);
                metrics.record_render();
                trace!(?trigger, %instant, suffix = state.suffix, %label, "rendered");
            })
        };

        debug!(
            live,
            suffix,
            locale = locale_subscription.is_some(),
            "binding created"
        );

        Self {
            clock,
            gate: LiveGate::new(live),
            state,
            signal,
            clock_subscription: None,
            locale_subscription,
            render_subscription: Some(render_subscription),
            metrics,
            torn_down: false,
        }
    }

    /// Assign the date to display.
    ///
    /// A valid date replaces the clock feed and renders immediately, whatever
    /// the live flag. An invalid date logs a warning and changes nothing.
    pub fn set_date(&mut self, date: impl Into<DateInput>) -> DateAssignment {
        if self.torn_down {
            debug!("binding torn down, ignoring date");
            return DateAssignment::Ignored;
        }
        self.assign_date(date.into())
    }

    /// Set the live flag. Going from false to true forces one render.
    pub fn set_live(&mut self, live: impl Into<FlagInput>) {
        self.apply(InputChanges::new().with_live(live));
    }

    /// Set the suffix flag. Any change forces one render.
    pub fn set_suffix(&mut self, suffix: impl Into<FlagInput>) {
        self.apply(InputChanges::new().with_suffix(suffix));
    }

    /// Apply a batch of input changes.
    ///
    /// Returns the outcome of the date assignment when the batch carries one.
    pub fn apply(&mut self, changes: InputChanges) -> Option<DateAssignment> {
        if self.torn_down {
            debug!(?changes, "binding torn down, ignoring input changes");
            return changes.date.map(|_| DateAssignment::Ignored);
        }

        let resumed = changes.live.is_some_and(|live| {
            let live = live.coerce();
            let was_live = self.gate.set_live(live);
            live && !was_live
        });

        let suffix_changed = changes.suffix.is_some_and(|suffix| {
            let suffix = suffix.coerce();
            let mut state = lock(&self.state);
            let changed = state.suffix != suffix;
            state.suffix = suffix;
            changed
        });

        // flags are stored first so the date's initial render already sees them
        let assignment = changes.date.map(|date| self.assign_date(date));

        if resumed {
            debug!("live updates resumed");
            self.signal.next(Trigger::LiveResumed);
        }
        if suffix_changed {
            debug!(suffix = self.suffix(), "suffix changed");
            self.signal.next(Trigger::SuffixChanged);
        }

        assignment
    }

    fn assign_date(&mut self, input: DateInput) -> DateAssignment {
        let instant = match input.resolve() {
            Ok(instant) => instant,
            Err(error) => {
                self.metrics.record_invalid_date();
                warn!(?input, %error, "invalid date provided, keeping previous instant");
                return DateAssignment::Rejected(error);
            }
        };

        if let Some(mut previous) = self.clock_subscription.take() {
            previous.release();
        }

        // the lock waits out any render in flight; it is released before
        // registering because tick 0 renders synchronously
        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.instant = Some(instant);
            state.generation
        };

        let sink: TickSink = {
            let state = Arc::clone(&self.state);
            let gate = self.gate.clone();
            let signal = self.signal.clone();
            let metrics = self.metrics.clone();
            Arc::new(move |tick: Tick| {
                // ticks from a replaced feed are inert even if delivered late
                {
                    let state = lock(&state);
                    if state.closed || state.generation != generation {
                        return;
                    }
                }
                match gate.admit(tick.index) {
                    GateDecision::Pass => {
                        metrics.record_tick_admitted();
                        signal.next(Trigger::Tick {
                            index: tick.index,
                            generation,
                        });
                    }
                    GateDecision::Drop => {
                        metrics.record_tick_dropped();
                        trace!(index = tick.index, "tick dropped by live gate");
                    }
                }
            })
        };

        debug!(%instant, generation, "registering clock feed");
        self.metrics.record_clock_registration();
        self.clock_subscription = Some(self.clock.register(instant, sink));
        DateAssignment::Registered(instant)
    }

    /// Release every feed and complete the render signal.
    ///
    /// Safe to call repeatedly, and safe when nothing was ever subscribed.
    ///
    /// Returns only after a render already in progress on another thread has
    /// finished. No write reaches the target afterwards.
    pub fn teardown(&mut self) {
        {
            let mut state = lock(&self.state);
            state.closed = true;
            state.generation += 1;
        }
        if let Some(mut subscription) = self.locale_subscription.take() {
            subscription.release();
        }
        if let Some(mut subscription) = self.clock_subscription.take() {
            subscription.release();
        }
        self.signal.complete();
        if let Some(mut subscription) = self.render_subscription.take() {
            subscription.release();
        }

        if !self.torn_down {
            self.torn_down = true;
            debug!(renders = self.metrics.renders(), "binding torn down");
        }
    }

    /// The instant currently displayed, if a valid date was ever assigned.
    pub fn date(&self) -> Option<ResolvedInstant> {
        lock(&self.state).instant
    }

    /// Current live flag.
    pub fn is_live(&self) -> bool {
        self.gate.is_live()
    }

    /// Current suffix flag.
    pub fn suffix(&self) -> bool {
        lock(&self.state).suffix
    }

    /// Whether a clock feed is currently held.
    pub fn has_clock_feed(&self) -> bool {
        self.clock_subscription.is_some()
    }

    /// Whether [`teardown`](Self::teardown) has run.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Activity counters.
    pub fn metrics(&self) -> &BindingMetrics {
        &self.metrics
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("date", &self.date())
            .field("live", &self.is_live())
            .field("suffix", &self.suffix())
            .field("clock_feed", &self.has_clock_feed())
            .field("torn_down", &self.torn_down)
            .finish()
    }
}
