//! Clock and time source adapters.
//!
//! Provides `SystemTimeSource` for wall-clock time and, with the `async`
//! feature, `AdaptiveClock`: a tokio-driven tick feed whose cadence slows down
//! as the registered instant recedes.
//!
//! # Testing
//!
//! See `MockTimeSource` and `ManualClock` (in `crate::infrastructure::mocks`)
//! for controllable doubles. Available with the `test-helpers` feature or in
//! test builds.

use crate::application::ports::TimeSource;
use crate::domain::date::ResolvedInstant;
use chrono::Utc;
use std::time::Duration;

#[cfg(feature = "async")]
use crate::application::ports::{Clock, Tick, TickSink};
#[cfg(feature = "async")]
use crate::application::subscription::Subscription;
#[cfg(feature = "async")]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(feature = "async")]
use std::sync::Arc;

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    /// Create a new system time source.
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> ResolvedInstant {
        ResolvedInstant::from_millis(Utc::now().timestamp_millis())
    }
}

/// Error returned when a cadence table is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CadenceConfigError {
    /// At least one step is required
    #[error("cadence needs at least one step")]
    Empty,
    /// A step's tick period was zero
    #[error("cadence step {0} has a zero period")]
    ZeroPeriod(usize),
    /// Step thresholds must strictly increase
    #[error("cadence step {0} does not extend past the previous step")]
    Unordered(usize),
}

/// One row of a cadence table: while less than `below` has elapsed since the
/// instant, tick every `every`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadenceStep {
    pub below: Duration,
    pub every: Duration,
}

impl CadenceStep {
    pub const fn new(below: Duration, every: Duration) -> Self {
        Self { below, every }
    }
}

/// How often a feed re-ticks depending on the instant's age.
///
/// Past the last step's threshold the feed goes quiet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CadenceConfig {
    steps: Vec<CadenceStep>,
}

impl CadenceConfig {
    /// Create a cadence table.
    ///
    /// # Errors
    /// Returns `CadenceConfigError` if `steps` is empty, a period is zero,
    /// or thresholds are not strictly increasing.
    pub fn new(steps: Vec<CadenceStep>) -> Result<Self, CadenceConfigError> {
        if steps.is_empty() {
            return Err(CadenceConfigError::Empty);
        }
        for (i, step) in steps.iter().enumerate() {
            if step.every.is_zero() {
                return Err(CadenceConfigError::ZeroPeriod(i));
            }
            if i > 0 && step.below <= steps[i - 1].below {
                return Err(CadenceConfigError::Unordered(i));
            }
        }
        Ok(Self { steps })
    }

    /// Tick period for an instant that is `elapsed` away from now.
    pub fn period_for(&self, elapsed: Duration) -> Option<Duration> {
        self.steps
            .iter()
            .find(|step| elapsed < step.below)
            .map(|step| step.every)
    }
}

impl Default for CadenceConfig {
    /// Every second for the first minute, every minute for the first hour,
    /// every hour for the first day.
    fn default() -> Self {
        Self {
            steps: vec![
                CadenceStep::new(Duration::from_secs(60), Duration::from_secs(1)),
                CadenceStep::new(Duration::from_secs(3_600), Duration::from_secs(60)),
                CadenceStep::new(Duration::from_secs(86_400), Duration::from_secs(3_600)),
            ],
        }
    }
}

/// Tokio-driven adaptive tick feed.
///
/// Tick 0 is delivered inside `register`. Later ticks come from a task spawned
/// on the current tokio runtime, spaced by [`CadenceConfig::period_for`] the
/// instant's age at the time of scheduling. Outside a runtime only tick 0 is
/// delivered.
#[cfg(feature = "async")]
#[derive(Debug, Clone)]
pub struct AdaptiveClock {
    time: Arc<dyn TimeSource>,
    cadence: Arc<CadenceConfig>,
}

#[cfg(feature = "async")]
impl AdaptiveClock {
    /// Default cadence against the system clock.
    pub fn new() -> Self {
        Self {
            time: Arc::new(SystemTimeSource::new()),
            cadence: Arc::new(CadenceConfig::default()),
        }
    }

    /// Replace the cadence table.
    pub fn with_cadence(mut self, cadence: CadenceConfig) -> Self {
        self.cadence = Arc::new(cadence);
        self
    }

    /// Replace the time source used to measure the instant's age.
    pub fn with_time_source<T>(mut self, time: T) -> Self
    where
        T: TimeSource + 'static,
    {
        self.time = Arc::new(time);
        self
    }

    /// The cadence table in use.
    pub fn cadence(&self) -> &CadenceConfig {
        &self.cadence
    }
}

#[cfg(feature = "async")]
impl Default for AdaptiveClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "async")]
impl Clock for AdaptiveClock {
    fn register(&self, instant: ResolvedInstant, sink: TickSink) -> Subscription {
        sink(Tick { index: 0, instant });

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!(
                    %instant,
                    "no tokio runtime available, adaptive clock delivers only the initial tick"
                );
                return Subscription::empty();
            }
        };

        let released = Arc::new(AtomicBool::new(false));
        let task = runtime.spawn(run_feed(
            instant,
            sink,
            Arc::clone(&self.time),
            Arc::clone(&self.cadence),
            Arc::clone(&released),
        ));

        Subscription::new(move || {
            released.store(true, Ordering::Release);
            task.abort();
        })
    }
}

#[cfg(feature = "async")]
async fn run_feed(
    instant: ResolvedInstant,
    sink: TickSink,
    time: Arc<dyn TimeSource>,
    cadence: Arc<CadenceConfig>,
    released: Arc<AtomicBool>,
) {
    let mut index = 1;
    loop {
        let elapsed = Duration::from_millis(instant.distance_to(time.now()));
        let Some(period) = cadence.period_for(elapsed) else {
            tracing::debug!(%instant, ticks = index, "cadence exhausted, feed idle");
            return;
        };

        tokio::time::sleep(period).await;
        if released.load(Ordering::Acquire) {
            return;
        }
        sink(Tick { index, instant });
        index += 1;
    }
}
