//! Observability counters for a binding.
//!
//! Provides counts of renders, gate decisions and input problems for
//! monitoring and debugging.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters tracking one binding's activity.
///
/// All counters use atomic operations and can be read at any time, including
/// after teardown. Clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct BindingMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    /// Labels written to the render target
    renders: AtomicU64,
    /// Triggers that arrived before any valid date was assigned
    renders_skipped: AtomicU64,
    /// Clock ticks forwarded by the live gate
    ticks_admitted: AtomicU64,
    /// Clock ticks dropped by the live gate
    ticks_dropped: AtomicU64,
    /// Locale change notifications received
    locale_changes: AtomicU64,
    /// Date inputs that failed to resolve
    invalid_dates: AtomicU64,
    /// Clock feeds registered
    clock_registrations: AtomicU64,
}

impl BindingMetrics {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_render(&self) {
        self.inner.renders.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_render_skipped(&self) {
        self.inner.renders_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_tick_admitted(&self) {
        self.inner.ticks_admitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_tick_dropped(&self) {
        self.inner.ticks_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_locale_change(&self) {
        self.inner.locale_changes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_invalid_date(&self) {
        self.inner.invalid_dates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_clock_registration(&self) {
        self.inner
            .clock_registrations
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Total labels written.
    pub fn renders(&self) -> u64 {
        self.inner.renders.load(Ordering::Relaxed)
    }

    /// Total clock ticks dropped by the live gate.
    pub fn ticks_dropped(&self) -> u64 {
        self.inner.ticks_dropped.load(Ordering::Relaxed)
    }

    /// Total invalid date inputs.
    pub fn invalid_dates(&self) -> u64 {
        self.inner.invalid_dates.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = &self.inner;
        MetricsSnapshot {
            renders: inner.renders.load(Ordering::Relaxed),
            renders_skipped: inner.renders_skipped.load(Ordering::Relaxed),
            ticks_admitted: inner.ticks_admitted.load(Ordering::Relaxed),
            ticks_dropped: inner.ticks_dropped.load(Ordering::Relaxed),
            locale_changes: inner.locale_changes.load(Ordering::Relaxed),
            invalid_dates: inner.invalid_dates.load(Ordering::Relaxed),
            clock_registrations: inner.clock_registrations.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`BindingMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub renders: u64,
    pub renders_skipped: u64,
    pub ticks_admitted: u64,
    pub ticks_dropped: u64,
    pub locale_changes: u64,
    pub invalid_dates: u64,
    pub clock_registrations: u64,
}

impl MetricsSnapshot {
    /// Fraction of clock ticks the gate dropped (0.0 to 1.0).
    ///
    /// Returns 0.0 if no ticks have been seen.
    pub fn drop_rate(&self) -> f64 {
        let total = self.ticks_admitted.saturating_add(self.ticks_dropped);
        if total == 0 {
            0.0
        } else {
            self.ticks_dropped as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let metrics = BindingMetrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
        assert_eq!(metrics.snapshot().drop_rate(), 0.0);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = BindingMetrics::new();
        let clone = metrics.clone();

        clone.record_render();
        clone.record_render();
        clone.record_invalid_date();

        assert_eq!(metrics.renders(), 2);
        assert_eq!(metrics.invalid_dates(), 1);
    }

    #[test]
    fn test_drop_rate() {
        let metrics = BindingMetrics::new();
        metrics.record_tick_admitted();
        metrics.record_tick_dropped();
        metrics.record_tick_dropped();
        metrics.record_tick_dropped();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.ticks_dropped, 3);
        assert!((snapshot.drop_rate() - 0.75).abs() < f64::EPSILON);
    }
}
