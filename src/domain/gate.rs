//! The live gate applied to clock ticks.
//!
//! A tick passes if it is the initial tick of a registration (index 0) or if
//! the binding is currently live. Nothing is buffered: ticks dropped while the
//! gate is closed are gone, and reopening the gate only affects later ticks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Outcome of running a tick through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Forward the tick to the render signal
    Pass,
    /// Drop the tick
    Drop,
}

impl GateDecision {
    /// Returns true if the tick should be forwarded.
    pub fn is_pass(&self) -> bool {
        matches!(self, GateDecision::Pass)
    }

    /// Returns true if the tick should be dropped.
    pub fn is_drop(&self) -> bool {
        matches!(self, GateDecision::Drop)
    }
}

/// Pass/drop predicate over `(tick index, live flag)`.
///
/// Clones share the same live flag, so the copy handed to a clock sink sees
/// every later `set_live` made through the binding.
///
/// # Example
/// ```
/// use live_timeago::LiveGate;
///
/// let gate = LiveGate::new(false);
/// assert!(gate.admit(0).is_pass());
/// assert!(gate.admit(1).is_drop());
///
/// gate.set_live(true);
/// assert!(gate.admit(2).is_pass());
/// ```
#[derive(Debug, Clone)]
pub struct LiveGate {
    live: Arc<AtomicBool>,
}

impl LiveGate {
    /// Create a gate with the given initial live flag.
    pub fn new(live: bool) -> Self {
        Self {
            live: Arc::new(AtomicBool::new(live)),
        }
    }

    /// Decide whether the tick with this zero-based index may pass.
    pub fn admit(&self, index: u64) -> GateDecision {
        if index == 0 || self.is_live() {
            GateDecision::Pass
        } else {
            GateDecision::Drop
        }
    }

    /// Current live flag.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Set the live flag, returning the previous value.
    pub fn set_live(&self, live: bool) -> bool {
        self.live.swap(live, Ordering::AcqRel)
    }
}

impl Default for LiveGate {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_tick_always_passes() {
        assert!(LiveGate::new(true).admit(0).is_pass());
        assert!(LiveGate::new(false).admit(0).is_pass());
    }

    #[test]
    fn test_later_ticks_follow_live_flag() {
        let gate = LiveGate::new(true);
        assert!(gate.admit(1).is_pass());
        assert!(gate.admit(57).is_pass());

        assert!(gate.set_live(false));
        assert!(gate.admit(58).is_drop());
        assert!(gate.admit(59).is_drop());

        assert!(!gate.set_live(true));
        assert!(gate.admit(60).is_pass());
    }

    #[test]
    fn test_clones_share_flag() {
        let gate = LiveGate::default();
        let sink_copy = gate.clone();

        gate.set_live(false);
        assert!(!sink_copy.is_live());
        assert!(sink_copy.admit(3).is_drop());
    }
}
