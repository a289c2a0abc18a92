//! Formatter double that records its inputs.

use crate::application::ports::Formatter;
use crate::domain::date::ResolvedInstant;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Calls {
    inputs: Vec<(ResolvedInstant, bool)>,
    outputs: Vec<String>,
}

/// Formatter that logs every call and returns a label unique to that call.
///
/// Labels look like `"#<call>:<millis>:<suffix>"`, so two renders of the same
/// instant still produce different strings, as they would once time has
/// passed. All clones share the same call log.
///
/// ```
/// use live_timeago::infrastructure::mocks::StubFormatter;
/// use live_timeago::{Formatter, ResolvedInstant};
///
/// let formatter = StubFormatter::new();
/// let instant = ResolvedInstant::from_millis(7);
/// assert_eq!(formatter.format(instant, true), "#1:7:true");
/// assert_eq!(formatter.format(instant, false), "#2:7:false");
/// assert_eq!(formatter.calls(), vec![(instant, true), (instant, false)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StubFormatter {
    calls: Arc<Mutex<Calls>>,
}

impl StubFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Calls> {
        self.calls
            .lock()
            .expect("StubFormatter mutex poisoned - a test thread panicked while holding the lock")
    }

    /// Inputs of every call, oldest first.
    pub fn calls(&self) -> Vec<(ResolvedInstant, bool)> {
        self.lock().inputs.clone()
    }

    /// Labels returned so far, oldest first.
    pub fn outputs(&self) -> Vec<String> {
        self.lock().outputs.clone()
    }
}

impl Formatter for StubFormatter {
    fn format(&self, instant: ResolvedInstant, suffix: bool) -> String {
        let mut calls = self.lock();
        calls.inputs.push((instant, suffix));
        let label = format!("#{}:{}:{}", calls.inputs.len(), instant.as_millis(), suffix);
        calls.outputs.push(label.clone());
        label
    }
}
