//! Render target that remembers every write.

use crate::application::ports::RenderTarget;
use std::sync::{Arc, Mutex};

/// Records each label written by a binding.
///
/// All clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct RecordingTarget {
    writes: Arc<Mutex<Vec<String>>>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.writes.lock().expect(
            "RecordingTarget mutex poisoned - a test thread panicked while holding the lock",
        )
    }

    /// Every write, oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// The most recent write.
    pub fn last(&self) -> Option<String> {
        self.lock().last().cloned()
    }

    /// Number of writes.
    pub fn count(&self) -> usize {
        self.lock().len()
    }
}

impl RenderTarget for RecordingTarget {
    fn set_text(&mut self, text: &str) {
        self.lock().push(text.to_string());
    }
}
