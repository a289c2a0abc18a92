//! Render target adapters.

use crate::application::ports::RenderTarget;
use std::sync::{Arc, Mutex, PoisonError};

/// A shared text node.
///
/// The binding owns one clone as its render target; the host keeps another to
/// read what is currently displayed.
///
/// ```
/// use live_timeago::{RenderTarget, TextNode};
///
/// let node = TextNode::new();
/// let mut handle = node.clone();
/// handle.set_text("5 minutes ago");
/// assert_eq!(node.text(), "5 minutes ago");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextNode {
    text: Arc<Mutex<String>>,
}

impl TextNode {
    /// An empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// A node with initial placeholder text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Arc::new(Mutex::new(text.into())),
        }
    }

    /// Current text.
    pub fn text(&self) -> String {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RenderTarget for TextNode {
    fn set_text(&mut self, text: &str) {
        let mut current = self.text.lock().unwrap_or_else(PoisonError::into_inner);
        current.clear();
        current.push_str(text);
    }
}
