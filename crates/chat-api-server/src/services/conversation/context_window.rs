use crate::models::{ChatTurn, Message};

/// Messages kept when no window size is configured.
pub const DEFAULT_CONTEXT_WINDOW: usize = 10;

/// Fixed-size sliding window over conversation history.
///
/// Keeps only the most recent `max_messages`, oldest first. No token
/// accounting and no summary of dropped messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    max_messages: usize,
}

impl ContextWindow {
    pub fn new(max_messages: usize) -> Self {
        Self { max_messages }
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// `history` must already be ordered oldest first.
    pub fn build(&self, history: &[Message]) -> Vec<ChatTurn> {
        let start = history.len().saturating_sub(self.max_messages);
        history[start..].iter().map(ChatTurn::from).collect()
    }
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_WINDOW)
    }
}
