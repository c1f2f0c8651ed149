//! Conversational history threaded through backend requests.

use serde::{Deserialize, Serialize};

/// An ordered, append-only sequence of turn strings.
///
/// Each completed online dispatch appends a canonical pair
/// (`"User: …"`, `"Assistant: …"`). The stored sequence is unbounded for
/// the session's lifetime; [`ConversationHistory::forward_window`] caps
/// what is forwarded to the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationHistory {
    turns: Vec<String>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the canonical turn pair for a completed exchange.
    pub fn push_exchange(&mut self, user: &str, assistant: &str) {
        self.turns.push(format!("User: {user}"));
        self.turns.push(format!("Assistant: {assistant}"));
    }

    /// The most recent `limit` turn strings, oldest first, for forwarding
    /// with the next request.
    pub fn forward_window(&self, limit: usize) -> Vec<String> {
        let start = self.turns.len().saturating_sub(limit);
        self.turns[start..].to_vec()
    }

    /// All turn strings, oldest first.
    pub fn turns(&self) -> &[String] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drops all turns. Used only by explicit session reset.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
