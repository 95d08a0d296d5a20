//! Conversation messages and the bounded history kept per chat panel.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of messages a history keeps.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Who produced a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the user.
    User,
    /// Reply produced by the assistant.
    Assistant,
}

/// A message in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Who sent this message.
    pub sender: Sender,
    /// Message content.
    pub content: String,
    /// Unix timestamp (milliseconds) when message was created.
    #[serde(rename = "timestampMs")]
    pub timestamp_ms: i64,
}

impl ConversationMessage {
    /// Create a new conversation message.
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            sender,
            content: content.into(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, content)
    }

    pub fn is_assistant(&self) -> bool {
        self.sender == Sender::Assistant
    }
}

/// Ordered, bounded log of the conversation.
///
/// Appending past capacity evicts the oldest messages. A history always has
/// room for at least one message, so the newest message is never evicted.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    messages: VecDeque<ConversationMessage>,
    capacity: usize,
}

impl History {
    /// Create an empty history holding at most `capacity` messages.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a history from existing messages, keeping the newest ones.
    pub fn from_messages(
        capacity: usize,
        messages: impl IntoIterator<Item = ConversationMessage>,
    ) -> Self {
        let mut history = Self::with_capacity(capacity);
        for message in messages {
            history.push(message);
        }
        history
    }

    /// Append a message, then drop the oldest entries beyond capacity.
    pub fn push(&mut self, message: ConversationMessage) {
        self.messages.push_back(message);
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }
    }

    /// Most recent message, if any.
    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.back()
    }

    /// Most recent assistant message, if any.
    pub fn last_assistant(&self) -> Option<&ConversationMessage> {
        self.messages.iter().rev().find(|m| m.is_assistant())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}
