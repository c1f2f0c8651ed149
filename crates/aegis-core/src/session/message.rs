//! Conversation message types.
//!
//! This module contains types for representing messages in a console
//! conversation, including roles and rendering hints for the external
//! renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// Message from the operator.
    User,
    /// Message from the assistant (live backend or demo responder).
    Assistant,
}

/// How the external renderer should treat a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderKind {
    /// Plain narrative content (markdown handled by the renderer).
    Plain,
    /// The body contains a query-language code block.
    QueryBlock,
}

/// A single message in the console transcript.
///
/// Messages are immutable once appended and cleared only by an explicit
/// session reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub render_kind: RenderKind,
    /// True when this message surfaces a failed dispatch.
    pub is_error: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Creates an operator message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content, RenderKind::Plain, false)
    }

    /// Creates an assistant message with plain content.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content, RenderKind::Plain, false)
    }

    /// Creates an assistant message carrying a query code block.
    pub fn query_block(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content, RenderKind::QueryBlock, false)
    }

    /// Creates an error-flagged assistant message.
    pub fn error(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content, RenderKind::Plain, true)
    }

    fn new(
        role: MessageRole,
        content: impl Into<String>,
        render_kind: RenderKind,
        is_error: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            render_kind,
            is_error,
            created_at: Utc::now(),
        }
    }
}
