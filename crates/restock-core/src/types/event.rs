//! Inbound chat events and replies.

use serde::{Deserialize, Serialize};

/// What kind of event the platform delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A text message. Only these can carry commands.
    Message,
    /// Anything else (joins, follows, stickers, malformed payloads).
    Other,
}

/// Where an event came from. Each variant carries exactly the one
/// identifier the platform provides for that source kind, so code that
/// answers "which chat is this" selects by variant instead of guessing
/// among optional fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum EventSource {
    Group { group_id: String },
    Room { room_id: String },
    User { user_id: String },
}

impl EventSource {
    /// The identifier of the chat this event originated in.
    pub fn chat_id(&self) -> &str {
        match self {
            EventSource::Group { group_id } => group_id,
            EventSource::Room { room_id } => room_id,
            EventSource::User { user_id } => user_id,
        }
    }
}

/// An inbound event, constructed from a webhook payload and consumed by
/// the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    pub kind: EventKind,
    pub source: EventSource,
    /// One-shot token for replying to this specific event.
    pub reply_token: String,
    /// Message text; `None` for non-text events.
    pub text: Option<String>,
}

impl InboundEvent {
    pub fn message(source: EventSource, reply_token: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Message,
            source,
            reply_token: reply_token.into(),
            text: Some(text.into()),
        }
    }

    /// A non-message event; the dispatcher ignores these.
    pub fn other(source: EventSource) -> Self {
        Self {
            kind: EventKind::Other,
            source,
            reply_token: String::new(),
            text: None,
        }
    }
}

/// An outbound reply, addressed by reply token rather than target id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub reply_token: String,
    pub text: String,
}
