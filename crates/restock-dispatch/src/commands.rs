//! The chat command table.
//!
//! Matching is exact, case-sensitive, on the trimmed text only — no
//! prefixes, no arguments. Unrecognized text is not an error, it just
//! isn't a command.

use restock_core::types::{EventSource, InboundEvent};

/// Help text listing every recognized command.
pub const HELP_TEXT: &str =
    "Available commands:\n!id - Get this chat's ID\n!help - Show this help message";

/// The closed set of recognized commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `!id` — tell the chat its own identifier.
    Id,
    /// `!help` — list the commands.
    Help,
}

impl Command {
    /// Resolve trimmed text to a command, or `None` for regular chatter.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "!id" => Some(Command::Id),
            "!help" => Some(Command::Help),
            _ => None,
        }
    }

    /// Response text for this command, given the event it came from.
    pub fn response(&self, event: &InboundEvent) -> String {
        match self {
            Command::Id => match &event.source {
                EventSource::Group { group_id } => format!("Group ID: {group_id}"),
                EventSource::Room { room_id } => format!("Room ID: {room_id}"),
                EventSource::User { user_id } => format!("User ID: {user_id}"),
            },
            Command::Help => HELP_TEXT.to_string(),
        }
    }
}
