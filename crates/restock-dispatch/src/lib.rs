//! Inbound event dispatcher.
//!
//! Each event walks a small state machine: classify (is it a text
//! message?), resolve (does the text match a command?), reply (send via
//! the one-shot reply token). Events in a batch are fully independent —
//! a classification miss or a failed reply for one never touches its
//! siblings, and the batch itself always completes with one outcome per
//! event.

pub mod commands;

use std::sync::Arc;

use futures::future::join_all;
use restock_core::Messenger;
use restock_core::types::{EventKind, InboundEvent};
use serde::Serialize;

pub use commands::{Command, HELP_TEXT};

/// Terminal state of one dispatched event.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "state", content = "detail")]
pub enum EventOutcome {
    /// A command matched and the reply was delivered.
    Replied,
    /// Nothing to do: not a message, empty text, or not a command.
    Ignored(IgnoreReason),
    /// A command matched but the reply send failed.
    ReplyFailed(String),
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    NotAMessage,
    NotACommand,
}

/// Classifies inbound events and answers recognized commands. Stateless
/// across events; the command table is fixed at compile time.
#[derive(Clone)]
pub struct Dispatcher {
    messenger: Arc<dyn Messenger>,
}

impl Dispatcher {
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self { messenger }
    }

    /// Process one event to its terminal state.
    pub async fn dispatch(&self, event: &InboundEvent) -> EventOutcome {
        let text = match (&event.kind, event.text.as_deref()) {
            (EventKind::Message, Some(text)) if !text.trim().is_empty() => text,
            _ => return EventOutcome::Ignored(IgnoreReason::NotAMessage),
        };

        let Some(command) = Command::parse(text) else {
            tracing::debug!(chat = %event.source.chat_id(), "message received, but not a command");
            return EventOutcome::Ignored(IgnoreReason::NotACommand);
        };

        let response = command.response(event);
        match self.messenger.reply(&event.reply_token, &response).await {
            Ok(()) => {
                tracing::info!(chat = %event.source.chat_id(), ?command, "command reply sent");
                EventOutcome::Replied
            }
            Err(e) => {
                tracing::warn!(chat = %event.source.chat_id(), ?command, "command reply failed: {e}");
                EventOutcome::ReplyFailed(e.to_string())
            }
        }
    }

    /// Process a batch of events, one outcome per event, in input order.
    /// The batch never fails as a whole; errors are already captured in
    /// the per-event outcomes.
    pub async fn dispatch_batch(&self, events: &[InboundEvent]) -> Vec<EventOutcome> {
        join_all(events.iter().map(|event| self.dispatch(event))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use restock_core::types::EventSource;
    use restock_core::{Result, RestockError};
    use std::sync::Mutex;

    /// Messenger that records replies and fails for listed tokens.
    struct ScriptedMessenger {
        fail_tokens: Vec<String>,
        replies: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedMessenger {
        fn new(fail_tokens: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                fail_tokens: fail_tokens.iter().map(|s| s.to_string()).collect(),
                replies: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Messenger for ScriptedMessenger {
        async fn push(&self, _to: &str, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn reply(&self, reply_token: &str, text: &str) -> Result<()> {
            if self.fail_tokens.iter().any(|t| t == reply_token) {
                return Err(RestockError::delivery("reply token expired"));
            }
            self.replies.lock().unwrap().push((reply_token.into(), text.into()));
            Ok(())
        }
    }

    fn group_message(text: &str, token: &str) -> InboundEvent {
        InboundEvent::message(EventSource::Group { group_id: "G1".into() }, token, text)
    }

    #[tokio::test]
    async fn id_command_replies_with_the_group_id() {
        let messenger = ScriptedMessenger::new(&[]);
        let dispatcher = Dispatcher::new(messenger.clone());

        let outcome = dispatcher.dispatch(&group_message("!id", "tok-1")).await;
        assert_eq!(outcome, EventOutcome::Replied);

        let replies = messenger.replies.lock().unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].0, "tok-1");
        assert_eq!(replies[0].1, "Group ID: G1");
    }

    #[tokio::test]
    async fn id_command_replies_with_the_user_id_for_direct_chats() {
        let messenger = ScriptedMessenger::new(&[]);
        let dispatcher = Dispatcher::new(messenger.clone());

        let event =
            InboundEvent::message(EventSource::User { user_id: "U7".into() }, "tok-2", "!id");
        dispatcher.dispatch(&event).await;

        let replies = messenger.replies.lock().unwrap();
        assert_eq!(replies[0].1, "User ID: U7");
    }

    #[tokio::test]
    async fn help_command_replies_with_the_fixed_text() {
        let messenger = ScriptedMessenger::new(&[]);
        let dispatcher = Dispatcher::new(messenger.clone());

        dispatcher.dispatch(&group_message("!help", "tok-3")).await;

        let replies = messenger.replies.lock().unwrap();
        assert_eq!(replies[0].1, HELP_TEXT);
    }

    #[tokio::test]
    async fn plain_text_is_ignored_without_a_reply() {
        let messenger = ScriptedMessenger::new(&[]);
        let dispatcher = Dispatcher::new(messenger.clone());

        let outcome = dispatcher.dispatch(&group_message("hello", "tok-4")).await;
        assert_eq!(outcome, EventOutcome::Ignored(IgnoreReason::NotACommand));
        assert!(messenger.replies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_message_events_are_ignored() {
        let dispatcher = Dispatcher::new(ScriptedMessenger::new(&[]));

        let event = InboundEvent::other(EventSource::User { user_id: "U1".into() });
        let outcome = dispatcher.dispatch(&event).await;
        assert_eq!(outcome, EventOutcome::Ignored(IgnoreReason::NotAMessage));
    }

    #[tokio::test]
    async fn reply_failure_is_captured_not_raised() {
        let dispatcher = Dispatcher::new(ScriptedMessenger::new(&["bad-token"]));

        let outcome = dispatcher.dispatch(&group_message("!id", "bad-token")).await;
        match outcome {
            EventOutcome::ReplyFailed(reason) => assert!(reason.contains("reply token expired")),
            other => panic!("expected ReplyFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn batch_isolates_a_failing_event() {
        let dispatcher = Dispatcher::new(ScriptedMessenger::new(&["tok-b"]));

        let events = vec![
            group_message("!id", "tok-a"),
            group_message("!id", "tok-b"),
            group_message("!help", "tok-c"),
        ];
        let outcomes = dispatcher.dispatch_batch(&events).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0], EventOutcome::Replied);
        assert!(matches!(outcomes[1], EventOutcome::ReplyFailed(_)));
        assert_eq!(outcomes[2], EventOutcome::Replied);
    }
}
