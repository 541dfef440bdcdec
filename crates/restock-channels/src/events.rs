//! Webhook payload → inbound events.
//!
//! The platform posts `{ "events": [...] }`. Each element is converted
//! independently; an element missing fields degrades to a non-message
//! event (which the dispatcher ignores) instead of poisoning the batch.

use restock_core::types::{EventSource, InboundEvent};
use restock_core::{Result, RestockError};

/// Parse a webhook body into inbound events.
pub fn parse_events(payload: &str) -> Result<Vec<InboundEvent>> {
    let json: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| RestockError::Channel(format!("invalid webhook JSON: {e}")))?;

    let events = json["events"]
        .as_array()
        .ok_or_else(|| RestockError::Channel("webhook body has no events array".into()))?;

    Ok(events.iter().map(event_from_value).collect())
}

fn event_from_value(value: &serde_json::Value) -> InboundEvent {
    let source = source_from_value(&value["source"]);

    let is_text_message = value["type"].as_str() == Some("message")
        && value["message"]["type"].as_str() == Some("text");
    if !is_text_message {
        return InboundEvent::other(source);
    }

    match (value["message"]["text"].as_str(), value["replyToken"].as_str()) {
        (Some(text), Some(token)) => InboundEvent::message(source, token, text),
        _ => InboundEvent::other(source),
    }
}

fn source_from_value(source: &serde_json::Value) -> EventSource {
    let id_or_empty = |key: &str| source[key].as_str().unwrap_or("").to_string();
    match source["type"].as_str() {
        Some("group") => EventSource::Group { group_id: id_or_empty("groupId") },
        Some("room") => EventSource::Room { room_id: id_or_empty("roomId") },
        _ => EventSource::User { user_id: id_or_empty("userId") },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restock_core::types::EventKind;

    #[test]
    fn test_parse_group_text_message() {
        let payload = r#"{
            "events": [{
                "type": "message",
                "replyToken": "tok-1",
                "source": { "type": "group", "groupId": "G1", "userId": "U1" },
                "message": { "type": "text", "text": "!id" }
            }]
        }"#;

        let events = parse_events(payload).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Message);
        assert_eq!(events[0].reply_token, "tok-1");
        assert_eq!(events[0].text.as_deref(), Some("!id"));
        assert_eq!(events[0].source, EventSource::Group { group_id: "G1".into() });
    }

    #[test]
    fn test_non_text_events_become_other() {
        let payload = r#"{
            "events": [
                { "type": "follow", "source": { "type": "user", "userId": "U1" } },
                {
                    "type": "message",
                    "replyToken": "tok-2",
                    "source": { "type": "user", "userId": "U2" },
                    "message": { "type": "sticker" }
                }
            ]
        }"#;

        let events = parse_events(payload).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == EventKind::Other));
    }

    #[test]
    fn test_malformed_element_degrades_instead_of_failing() {
        let payload = r#"{ "events": [ {}, { "type": "message" } ] }"#;
        let events = parse_events(payload).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == EventKind::Other));
    }

    #[test]
    fn test_invalid_body_is_a_channel_error() {
        assert!(matches!(parse_events("not json"), Err(RestockError::Channel(_))));
        assert!(matches!(parse_events(r#"{"other": 1}"#), Err(RestockError::Channel(_))));
    }

    #[test]
    fn test_empty_events_array() {
        let events = parse_events(r#"{"events": []}"#).unwrap();
        assert!(events.is_empty());
    }
}
