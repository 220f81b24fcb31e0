use serde::Deserialize;
use tracing::{debug, warn};

use lar_core::{
    errors::Error,
    message::{IncomingMessage, WebhookEvent},
    Result,
};

/// Body of a LINE webhook POST.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug)]
pub struct EventError {
    /// Position of the event in the webhook body.
    pub index: usize,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct ParsedEvents {
    pub destination: Option<String>,
    pub messages: Vec<IncomingMessage>,
    pub errors: Vec<EventError>,
}

/// Map every `message` event of a webhook body.
///
/// Non-message events (follow, postback, ...) are skipped. A malformed event
/// is collected in `errors` and does not stop the rest of the batch; only a
/// body that is not valid JSON fails the whole call.
pub fn parse_message_events(body: &str) -> Result<ParsedEvents> {
    let body: WebhookBody = serde_json::from_str(body)?;
    let mut parsed = ParsedEvents {
        destination: body.destination,
        ..ParsedEvents::default()
    };

    for (index, event) in body.events.iter().enumerate() {
        if event.kind.as_deref() != Some("message") {
            debug!(index, kind = ?event.kind, "skipping non-message event");
            continue;
        }

        match IncomingMessage::from_webhook_event(event) {
            Ok(message) => parsed.messages.push(message),
            Err(error) => {
                warn!(index, error = %error, "dropping malformed webhook event");
                parsed.errors.push(EventError { index, error });
            }
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use lar_core::message::MessageType;

    use super::*;

    const BODY: &str = r#"{
        "destination": "Uxxxxxxxx",
        "events": [
            {
                "type": "message",
                "message": { "id": "1", "type": "text", "text": "こんにちは" },
                "source": { "type": "user", "userId": "U1" },
                "timestamp": 1700000000000,
                "replyToken": "rt-1"
            },
            {
                "type": "follow",
                "source": { "type": "user", "userId": "U2" },
                "timestamp": 1700000000001,
                "replyToken": "rt-2"
            },
            {
                "type": "message",
                "message": { "id": "3", "type": "sticker" },
                "source": { "type": "user", "userId": "U3" },
                "timestamp": 1700000000002
            },
            {
                "type": "message",
                "message": { "id": "4", "type": "sticker" },
                "source": { "type": "group", "userId": "U4", "groupId": "G1" },
                "timestamp": 1700000000003,
                "replyToken": "rt-4"
            }
        ]
    }"#;

    #[test]
    fn keeps_message_events_and_collects_errors() {
        let parsed = parse_message_events(BODY).unwrap();

        assert_eq!(parsed.destination.as_deref(), Some("Uxxxxxxxx"));
        assert_eq!(parsed.messages.len(), 2);
        assert_eq!(parsed.messages[0].text(), Some("こんにちは"));
        assert_eq!(parsed.messages[1].kind(), MessageType::Sticker);
        assert_eq!(parsed.messages[1].group_id(), Some("G1"));

        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].index, 2);
        assert!(parsed.errors[0].error.is_validation());
    }

    #[test]
    fn empty_body_has_no_events() {
        let parsed = parse_message_events("{}").unwrap();
        assert!(parsed.messages.is_empty());
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn invalid_json_fails() {
        assert!(matches!(
            parse_message_events("not json").unwrap_err(),
            Error::Json(_)
        ));
    }
}
