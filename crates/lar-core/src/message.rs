use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::Error, Result};

/// Kind of content carried by an inbound chat event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    Video,
    Audio,
    File,
    Location,
    Sticker,
}

impl MessageType {
    pub const ALL: [MessageType; 7] = [
        MessageType::Text,
        MessageType::Image,
        MessageType::Video,
        MessageType::Audio,
        MessageType::File,
        MessageType::Location,
        MessageType::Sticker,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
            MessageType::Video => "video",
            MessageType::Audio => "audio",
            MessageType::File => "file",
            MessageType::Location => "location",
            MessageType::Sticker => "sticker",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MessageType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::Validation(format!("unknown message type: {s}")))
    }
}

/// Where an inbound event came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    User,
    Group,
    Room,
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(SourceKind::User),
            "group" => Ok(SourceKind::Group),
            "room" => Ok(SourceKind::Room),
            other => Err(Error::Validation(format!("unknown source type: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageSource {
    pub kind: SourceKind,
    pub user_id: String,
    pub group_id: Option<String>,
    pub room_id: Option<String>,
}

impl MessageSource {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::User,
            user_id: user_id.into(),
            group_id: None,
            room_id: None,
        }
    }

    pub fn group(user_id: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Group,
            user_id: user_id.into(),
            group_id: Some(group_id.into()),
            room_id: None,
        }
    }

    pub fn room(user_id: impl Into<String>, room_id: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Room,
            user_id: user_id.into(),
            group_id: None,
            room_id: Some(room_id.into()),
        }
    }
}

/// One inbound chat event. Immutable once constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct IncomingMessage {
    id: String,
    kind: MessageType,
    text: Option<String>,
    source: MessageSource,
    timestamp: DateTime<Utc>,
    reply_token: String,
}

impl IncomingMessage {
    pub fn new(
        id: impl Into<String>,
        kind: MessageType,
        text: Option<String>,
        source: MessageSource,
        timestamp: DateTime<Utc>,
        reply_token: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        let reply_token = reply_token.into();

        if id.is_empty() {
            return Err(Error::Validation("message id is required".to_string()));
        }
        if reply_token.is_empty() {
            return Err(Error::Validation("reply token is required".to_string()));
        }
        if source.user_id.is_empty() {
            return Err(Error::Validation("user id is required".to_string()));
        }

        Ok(Self {
            id,
            kind,
            text,
            source,
            timestamp,
            reply_token,
        })
    }

    /// Map a LINE webhook event into a message.
    ///
    /// Missing message type means text, missing message id gets a fresh UUID,
    /// and an empty text is treated as no text at all.
    pub fn from_webhook_event(event: &WebhookEvent) -> Result<Self> {
        let message = event.message.as_ref();

        let id = message
            .and_then(|m| m.id.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let kind = match message.and_then(|m| m.kind.as_deref()) {
            Some(s) if !s.is_empty() => s.parse()?,
            _ => MessageType::Text,
        };

        let text = message
            .and_then(|m| m.text.clone())
            .filter(|s| !s.is_empty());

        let source_kind = match event.source.kind.as_deref() {
            Some(s) => s.parse()?,
            None => SourceKind::User,
        };

        let timestamp = DateTime::<Utc>::from_timestamp_millis(event.timestamp).ok_or_else(
            || Error::Validation(format!("timestamp out of range: {}", event.timestamp)),
        )?;

        Self::new(
            id,
            kind,
            text,
            MessageSource {
                kind: source_kind,
                user_id: event.source.user_id.clone().unwrap_or_default(),
                group_id: event.source.group_id.clone(),
                room_id: event.source.room_id.clone(),
            },
            timestamp,
            event.reply_token.clone().unwrap_or_default(),
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> MessageType {
        self.kind
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn source(&self) -> &MessageSource {
        &self.source
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn reply_token(&self) -> &str {
        &self.reply_token
    }

    pub fn user_id(&self) -> &str {
        &self.source.user_id
    }

    pub fn group_id(&self) -> Option<&str> {
        self.source.group_id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn room_id(&self) -> Option<&str> {
        self.source.room_id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_text_message(&self) -> bool {
        self.kind == MessageType::Text && self.text.is_some()
    }

    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

// ============== Webhook Payload ==============

/// A single event from a LINE webhook body, as much of it as the engine reads.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<WebhookMessage>,
    #[serde(default)]
    pub source: WebhookSource,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub reply_token: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WebhookMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSource {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}
