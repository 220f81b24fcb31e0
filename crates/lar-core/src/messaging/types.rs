use serde::{Deserialize, Serialize};

/// LINE allows at most this many messages per reply call.
pub const MAX_MESSAGES_PER_REPLY: usize = 5;

/// A reply object in LINE Messaging API shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplyMessage {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Sticker {
        package_id: String,
        sticker_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        original_content_url: String,
        preview_image_url: String,
    },
}

impl ReplyMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ReplyMessage::Text { .. } => "text",
            ReplyMessage::Sticker { .. } => "sticker",
            ReplyMessage::Image { .. } => "image",
        }
    }

    /// Short human-readable summary for logs.
    pub fn summary(&self) -> String {
        match self {
            ReplyMessage::Text { text } => {
                let mut out: String = text.chars().take(50).collect();
                if text.chars().count() > 50 {
                    out.push_str("...");
                }
                out
            }
            ReplyMessage::Sticker {
                package_id,
                sticker_id,
            } => format!("{package_id}/{sticker_id}"),
            ReplyMessage::Image {
                original_content_url,
                ..
            } => original_content_url.clone(),
        }
    }
}
