use async_trait::async_trait;
use tracing::debug;

use crate::{
    command::{require_non_empty, MessageContext, Probability, ReplyCommand, ReplyDispatcher},
    messaging::types::ReplyMessage,
    Result,
};

/// Shared execution path for single-message commands: roll, then dispatch.
async fn dispatch_with_probability(
    probability: Probability,
    ctx: &MessageContext,
    dispatcher: &ReplyDispatcher,
    message: ReplyMessage,
) -> Result<()> {
    if !dispatcher.roll(probability) {
        debug!(
            user_id = %ctx.user_id,
            kind = message.kind(),
            probability = probability.value(),
            "reply skipped by probability draw"
        );
        return Ok(());
    }

    debug!(user_id = %ctx.user_id, kind = message.kind(), content = %message.summary(), "sending reply");
    dispatcher.send(&ctx.reply_token, message).await
}

#[derive(Clone, Debug)]
pub struct TextReplyCommand {
    text: String,
    probability: Probability,
}

impl TextReplyCommand {
    pub fn new(text: impl Into<String>, probability: f64) -> Result<Self> {
        Ok(Self {
            text: require_non_empty(text.into(), "text")?,
            probability: Probability::new(probability)?,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn probability(&self) -> Probability {
        self.probability
    }
}

#[async_trait]
impl ReplyCommand for TextReplyCommand {
    async fn execute(&self, ctx: &MessageContext, dispatcher: &ReplyDispatcher) -> Result<()> {
        let message = ReplyMessage::Text {
            text: self.text.clone(),
        };
        dispatch_with_probability(self.probability, ctx, dispatcher, message).await
    }
}

#[derive(Clone, Debug)]
pub struct StickerReplyCommand {
    package_id: String,
    sticker_id: String,
    probability: Probability,
}

impl StickerReplyCommand {
    pub fn new(
        package_id: impl Into<String>,
        sticker_id: impl Into<String>,
        probability: f64,
    ) -> Result<Self> {
        Ok(Self {
            package_id: require_non_empty(package_id.into(), "package id")?,
            sticker_id: require_non_empty(sticker_id.into(), "sticker id")?,
            probability: Probability::new(probability)?,
        })
    }

    pub fn package_id(&self) -> &str {
        &self.package_id
    }

    pub fn sticker_id(&self) -> &str {
        &self.sticker_id
    }

    pub fn probability(&self) -> Probability {
        self.probability
    }
}

#[async_trait]
impl ReplyCommand for StickerReplyCommand {
    async fn execute(&self, ctx: &MessageContext, dispatcher: &ReplyDispatcher) -> Result<()> {
        let message = ReplyMessage::Sticker {
            package_id: self.package_id.clone(),
            sticker_id: self.sticker_id.clone(),
        };
        dispatch_with_probability(self.probability, ctx, dispatcher, message).await
    }
}

#[derive(Clone, Debug)]
pub struct ImageReplyCommand {
    original_content_url: String,
    preview_image_url: String,
    probability: Probability,
}

impl ImageReplyCommand {
    pub fn new(
        original_content_url: impl Into<String>,
        preview_image_url: impl Into<String>,
        probability: f64,
    ) -> Result<Self> {
        Ok(Self {
            original_content_url: require_non_empty(
                original_content_url.into(),
                "original content url",
            )?,
            preview_image_url: require_non_empty(preview_image_url.into(), "preview image url")?,
            probability: Probability::new(probability)?,
        })
    }

    pub fn original_content_url(&self) -> &str {
        &self.original_content_url
    }

    pub fn preview_image_url(&self) -> &str {
        &self.preview_image_url
    }

    pub fn probability(&self) -> Probability {
        self.probability
    }
}

#[async_trait]
impl ReplyCommand for ImageReplyCommand {
    async fn execute(&self, ctx: &MessageContext, dispatcher: &ReplyDispatcher) -> Result<()> {
        let message = ReplyMessage::Image {
            original_content_url: self.original_content_url.clone(),
            preview_image_url: self.preview_image_url.clone(),
        };
        dispatch_with_probability(self.probability, ctx, dispatcher, message).await
    }
}
