use async_trait::async_trait;

use crate::{messaging::types::ReplyMessage, Result};

/// Outbound messaging port.
///
/// The LINE Messaging API is the first implementation; a reply is addressed by
/// the single-use reply token of the inbound event it answers.
#[async_trait]
pub trait ReplyChannel: Send + Sync {
    async fn reply(&self, reply_token: &str, messages: &[ReplyMessage]) -> Result<()>;
}
