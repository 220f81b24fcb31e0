use async_trait::async_trait;
use tracing::info;

use crate::{
    messaging::{port::ReplyChannel, types::ReplyMessage},
    Result,
};

/// ReplyChannel that only logs what would have been sent.
///
/// Useful for dry runs when no channel access token is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogOnlyChannel;

#[async_trait]
impl ReplyChannel for LogOnlyChannel {
    async fn reply(&self, reply_token: &str, messages: &[ReplyMessage]) -> Result<()> {
        for m in messages {
            info!(reply_token, kind = m.kind(), content = %m.summary(), "dry-run reply");
        }
        Ok(())
    }
}
