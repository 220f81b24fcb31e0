//! Actions deciding *what* a rule sends back.

use std::{fmt, sync::Arc};

use async_trait::async_trait;

use crate::{
    errors::Error,
    message::IncomingMessage,
    messaging::{port::ReplyChannel, types::ReplyMessage},
    random::RandomSource,
    Result,
};

pub mod composite;
pub mod reply;

pub use composite::CompositeReplyCommand;
pub use reply::{ImageReplyCommand, StickerReplyCommand, TextReplyCommand};

/// Everything a command needs to address its reply.
#[derive(Clone, Debug)]
pub struct MessageContext {
    pub message: IncomingMessage,
    pub reply_token: String,
    pub user_id: String,
    pub group_id: Option<String>,
    pub room_id: Option<String>,
}

impl MessageContext {
    pub fn from_message(message: &IncomingMessage) -> Self {
        Self {
            reply_token: message.reply_token().to_string(),
            user_id: message.user_id().to_string(),
            group_id: message.group_id().map(str::to_string),
            room_id: message.room_id().map(str::to_string),
            message: message.clone(),
        }
    }
}

/// Collaborators a command executes against: the outbound channel and the
/// random source used for probability draws.
#[derive(Clone)]
pub struct ReplyDispatcher {
    channel: Arc<dyn ReplyChannel>,
    random: Arc<dyn RandomSource>,
}

impl ReplyDispatcher {
    pub fn new(channel: Arc<dyn ReplyChannel>, random: Arc<dyn RandomSource>) -> Self {
        Self { channel, random }
    }

    /// Fresh draw per call; `true` when the draw falls below `probability`.
    pub fn roll(&self, probability: Probability) -> bool {
        self.random.next_unit() < probability.value()
    }

    pub fn pick(&self, len: usize) -> usize {
        self.random.next_index(len)
    }

    pub async fn send(&self, reply_token: &str, message: ReplyMessage) -> Result<()> {
        self.channel.reply(reply_token, &[message]).await
    }
}

impl fmt::Debug for ReplyDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyDispatcher").finish_non_exhaustive()
    }
}

/// A reply action.
#[async_trait]
pub trait ReplyCommand: fmt::Debug + Send + Sync {
    async fn execute(&self, ctx: &MessageContext, dispatcher: &ReplyDispatcher) -> Result<()>;
}

pub type SharedCommand = Arc<dyn ReplyCommand>;

#[async_trait]
impl<T: ReplyCommand + ?Sized> ReplyCommand for Arc<T> {
    async fn execute(&self, ctx: &MessageContext, dispatcher: &ReplyDispatcher) -> Result<()> {
        (**self).execute(ctx, dispatcher).await
    }
}

/// Probability in `[0, 1]` that a command dispatches when executed.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Probability(f64);

impl Probability {
    pub const ALWAYS: Probability = Probability(1.0);

    pub fn new(value: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(Error::Validation(format!(
                "probability must be between 0 and 1, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Probability {
    fn default() -> Self {
        Self::ALWAYS
    }
}

pub(crate) fn require_non_empty(value: String, what: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{what} cannot be empty")));
    }
    Ok(value)
}
