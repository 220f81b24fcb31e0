//! Fakes shared by the unit tests in this crate.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    command::{MessageContext, ReplyCommand, ReplyDispatcher},
    errors::Error,
    message::{IncomingMessage, MessageSource, MessageType},
    messaging::{port::ReplyChannel, types::ReplyMessage},
    policy::{RateLimitPolicy, RateLimitStorage},
    random::RandomSource,
    Result,
};

pub fn text_message(text: &str) -> IncomingMessage {
    text_message_from(text, "U1")
}

pub fn text_message_from(text: &str, user_id: &str) -> IncomingMessage {
    IncomingMessage::new(
        uuid::Uuid::new_v4().to_string(),
        MessageType::Text,
        Some(text.to_string()),
        MessageSource::user(user_id),
        Utc::now(),
        "reply-token",
    )
    .unwrap()
}

pub fn message_of(kind: MessageType, text: Option<&str>) -> IncomingMessage {
    IncomingMessage::new(
        "m-1",
        kind,
        text.map(str::to_string),
        MessageSource::user("U1"),
        Utc::now(),
        "reply-token",
    )
    .unwrap()
}

pub fn group_message(text: &str, user_id: &str, group_id: &str) -> IncomingMessage {
    IncomingMessage::new(
        "m-1",
        MessageType::Text,
        Some(text.to_string()),
        MessageSource::group(user_id, group_id),
        Utc::now(),
        "reply-token",
    )
    .unwrap()
}

pub fn text_context(text: &str) -> MessageContext {
    MessageContext::from_message(&text_message(text))
}

// ============== Reply channel ==============

#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<(String, Vec<ReplyMessage>)>>,
}

impl RecordingChannel {
    pub fn sent(&self) -> Vec<(String, Vec<ReplyMessage>)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyChannel for RecordingChannel {
    async fn reply(&self, reply_token: &str, messages: &[ReplyMessage]) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((reply_token.to_string(), messages.to_vec()));
        Ok(())
    }
}

struct FailingChannel;

#[async_trait]
impl ReplyChannel for FailingChannel {
    async fn reply(&self, _reply_token: &str, _messages: &[ReplyMessage]) -> Result<()> {
        Err(Error::External("channel unavailable".to_string()))
    }
}

pub fn recording_dispatcher(
    random: impl RandomSource + 'static,
) -> (ReplyDispatcher, Arc<RecordingChannel>) {
    let channel = Arc::new(RecordingChannel::default());
    let dispatcher = ReplyDispatcher::new(channel.clone(), Arc::new(random));
    (dispatcher, channel)
}

pub fn failing_dispatcher() -> ReplyDispatcher {
    ReplyDispatcher::new(Arc::new(FailingChannel), Arc::new(ScriptedRandom::units([0.0])))
}

// ============== Randomness ==============

/// Replays fixed draws, cycling when exhausted.
pub struct ScriptedRandom {
    units: Vec<f64>,
    indices: Vec<usize>,
    next_unit: AtomicUsize,
    next_index: AtomicUsize,
}

impl ScriptedRandom {
    pub fn units(units: impl IntoIterator<Item = f64>) -> Self {
        Self::new(units.into_iter().collect(), Vec::new())
    }

    pub fn indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self::new(Vec::new(), indices.into_iter().collect())
    }

    fn new(units: Vec<f64>, indices: Vec<usize>) -> Self {
        Self {
            units,
            indices,
            next_unit: AtomicUsize::new(0),
            next_index: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&self) -> f64 {
        if self.units.is_empty() {
            return 0.0;
        }
        let n = self.next_unit.fetch_add(1, Ordering::SeqCst);
        self.units[n % self.units.len()]
    }

    fn next_index(&self, len: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let n = self.next_index.fetch_add(1, Ordering::SeqCst);
        self.indices[n % self.indices.len()] % len
    }
}

// ============== Commands and policies ==============

#[derive(Debug, Default)]
pub struct SpyCommand {
    calls: AtomicUsize,
}

impl SpyCommand {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReplyCommand for SpyCommand {
    async fn execute(&self, _ctx: &MessageContext, _dispatcher: &ReplyDispatcher) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug)]
pub struct SpyPolicy {
    allow: bool,
    checks: AtomicUsize,
    records: AtomicUsize,
}

impl SpyPolicy {
    pub fn allowing() -> Self {
        Self::new(true)
    }

    pub fn denying() -> Self {
        Self::new(false)
    }

    fn new(allow: bool) -> Self {
        Self {
            allow,
            checks: AtomicUsize::new(0),
            records: AtomicUsize::new(0),
        }
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> usize {
        self.records.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateLimitPolicy for SpyPolicy {
    async fn can_execute(&self, _rule_id: &str, _user_id: &str, _group_id: Option<&str>) -> Result<bool> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.allow)
    }

    async fn record_execution(
        &self,
        _rule_id: &str,
        _user_id: &str,
        _group_id: Option<&str>,
    ) -> Result<()> {
        self.records.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Counts executions per key with no notion of time; `clear` stands in for
/// the window elapsing.
#[derive(Debug, Default)]
pub struct FakeStorage {
    counts: Mutex<HashMap<String, u64>>,
    fail: bool,
}

impl FakeStorage {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn clear(&self) {
        self.counts.lock().unwrap().clear();
    }
}

#[async_trait]
impl RateLimitStorage for FakeStorage {
    async fn get_execution_count(&self, key: &str, _window_seconds: u64) -> Result<u64> {
        if self.fail {
            return Err(Error::Storage("store unavailable".to_string()));
        }
        Ok(self.counts.lock().unwrap().get(key).copied().unwrap_or(0))
    }

    async fn record_execution(&self, key: &str) -> Result<()> {
        if self.fail {
            return Err(Error::Storage("store unavailable".to_string()));
        }
        *self.counts.lock().unwrap().entry(key.to_string()).or_insert(0) += 1;
        Ok(())
    }
}
