//! LINE Messaging API adapter.
//!
//! This crate implements the `lar-core` ReplyChannel port over HTTPS and
//! parses webhook bodies into inbound messages.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, RETRY_AFTER},
    StatusCode,
};
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, warn};

pub mod webhook;

use lar_core::{
    errors::Error,
    messaging::{
        port::ReplyChannel,
        types::{ReplyMessage, MAX_MESSAGES_PER_REPLY},
    },
    Result,
};

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [ReplyMessage],
}

#[derive(Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: &'a [ReplyMessage],
}

#[derive(Clone, Debug)]
pub struct LineReplyClient {
    http: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl LineReplyClient {
    pub fn new(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(Error::Config("LINE channel access token is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("line client build error: {e}")))?;

        Ok(Self {
            http,
            access_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send messages to a user, group or room id without a reply token.
    pub async fn push_message(&self, to: &str, messages: &[ReplyMessage]) -> Result<()> {
        if to.is_empty() {
            return Err(Error::Validation("push target is required".to_string()));
        }
        check_batch(messages)?;
        self.post("message/push", &PushRequest { to, messages }).await
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<()> {
        const MAX_RETRIES: usize = 1;
        let url = format!("{}/{path}", self.base_url);
        let mut attempts = 0usize;

        loop {
            let resp = self
                .http
                .post(&url)
                .bearer_auth(&self.access_token)
                .json(body)
                .send()
                .await
                .map_err(|e| Error::External(format!("line request error: {e}")))?;

            let status = resp.status();
            if status == StatusCode::TOO_MANY_REQUESTS && attempts < MAX_RETRIES {
                attempts += 1;
                let delay = retry_after(resp.headers()).unwrap_or(DEFAULT_RETRY_DELAY);
                warn!(path, delay_ms = delay.as_millis() as u64, "LINE API rate limited, retrying");
                sleep(delay).await;
                continue;
            }

            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(Error::External(format!(
                    "line {path} failed: {status} {}",
                    body.chars().take(200).collect::<String>()
                )));
            }

            debug!(path, "LINE API call succeeded");
            return Ok(());
        }
    }
}

#[async_trait]
impl ReplyChannel for LineReplyClient {
    async fn reply(&self, reply_token: &str, messages: &[ReplyMessage]) -> Result<()> {
        if reply_token.is_empty() {
            return Err(Error::Validation("reply token is required".to_string()));
        }
        check_batch(messages)?;
        self.post(
            "message/reply",
            &ReplyRequest {
                reply_token,
                messages,
            },
        )
        .await
    }
}

fn check_batch(messages: &[ReplyMessage]) -> Result<()> {
    if messages.is_empty() {
        return Err(Error::Validation("at least one message is required".to_string()));
    }
    if messages.len() > MAX_MESSAGES_PER_REPLY {
        return Err(Error::Validation(format!(
            "at most {MAX_MESSAGES_PER_REPLY} messages per request, got {}",
            messages.len()
        )));
    }
    Ok(())
}

/// `Retry-After` in whole seconds, capped. HTTP-date values are ignored.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let secs = headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()?;
    Some(Duration::from_secs(secs).min(MAX_RETRY_DELAY))
}
