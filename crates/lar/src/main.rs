use std::sync::Arc;

use anyhow::Context;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use lar_core::{
    builder::{
        helpers::{DEFAULT_BUSINESS_HOURS, DEFAULT_BUSINESS_HOURS_MESSAGE, DEFAULT_STICKER},
        PresetBuilder, RuleBuilder,
    },
    command::ReplyDispatcher,
    config::{Config, Preset},
    messaging::{log::LogOnlyChannel, port::ReplyChannel},
    policy::InMemoryRateLimitStorage,
    random::{RandomSource, StdRandom},
    rule::AutoReplyRule,
};
use lar_line::{webhook::parse_message_events, LineReplyClient};

const GREETING_REPLY: &str = "こんにちは！";

/// Reads one LINE webhook body (file argument or stdin) and runs every message
/// event through the configured preset rule.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lar_core::logging::init("lar")?;

    let cfg = Config::load()?;
    let body = read_body(std::env::args().nth(1)).await?;

    let channel: Arc<dyn ReplyChannel> = match &cfg.line_channel_access_token {
        Some(token) => Arc::new(LineReplyClient::new(
            token,
            &cfg.line_api_base_url,
            cfg.line_request_timeout,
        )?),
        None => {
            warn!("LINE_CHANNEL_ACCESS_TOKEN not set, replies are only logged");
            Arc::new(LogOnlyChannel)
        }
    };
    let random: Arc<dyn RandomSource> = match cfg.random_seed {
        Some(seed) => Arc::new(StdRandom::seeded(seed)),
        None => Arc::new(StdRandom::from_entropy()),
    };
    let dispatcher = ReplyDispatcher::new(channel, random);

    let rule = build_rule(&cfg, Arc::new(InMemoryRateLimitStorage::new()))?;
    info!(rule = rule.name(), preset = %cfg.preset, "rule ready");

    let parsed = parse_message_events(&body)?;
    for e in &parsed.errors {
        warn!(index = e.index, error = %e.error, "skipped webhook event");
    }

    let mut fired = 0usize;
    for message in &parsed.messages {
        match rule.handle_message(message, &dispatcher).await {
            Ok(true) => fired += 1,
            Ok(false) => {}
            Err(e) => warn!(message_id = message.id(), error = %e, "rule execution failed"),
        }
    }

    info!(
        messages = parsed.messages.len(),
        fired,
        skipped = parsed.errors.len(),
        "webhook processed"
    );
    Ok(())
}

async fn read_body(path: Option<String>) -> anyhow::Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read webhook body from {path}")),
        None => {
            let mut body = String::new();
            tokio::io::stdin()
                .read_to_string(&mut body)
                .await
                .context("failed to read webhook body from stdin")?;
            Ok(body)
        }
    }
}

fn build_rule(
    cfg: &Config,
    storage: Arc<InMemoryRateLimitStorage>,
) -> lar_core::Result<AutoReplyRule> {
    let builder: RuleBuilder = match cfg.preset {
        Preset::Greeting => PresetBuilder::greeting(&cfg.account_id, GREETING_REPLY)?,
        Preset::BusinessHours => {
            let (start, end) = DEFAULT_BUSINESS_HOURS;
            PresetBuilder::business_hours(
                &cfg.account_id,
                start,
                end,
                &cfg.time_zone,
                DEFAULT_BUSINESS_HOURS_MESSAGE,
            )?
        }
        Preset::StickerReaction => {
            let (package_id, sticker_id) = DEFAULT_STICKER;
            PresetBuilder::sticker_reaction(&cfg.account_id, package_id, sticker_id)?
        }
    };

    builder
        .limit_to(
            cfg.rate_limit_max,
            cfg.rate_limit_window_secs,
            cfg.rate_limit_scope,
            storage,
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(preset: &str, max: &str) -> Config {
        let vars = [
            ("LAR_ACCOUNT_ID", "acc-1"),
            ("LAR_PRESET", preset),
            ("LAR_RATE_LIMIT_MAX", max),
        ];
        Config::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap()
    }

    #[test]
    fn builds_each_preset() {
        for preset in ["greeting", "business-hours", "sticker-reaction"] {
            let rule = build_rule(&config(preset, "2"), Arc::new(InMemoryRateLimitStorage::new()))
                .unwrap();
            assert_eq!(rule.account_id(), "acc-1");
            assert!(rule.rate_limit().is_some());
        }
    }

    #[test]
    fn zero_rate_limit_fails_at_build() {
        let err = build_rule(&config("greeting", "0"), Arc::new(InMemoryRateLimitStorage::new()))
            .unwrap_err();
        assert!(err.is_validation());
    }
}
