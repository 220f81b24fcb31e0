use std::{fmt, sync::Arc};

use async_trait::async_trait;
use tracing::debug;

use crate::{
    errors::Error,
    policy::{RateLimitPolicy, RateLimitScope, RateLimitStorage},
    Result,
};

/// Allows at most `max_count` executions per trailing `window_seconds`,
/// counted per scope in an external store.
#[derive(Clone)]
pub struct SlidingWindowPolicy {
    max_count: u32,
    window_seconds: u64,
    scope: RateLimitScope,
    storage: Arc<dyn RateLimitStorage>,
}

impl SlidingWindowPolicy {
    pub fn new(
        max_count: u32,
        window_seconds: u64,
        scope: RateLimitScope,
        storage: Arc<dyn RateLimitStorage>,
    ) -> Result<Self> {
        if max_count == 0 {
            return Err(Error::Validation("max count must be positive".to_string()));
        }
        if window_seconds == 0 {
            return Err(Error::Validation(
                "window seconds must be positive".to_string(),
            ));
        }
        Ok(Self {
            max_count,
            window_seconds,
            scope,
            storage,
        })
    }

    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    pub fn window_seconds(&self) -> u64 {
        self.window_seconds
    }

    pub fn scope(&self) -> RateLimitScope {
        self.scope
    }

    /// Storage key: `rule:{rule_id}:{scope}:{value}`.
    ///
    /// Group scope without a group id falls back to the per-user key.
    pub fn key(&self, rule_id: &str, user_id: &str, group_id: Option<&str>) -> String {
        match (self.scope, group_id) {
            (RateLimitScope::User, _) | (RateLimitScope::Group, None) => {
                format!("rule:{rule_id}:user:{user_id}")
            }
            (RateLimitScope::Group, Some(group_id)) => format!("rule:{rule_id}:group:{group_id}"),
            (RateLimitScope::Global, _) => format!("rule:{rule_id}:global"),
        }
    }
}

impl fmt::Debug for SlidingWindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlidingWindowPolicy")
            .field("max_count", &self.max_count)
            .field("window_seconds", &self.window_seconds)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RateLimitPolicy for SlidingWindowPolicy {
    async fn can_execute(&self, rule_id: &str, user_id: &str, group_id: Option<&str>) -> Result<bool> {
        let key = self.key(rule_id, user_id, group_id);
        let count = self
            .storage
            .get_execution_count(&key, self.window_seconds)
            .await?;
        let allowed = count < u64::from(self.max_count);
        if !allowed {
            debug!(%key, count, max = self.max_count, "rate limit reached");
        }
        Ok(allowed)
    }

    async fn record_execution(
        &self,
        rule_id: &str,
        user_id: &str,
        group_id: Option<&str>,
    ) -> Result<()> {
        let key = self.key(rule_id, user_id, group_id);
        self.storage.record_execution(&key).await
    }
}
