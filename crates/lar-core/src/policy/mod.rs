//! Strategies deciding *how often* a rule may fire.

use std::{fmt, str::FromStr, sync::Arc};

use async_trait::async_trait;

use crate::{errors::Error, Result};

pub mod memory;
pub mod no_limit;
pub mod sliding_window;
pub mod storage;

pub use memory::InMemoryRateLimitStorage;
pub use no_limit::NoRateLimitPolicy;
pub use sliding_window::SlidingWindowPolicy;
pub use storage::RateLimitStorage;

#[async_trait]
pub trait RateLimitPolicy: fmt::Debug + Send + Sync {
    async fn can_execute(&self, rule_id: &str, user_id: &str, group_id: Option<&str>) -> Result<bool>;

    async fn record_execution(
        &self,
        rule_id: &str,
        user_id: &str,
        group_id: Option<&str>,
    ) -> Result<()>;
}

pub type SharedPolicy = Arc<dyn RateLimitPolicy>;

/// What a sliding-window counter is partitioned by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RateLimitScope {
    #[default]
    User,
    Group,
    Global,
}

impl RateLimitScope {
    pub fn as_str(self) -> &'static str {
        match self {
            RateLimitScope::User => "user",
            RateLimitScope::Group => "group",
            RateLimitScope::Global => "global",
        }
    }
}

impl fmt::Display for RateLimitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `user`, `group`, `global`, and the legacy `all` (same as global).
/// The legacy `room` scope has no counterpart and is rejected.
impl FromStr for RateLimitScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(RateLimitScope::User),
            "group" => Ok(RateLimitScope::Group),
            "global" | "all" => Ok(RateLimitScope::Global),
            "room" => Err(Error::Validation(
                "rate limit scope 'room' is not supported; use 'group' or 'user'".to_string(),
            )),
            other => Err(Error::Validation(format!("unknown rate limit scope: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scopes_including_legacy_all() {
        assert_eq!("user".parse::<RateLimitScope>().unwrap(), RateLimitScope::User);
        assert_eq!("Group".parse::<RateLimitScope>().unwrap(), RateLimitScope::Group);
        assert_eq!("global".parse::<RateLimitScope>().unwrap(), RateLimitScope::Global);
        assert_eq!("all".parse::<RateLimitScope>().unwrap(), RateLimitScope::Global);
        assert!("room".parse::<RateLimitScope>().unwrap_err().is_validation());
        assert!("planet".parse::<RateLimitScope>().is_err());
    }
}
