use async_trait::async_trait;

use crate::{policy::RateLimitPolicy, Result};

/// Always permits execution and keeps no history.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRateLimitPolicy;

#[async_trait]
impl RateLimitPolicy for NoRateLimitPolicy {
    async fn can_execute(&self, _rule_id: &str, _user_id: &str, _group_id: Option<&str>) -> Result<bool> {
        Ok(true)
    }

    async fn record_execution(
        &self,
        _rule_id: &str,
        _user_id: &str,
        _group_id: Option<&str>,
    ) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_allows() {
        let p = NoRateLimitPolicy;
        for _ in 0..100 {
            assert!(p.can_execute("r", "u", None).await.unwrap());
            p.record_execution("r", "u", Some("g")).await.unwrap();
        }
    }
}
