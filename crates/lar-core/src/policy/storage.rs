use async_trait::async_trait;

use crate::Result;

/// Counter store backing sliding-window rate limits.
///
/// `can_execute` and `record_execution` are separate calls, so two concurrent
/// invocations for the same key can both pass the check. Implementations that
/// need exact limits under concurrency must make check-and-increment atomic
/// on their side.
#[async_trait]
pub trait RateLimitStorage: Send + Sync {
    /// Number of executions recorded for `key` within the trailing window.
    async fn get_execution_count(&self, key: &str, window_seconds: u64) -> Result<u64>;

    async fn record_execution(&self, key: &str) -> Result<()>;
}
