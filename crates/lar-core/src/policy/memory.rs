use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::{policy::RateLimitStorage, Result};

/// In-process sliding-window log: one timestamp per recorded execution.
///
/// Entries older than the requested window are pruned on read. Counters are
/// lost on restart and are not shared between processes.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStorage {
    entries: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl InMemoryRateLimitStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all executions recorded under `key`.
    pub async fn reset(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }

    pub async fn count_at(&self, key: &str, window: Duration, now: Instant) -> u64 {
        let mut entries = self.entries.lock().await;
        let Some(log) = entries.get_mut(key) else {
            return 0;
        };

        while let Some(oldest) = log.front() {
            if now.saturating_duration_since(*oldest) >= window {
                log.pop_front();
            } else {
                break;
            }
        }

        let count = log.len() as u64;
        if log.is_empty() {
            entries.remove(key);
        }
        count
    }

    pub async fn record_at(&self, key: &str, now: Instant) {
        self.entries
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .push_back(now);
    }
}

#[async_trait]
impl RateLimitStorage for InMemoryRateLimitStorage {
    async fn get_execution_count(&self, key: &str, window_seconds: u64) -> Result<u64> {
        Ok(self
            .count_at(key, Duration::from_secs(window_seconds), Instant::now())
            .await)
    }

    async fn record_execution(&self, key: &str) -> Result<()> {
        self.record_at(key, Instant::now()).await;
        Ok(())
    }
}
