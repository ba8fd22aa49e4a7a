//! Fixed-window request limiting with a pluggable counter store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::LoginRateLimitConfig;

/// Counter state for one key after an increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    pub count: u32,
    pub resets_in: Duration,
}

/// Increment-and-read counters that expire after a window.
///
/// Implementations backed by a shared cache let several instances enforce one
/// limit; the in-memory store only sees its own process.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn increment(&self, key: &str, window: Duration) -> Result<WindowCount>;
}

#[derive(Default)]
pub struct MemoryRateLimitStore {
    windows: Mutex<HashMap<String, (Instant, u32)>>,
}

/// Expired windows are swept once the map grows past this.
const SWEEP_THRESHOLD: usize = 1024;

impl MemoryRateLimitStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn increment_at(&self, key: &str, window: Duration, now: Instant) -> WindowCount {
        let mut windows = self.windows.lock().await;

        if windows.len() > SWEEP_THRESHOLD {
            windows.retain(|_, (started, _)| now.duration_since(*started) < window);
        }

        let entry = windows.entry(key.to_string()).or_insert((now, 0));
        if now.duration_since(entry.0) >= window {
            *entry = (now, 0);
        }
        entry.1 = entry.1.saturating_add(1);

        WindowCount {
            count: entry.1,
            resets_in: window.saturating_sub(now.duration_since(entry.0)),
        }
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn increment(&self, key: &str, window: Duration) -> Result<WindowCount> {
        Ok(self.increment_at(key, window, Instant::now()).await)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

pub struct LoginRateLimiter {
    store: Arc<dyn RateLimitStore>,
    max_requests: u32,
    window: Duration,
}

impl LoginRateLimiter {
    #[must_use]
    pub fn new(store: Arc<dyn RateLimitStore>, max_requests: u32, window: Duration) -> Self {
        Self {
            store,
            max_requests,
            window,
        }
    }

    #[must_use]
    pub fn from_config(config: &LoginRateLimitConfig, store: Arc<dyn RateLimitStore>) -> Self {
        Self::new(
            store,
            config.max_requests,
            Duration::from_secs(config.window_seconds),
        )
    }

    pub async fn check(&self, key: &str) -> Result<RateDecision> {
        let current = self.store.increment(key, self.window).await?;

        Ok(if current.count > self.max_requests {
            RateDecision::Limited {
                retry_after: current.resets_in,
            }
        } else {
            RateDecision::Allowed {
                remaining: self.max_requests - current.count,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn counts_within_window_then_resets() {
        let store = MemoryRateLimitStore::new();
        let start = Instant::now();

        for expected in 1..=3 {
            let count = store.increment_at("1.2.3.4", MINUTE, start).await;
            assert_eq!(count.count, expected);
        }

        let later = store
            .increment_at("1.2.3.4", MINUTE, start + Duration::from_secs(59))
            .await;
        assert_eq!(later.count, 4);
        assert_eq!(later.resets_in, Duration::from_secs(1));

        let fresh = store.increment_at("1.2.3.4", MINUTE, start + MINUTE).await;
        assert_eq!(fresh.count, 1);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let store = MemoryRateLimitStore::new();
        let now = Instant::now();

        store.increment_at("a", MINUTE, now).await;
        store.increment_at("a", MINUTE, now).await;
        let b = store.increment_at("b", MINUTE, now).await;

        assert_eq!(b.count, 1);
    }

    #[tokio::test]
    async fn sixth_request_is_limited() {
        let limiter = LoginRateLimiter::new(Arc::new(MemoryRateLimitStore::new()), 5, MINUTE);

        for remaining in (0..5).rev() {
            assert_eq!(
                limiter.check("10.0.0.1").await.unwrap(),
                RateDecision::Allowed { remaining }
            );
        }

        assert!(matches!(
            limiter.check("10.0.0.1").await.unwrap(),
            RateDecision::Limited { .. }
        ));
        assert!(matches!(
            limiter.check("10.0.0.2").await.unwrap(),
            RateDecision::Allowed { remaining: 4 }
        ));
    }
}
