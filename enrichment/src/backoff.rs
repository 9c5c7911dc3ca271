//! Waiting between retry attempts.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

/// Sleeps between two attempts against the same model.
#[async_trait]
pub trait Delay: Send + Sync {
    /// `attempt` is the 0-based index of the attempt that just failed.
    async fn wait(&self, attempt: u32);
}

/// Exponential backoff with additive jitter: `base * 2^attempt + U(0, base)`.
#[derive(Debug, Clone, Copy)]
pub struct JitteredBackoff {
    base: Duration,
}

impl JitteredBackoff {
    #[must_use]
    pub const fn new(base: Duration) -> Self {
        Self { base }
    }

    /// Deterministic part of the schedule; `jitter` is clamped to `[0, 1)`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32, jitter: f64) -> Duration {
        let exponential = self.base.saturating_mul(2u32.saturating_pow(attempt));
        let jitter = jitter.clamp(0.0, 1.0);
        exponential.saturating_add(self.base.mul_f64(jitter))
    }
}

#[async_trait]
impl Delay for JitteredBackoff {
    async fn wait(&self, attempt: u32) {
        let jitter = rand::rng().random::<f64>();
        let delay = self.delay_for(attempt, jitter);
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(event = "backoff", attempt, delay_ms, "backoff");
        tokio::time::sleep(delay).await;
    }
}

/// Retries immediately. Used by tests and by callers that pace themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn wait(&self, _attempt: u32) {}
}
