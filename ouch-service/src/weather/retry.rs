//! Backoff schedule for weather fetches.
//!
//! The wait after failed attempt `n` (1-based) is
//! `min(base * 2^(n-1), max_delay) + jitter`, with jitter drawn uniformly
//! from `[0, jitter)` and the sum capped at `max_delay`.

use std::time::Duration;

use rand::Rng;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_000;
pub const DEFAULT_JITTER_MS: u64 = 500;
pub const DEFAULT_MAX_DELAY_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Exclusive upper bound of the random component.
    pub jitter: Duration,
    /// Upper bound on any single wait.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            DEFAULT_BASE_DELAY_MS,
            DEFAULT_JITTER_MS,
            DEFAULT_MAX_DELAY_MS,
        )
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64, jitter_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::from_millis(base_delay_ms),
            jitter: Duration::from_millis(jitter_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// Deterministic part of the wait after failed attempt `attempt`.
    pub fn base_delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Full wait after failed attempt `attempt`, jitter included.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        (self.base_delay_after(attempt) + random_jitter(self.jitter)).min(self.max_delay)
    }
}

fn random_jitter(bound: Duration) -> Duration {
    let bound_ms = u64::try_from(bound.as_millis()).unwrap_or(u64::MAX);
    if bound_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..bound_ms))
}
