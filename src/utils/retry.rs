use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Exponential Backoff for Unit-of-Work Retries
// ============================================================================
//
// A unit of work that loses an optimistic-concurrency race is re-run from
// scratch. Only transient failures are retried; business rule violations
// and missing entities are returned to the caller on the first attempt.
//
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, the first one included
    pub max_attempts: u32,
    /// Delay before the second attempt
    #[serde(with = "duration_millis")]
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    #[serde(with = "duration_millis")]
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(500),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// More attempts for hot rows (e.g. a best-selling product)
    pub fn aggressive() -> Self {
        Self {
            max_attempts: 6,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_secs(1),
            multiplier: 2.0,
        }
    }

    /// Fail on the first conflict
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }
}

/// Check if an error is transient (should retry) or permanent (should not retry)
pub trait IsTransient {
    fn is_transient(&self) -> bool;
}

/// Tracks attempts and hands out exponentially growing delays
#[derive(Debug)]
pub struct Backoff {
    config: RetryConfig,
    attempt: u32,
    delay: Duration,
}

impl Backoff {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            config: config.clone(),
            attempt: 1,
            delay: config.initial_delay,
        }
    }

    /// Attempt currently running (1-based)
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Delay to wait before the next attempt, or `None` once attempts are exhausted
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.config.max_attempts {
            return None;
        }

        let current = self.delay;
        self.attempt += 1;
        self.delay = Duration::from_millis(
            ((self.delay.as_millis() as f64) * self.config.multiplier) as u64
        )
        .min(self.config.max_delay);

        Some(current)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
