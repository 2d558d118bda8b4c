//! Reconnect delay policy.
//!
//! The delay grows with the attempt count, `base * attempts`, and plateaus at
//! `max` once either the product exceeds it or the attempt counter reaches its
//! cap. There is no give-up point: the client retries for as long as it runs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    #[serde(with = "millis")]
    pub base: Duration,
    #[serde(with = "millis")]
    pub max: Duration,
    pub max_attempts: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            max: Duration::from_millis(5000),
            max_attempts: 10,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Consecutive-failure counter.
#[derive(Clone, Debug, Default)]
pub struct Backoff {
    cfg: BackoffConfig,
    attempts: u32,
}

impl Backoff {
    pub fn new(cfg: BackoffConfig) -> Self {
        Self { cfg, attempts: 0 }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Record a failure and return the delay before the next attempt.
    pub fn next_delay(&mut self) -> Duration {
        self.attempts = self.attempts.saturating_add(1).min(self.cfg.max_attempts.max(1));
        self.cfg.base.saturating_mul(self.attempts).min(self.cfg.max)
    }

    /// A connection succeeded.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_with_failures_then_plateaus() {
        let mut b = Backoff::new(BackoffConfig::default());
        let delays: Vec<u64> = (0..14).map(|_| b.next_delay().as_millis() as u64).collect();
        assert_eq!(
            delays,
            [500, 1000, 1500, 2000, 2500, 3000, 3500, 4000, 4500, 5000, 5000, 5000, 5000, 5000]
        );
        assert_eq!(b.attempts(), 10);
    }

    #[test]
    fn attempt_cap_bounds_delay_below_max() {
        let cfg = BackoffConfig {
            base: Duration::from_millis(100),
            max: Duration::from_secs(60),
            max_attempts: 3,
        };
        let mut b = Backoff::new(cfg);
        for _ in 0..3 {
            b.next_delay();
        }
        for _ in 0..100 {
            assert_eq!(b.next_delay(), Duration::from_millis(300));
        }
    }

    #[test]
    fn reset_starts_over() {
        let mut b = Backoff::new(BackoffConfig::default());
        b.next_delay();
        b.next_delay();
        b.reset();
        assert_eq!(b.attempts(), 0);
        assert_eq!(b.next_delay(), Duration::from_millis(500));
    }

    #[test]
    fn config_serializes_as_millis() {
        let json = serde_json::to_value(BackoffConfig::default()).unwrap();
        assert_eq!(json["base"], 500);
        assert_eq!(json["max"], 5000);
        let back: BackoffConfig = serde_json::from_str(r#"{ "base": 250 }"#).unwrap();
        assert_eq!(back.base, Duration::from_millis(250));
        assert_eq!(back.max_attempts, 10);
    }
}
