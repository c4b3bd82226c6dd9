//! Upload retry configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upload coordinator settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Retry policy for transient storage failures.
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Bounded exponential backoff for transient storage failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Delay before the first retry; doubles for each following retry.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl RetryConfig {
    /// Delays between attempts: `base, 2*base, 4*base, ...`, one fewer than
    /// the number of attempts.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let base = Duration::from_millis(self.base_delay_ms);
        std::iter::successors(Some(base), |d| d.checked_mul(2))
            .take(self.max_attempts.saturating_sub(1))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_max_attempts() -> usize {
    3
}

fn default_base_delay_ms() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delays() {
        let delays: Vec<_> = RetryConfig::default().delays().collect();
        assert_eq!(
            delays,
            vec![Duration::from_millis(300), Duration::from_millis(600)]
        );
    }

    #[test]
    fn test_single_attempt_has_no_delays() {
        let cfg = RetryConfig {
            max_attempts: 1,
            base_delay_ms: 300,
        };
        assert_eq!(cfg.delays().count(), 0);
    }
}
