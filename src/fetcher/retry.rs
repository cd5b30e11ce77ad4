use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded backoff policy for rate-limited requests.
///
/// The wait before retrying attempt `n` (0-based) is
/// `min(cap, base * 2^n)` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_secs: u64,
    pub cap_secs: u64,
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let secs = self.base_delay_secs.saturating_mul(factor).min(self.cap_secs);
        Duration::from_secs(secs)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 5,
            cap_secs: 30,
        }
    }
}
