use rand::Rng;
use std::time::Duration;

/// Exponential backoff with jitter for transient fetch failures (§4.3).
/// `base_delay` doubles each attempt up to `max_delay`; jitter is applied as
/// a uniform random factor in `[0.5, 1.5)` so retrying workers don't
/// synchronize on the same host.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self { max_attempts, base_delay, max_delay }
    }

    /// Backoff delay before the given attempt (1-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        let raw = self.base_delay.as_millis().saturating_mul(1u128 << exp);
        let capped = raw.min(self.max_delay.as_millis());
        let jitter = rand::thread_rng().gen_range(0.5..1.5);
        Duration::from_millis((capped as f64 * jitter) as u64)
    }

    pub fn should_retry(&self, attempt: u32, status: Option<u16>) -> bool {
        if attempt >= self.max_attempts {
            return false;
        }
        match status {
            Some(code) if (400..500).contains(&code) => false,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_not_retry_client_errors() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry(1, Some(404)));
        assert!(!policy.should_retry(1, Some(429)));
    }

    #[test]
    fn retries_server_errors_until_max_attempts() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(1, Some(503)));
        assert!(policy.should_retry(2, Some(503)));
        assert!(!policy.should_retry(3, Some(503)));
    }

    #[test]
    fn delay_grows_but_stays_capped() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100), Duration::from_millis(400));
        for attempt in 1..=5 {
            let delay = policy.delay_for_attempt(attempt);
            assert!(delay.as_millis() <= 600);
        }
    }
}
