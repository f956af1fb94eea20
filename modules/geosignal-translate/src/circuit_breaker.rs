use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Per-provider circuit breaker (§4.4, §5): after `threshold` consecutive
/// failures the provider is skipped for `cooldown`, then probed again.
/// State is two atomics (CAS-style updates, as §5 calls for) rather than a
/// mutex-guarded enum — the breaker is checked on every translation call
/// and must never block a caller behind a lock.
pub struct CircuitBreaker {
    threshold: u32,
    cooldown: Duration,
    consecutive_failures: AtomicU32,
    opened_at_epoch_secs: AtomicU64,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self {
            threshold,
            cooldown,
            consecutive_failures: AtomicU32::new(0),
            opened_at_epoch_secs: AtomicU64::new(0),
        }
    }

    /// Whether this provider should be skipped right now.
    pub fn is_open(&self) -> bool {
        let failures = self.consecutive_failures.load(Ordering::SeqCst);
        if failures < self.threshold {
            return false;
        }
        let opened_at = self.opened_at_epoch_secs.load(Ordering::SeqCst);
        let elapsed = now_epoch_secs().saturating_sub(opened_at);
        elapsed < self.cooldown.as_secs()
    }

    pub fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::SeqCst);
    }

    pub fn record_failure(&self) {
        let failures = self.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1;
        // Re-stamp on every failure once past the threshold, not only the
        // one that first crosses it — otherwise a failing post-cooldown
        // probe (which pushes `failures` past `threshold` again without
        // ever landing exactly on it) leaves `opened_at` stale and the
        // breaker never re-opens.
        if failures >= self.threshold {
            self.opened_at_epoch_secs.store(now_epoch_secs(), Ordering::SeqCst);
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::SeqCst)
    }
}

fn now_epoch_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_after_threshold_consecutive_failures() {
        let breaker = CircuitBreaker::new(3, Duration::from_secs(60));
        for _ in 0..2 {
            breaker.record_failure();
            assert!(!breaker.is_open());
        }
        breaker.record_failure();
        assert!(breaker.is_open());
    }

    #[test]
    fn success_resets_the_failure_count() {
        let breaker = CircuitBreaker::new(2, Duration::from_secs(60));
        breaker.record_failure();
        breaker.record_success();
        breaker.record_failure();
        assert!(!breaker.is_open());
    }

    #[test]
    fn reopens_after_a_failing_probe_past_the_cooldown() {
        let breaker = CircuitBreaker::new(2, Duration::from_secs(60));
        breaker.record_failure();
        breaker.record_failure();
        assert!(breaker.is_open());

        // Backdate opened_at to simulate the cooldown window having elapsed.
        breaker.opened_at_epoch_secs.store(now_epoch_secs() - 61, Ordering::SeqCst);
        assert!(!breaker.is_open(), "cooldown elapsed, provider should be probed again");

        // The probe fails: failures is pushed past threshold without ever
        // landing exactly on it again.
        breaker.record_failure();
        assert!(
            breaker.is_open(),
            "opened_at must be re-stamped so the breaker skips the provider for another cooldown window"
        );
    }
}
