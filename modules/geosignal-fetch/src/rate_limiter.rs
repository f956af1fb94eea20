use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A single host's token bucket. Refills continuously at `qps` tokens/second,
/// capped at `qps` tokens of burst. `try_acquire` never blocks; callers that
/// are starved are expected to yield and retry (§4.3).
struct Bucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
}

impl Bucket {
    fn new(qps: u32) -> Self {
        let capacity = (qps.max(1)) as f64;
        Self { capacity, tokens: capacity, refill_per_sec: capacity, last_refill: Instant::now() }
    }

    fn try_acquire(&mut self) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Per-host token bucket rate limiter (§4.3). Shared across fetcher workers;
/// internally synchronized with a plain mutex since acquisition is a cheap,
/// non-blocking arithmetic check, not an I/O call.
pub struct HostRateLimiter {
    qps_per_host: u32,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl HostRateLimiter {
    pub fn new(qps_per_host: u32) -> Self {
        Self { qps_per_host, buckets: Mutex::new(HashMap::new()) }
    }

    /// Non-blocking check. Returns `true` if a token was acquired.
    pub fn try_acquire(&self, host: &str) -> bool {
        let mut buckets = self.buckets.lock().expect("rate limiter mutex poisoned");
        let bucket = buckets.entry(host.to_string()).or_insert_with(|| Bucket::new(self.qps_per_host));
        bucket.try_acquire()
    }

    /// Wait (yielding cooperatively) until a token becomes available.
    pub async fn acquire(&self, host: &str) {
        loop {
            if self.try_acquire(host) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_exhausts_after_capacity_requests() {
        let limiter = HostRateLimiter::new(2);
        assert!(limiter.try_acquire("example.com"));
        assert!(limiter.try_acquire("example.com"));
        assert!(!limiter.try_acquire("example.com"));
    }

    #[test]
    fn different_hosts_have_independent_buckets() {
        let limiter = HostRateLimiter::new(1);
        assert!(limiter.try_acquire("a.example"));
        assert!(limiter.try_acquire("b.example"));
    }
}
