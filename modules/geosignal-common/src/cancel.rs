use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A single stop signal shared by every worker pool (§5: "every worker
/// honors a single stop signal"). Cheap to clone and check; workers poll it
/// between suspension points rather than being forcibly preempted.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Wait up to `grace` for in-flight work to finish after cancellation,
    /// polling `still_running`. Used by pools that drain in-flight requests
    /// before aborting (§4.3, §4.8: "graceful shutdown drains in-flight jobs
    /// up to a grace window").
    pub async fn drain(&self, grace: Duration, still_running: impl Fn() -> bool) {
        let deadline = tokio::time::Instant::now() + grace;
        while still_running() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        assert!(!CancelToken::new().is_cancelled());
    }

    #[test]
    fn cancel_is_visible_across_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
