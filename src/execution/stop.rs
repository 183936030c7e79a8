use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tokio::time::Duration;

/// Cooperative stop request shared between the session and its controllers
/// (Ctrl+C handler, operator commands, tests)
#[derive(Clone, Default)]
pub struct StopSignal {
    inner: Arc<StopInner>,
}

#[derive(Default)]
struct StopInner {
    requested: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the session to stop; wakes any pending `sleep`
    pub fn request(&self) {
        self.inner.requested.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    /// Sleep for `duration` unless a stop arrives first
    ///
    /// Returns `true` if the full duration elapsed without a stop request.
    pub async fn sleep(&self, duration: Duration) -> bool {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent request is not missed
        notified.as_mut().enable();

        if self.is_requested() {
            return false;
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => !self.is_requested(),
            _ = notified => false,
        }
    }
}

impl std::fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopSignal")
            .field("requested", &self.is_requested())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_sleep_completes_without_stop() {
        let stop = StopSignal::new();
        assert!(stop.sleep(Duration::from_millis(5)).await);
        assert!(!stop.is_requested());
    }

    #[tokio::test]
    async fn test_request_wakes_sleeper() {
        let stop = StopSignal::new();
        let remote = stop.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            remote.request();
        });

        let started = Instant::now();
        let completed = stop.sleep(Duration::from_secs(30)).await;

        assert!(!completed);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(stop.is_requested());
    }

    #[tokio::test]
    async fn test_sleep_after_request_returns_immediately() {
        let stop = StopSignal::new();
        stop.request();
        assert!(!stop.sleep(Duration::from_secs(30)).await);
    }
}
