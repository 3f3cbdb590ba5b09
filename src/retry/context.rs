//! Cooperative cancellation for retry loops.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

/// RetryContext is the cancellation signal a retry loop observes while it
/// waits between attempts. It is cheap to clone and is passed to every
/// attempt so nested calls can share it.
#[derive(Debug, Clone)]
pub struct RetryContext {
    cancelled: watch::Receiver<bool>,
    deadline: Option<Instant>,
}

/// CancelHandle cancels every clone of its [`RetryContext`].
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: std::sync::Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl RetryContext {
    /// Creates a cancellable context.
    pub fn new() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = RetryContext {
            cancelled: rx,
            deadline: None,
        };
        (ctx, CancelHandle { tx: std::sync::Arc::new(tx) })
    }

    /// A context that is never cancelled.
    pub fn background() -> Self {
        RetryContext::new().0
    }

    /// Derives a context that is also cancelled once `timeout` has passed.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        RetryContext {
            cancelled: self.cancelled.clone(),
            deadline: Some(self.deadline.map_or(deadline, |d| d.min(deadline))),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Completes once the context is cancelled or its deadline passes.
    pub async fn cancelled(&self) {
        let mut rx = self.cancelled.clone();
        let signalled = async move {
            loop {
                if *rx.borrow_and_update() {
                    return;
                }
                if rx.changed().await.is_err() {
                    // Every handle is gone; nobody can cancel any more.
                    std::future::pending::<()>().await;
                }
            }
        };
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = signalled => {}
                    _ = sleep_until(deadline) => {}
                }
            }
            None => signalled.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancel_reaches_clones() {
        let (ctx, handle) = RetryContext::new();
        let clone = ctx.clone();
        assert!(!clone.is_cancelled());
        handle.cancel();
        assert!(clone.is_cancelled());
        clone.cancelled().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline() {
        let ctx = RetryContext::background().with_timeout(Duration::from_secs(5));
        assert!(!ctx.is_cancelled());
        let start = Instant::now();
        ctx.cancelled().await;
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert!(ctx.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nested_timeout_keeps_earliest_deadline() {
        let outer = RetryContext::background().with_timeout(Duration::from_secs(2));
        let inner = outer.with_timeout(Duration::from_secs(10));
        assert_eq!(inner.deadline(), outer.deadline());
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_never_cancels() {
        let ctx = RetryContext::background();
        let waited = tokio::time::timeout(Duration::from_secs(60), ctx.cancelled()).await;
        assert!(waited.is_err());
    }
}
