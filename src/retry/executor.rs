//! The retry loop.

use super::backoff::BackoffProvider;
use super::context::RetryContext;
use super::error::{OperationError, RetryError};
use std::future::Future;
use tracing::{debug, warn};

/// Runs `operation` until it completes.
///
/// Each attempt receives a clone of `ctx`. An attempt that returns
/// [`OperationError::NotDone`] is retried after the wait chosen by a fresh
/// policy from `provider`; [`OperationError::Failed`] ends the loop at once.
/// Cancellation is only observed while waiting: a running attempt always
/// finishes first.
pub async fn run<T, F, Fut>(
    ctx: &RetryContext,
    provider: &dyn BackoffProvider,
    mut operation: F,
) -> Result<T, RetryError>
where
    F: FnMut(RetryContext) -> Fut,
    Fut: Future<Output = Result<T, OperationError>>,
{
    let mut backoff = provider.backoff();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let cause = match operation(ctx.clone()).await {
            Ok(value) => return Ok(value),
            Err(OperationError::Failed { cause }) => return Err(RetryError::Failed { cause }),
            Err(OperationError::NotDone { cause }) => cause,
        };

        let Some(wait) = backoff.next_backoff() else {
            warn!(
                attempts = attempt,
                cause = ?cause.as_ref().map(|c| c.to_string()),
                "giving up on operation that is not done"
            );
            return Err(RetryError::Exhausted { cause });
        };

        debug!(
            attempt,
            wait_ms = wait.as_millis() as u64,
            cause = ?cause.as_ref().map(|c| c.to_string()),
            "operation not done, waiting before next attempt"
        );
        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = ctx.cancelled() => {
                warn!(attempts = attempt, "retry cancelled while waiting");
                return Err(RetryError::Cancelled);
            }
        }
    }
}
