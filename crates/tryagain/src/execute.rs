//! Helpers that run the operation inside the retry loop.

use crate::error::{Result, RetryError};
use crate::interval::IntervalCalculator;
use crate::retry::Retry;
use crate::signal::StopReason;
use std::future::Future;
use tracing::debug;

impl<C: IntervalCalculator> Retry<C> {
    /// Run `operation` until it succeeds or the driver stops.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::atomic::{AtomicU32, Ordering};
    /// use std::time::Duration;
    /// use tryagain::{ConstantOptions, Retry};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let calls = AtomicU32::new(0);
    /// let mut retry = Retry::constant(ConstantOptions {
    ///     interval: Some(Duration::from_millis(1)),
    ///     max_attempts: 5,
    ///     ..Default::default()
    /// });
    ///
    /// let calls = &calls;
    /// let value = retry
    ///     .execute(|| async move {
    ///         if calls.fetch_add(1, Ordering::SeqCst) < 2 {
    ///             Err(std::io::Error::other("not yet"))
    ///         } else {
    ///             Ok(42)
    ///         }
    ///     })
    ///     .await
    ///     .unwrap();
    ///
    /// assert_eq!(value, 42);
    /// assert_eq!(calls.load(Ordering::SeqCst), 3);
    /// # }
    /// ```
    pub async fn execute<F, Fut, T, E>(&mut self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        self.execute_when(operation, |_| true).await
    }

    /// Like [`execute`](Self::execute), but gives up as soon as
    /// `should_retry` rejects an error.
    pub async fn execute_when<F, Fut, T, E, P>(
        &mut self,
        mut operation: F,
        mut should_retry: P,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        P: FnMut(&E) -> bool,
    {
        let mut runs = 0;
        let mut last_error = None;

        while self.next().await {
            runs += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if !should_retry(&err) => {
                    debug!(attempt = runs, "operation failed with a non-retryable error");
                    return Err(RetryError::NonRetryable {
                        attempts: runs,
                        source: err,
                    });
                }
                Err(err) => {
                    debug!(attempt = runs, "operation failed, retrying");
                    last_error = Some(err);
                }
            }
        }

        let reason = self.stop_reason().unwrap_or(StopReason::AttemptsExhausted);
        Err(match last_error {
            Some(source) => RetryError::Stopped {
                attempts: runs,
                reason,
                source,
            },
            None => RetryError::AlreadyStopped(reason),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{ConstantOptions, Retry, RetryError, StopReason, StopSignal};
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn fast(max_attempts: u32) -> Retry<crate::interval::Constant> {
        Retry::constant(ConstantOptions {
            interval: Some(Duration::from_millis(1)),
            max_attempts,
            ..Default::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success() {
        let mut retry = fast(3);
        let result = retry.execute(|| async { Ok::<_, io::Error>(42) }).await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(retry.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_third_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));
        let mut retry = fast(5);

        let result = retry
            .execute(|| {
                let attempts = Arc::clone(&attempts);
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(io::Error::other("retry me"))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_attempts_exceeded() {
        let attempts = Arc::new(AtomicU32::new(0));
        let mut retry = fast(3);

        let result = retry
            .execute(|| {
                let attempts = Arc::clone(&attempts);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(io::Error::other("always fail"))
                }
            })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts(), 3);
        assert_eq!(err.stop_reason(), Some(StopReason::AttemptsExhausted));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_predicate_stops_early() {
        let attempts = Arc::new(AtomicU32::new(0));
        let mut retry = fast(5);

        let result = retry
            .execute_when(
                || {
                    let attempts = Arc::clone(&attempts);
                    async move {
                        attempts.fetch_add(1, Ordering::SeqCst);
                        Err::<(), _>(io::Error::other("auth failed"))
                    }
                },
                |err| err.to_string().contains("network"),
            )
            .await;

        assert!(matches!(
            result,
            Err(RetryError::NonRetryable { attempts: 1, .. })
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_reported() {
        let mut retry = Retry::constant(ConstantOptions {
            signal: Some(StopSignal::timeout(Duration::from_millis(10))),
            interval: Some(Duration::from_millis(4)),
            ..Default::default()
        });

        let err = retry
            .execute(|| async { Err::<(), _>(io::Error::other("timeout")) })
            .await
            .unwrap_err();

        assert_eq!(err.stop_reason(), Some(StopReason::DeadlineExceeded));
        assert_eq!(err.attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_driver_does_not_run_operation() {
        let mut retry = fast(1);
        assert!(retry.next().await);
        assert!(!retry.next().await);

        let err = retry
            .execute(|| async { Ok::<_, io::Error>(1) })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RetryError::AlreadyStopped(StopReason::AttemptsExhausted)
        ));
    }
}
