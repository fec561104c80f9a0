//! Bounded retry for candidate selection
//!
//! The search endpoint returns a random photo, which is sometimes not a JPEG.
//! Such a rejection is retried with a fresh request, up to a fixed number of
//! attempts. Errors are never retried: they end the loop immediately.
//!
//! # Example
//!
//! ```no_run
//! use catfetch::retry::{RetryOutcome, retry_until_accepted};
//!
//! # async fn example() -> Result<(), std::io::Error> {
//! let outcome = retry_until_accepted(5, |attempt| async move {
//!     // Accept the third candidate
//!     Ok::<_, std::io::Error>((attempt == 3).then_some("photo"))
//! })
//! .await?;
//! assert!(matches!(outcome, RetryOutcome::Accepted { attempts: 3, .. }));
//! # Ok(())
//! # }
//! ```

use std::future::Future;

/// Total search attempts a task makes before settling on "no candidate found"
pub const MAX_CANDIDATE_ATTEMPTS: u32 = 5;

/// Result of a bounded retry loop that did not error
#[derive(Debug, PartialEq, Eq)]
pub enum RetryOutcome<T> {
    /// An attempt produced an acceptable value
    Accepted {
        /// The accepted value
        value: T,
        /// Attempts made, including the accepted one
        attempts: u32,
    },
    /// Every attempt was rejected
    Exhausted {
        /// Attempts made
        attempts: u32,
    },
}

/// Run `operation` until it yields `Some`, at most `max_attempts` times
///
/// `operation` receives the 1-based attempt number. `Ok(None)` means the
/// attempt was rejected and another is made; `Err` is returned at once.
pub async fn retry_until_accepted<F, Fut, T, E>(
    max_attempts: u32,
    mut operation: F,
) -> Result<RetryOutcome<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    while attempt < max_attempts {
        attempt += 1;

        match operation(attempt).await {
            Ok(Some(value)) => {
                if attempt > 1 {
                    tracing::debug!(attempts = attempt, "candidate accepted after retry");
                }
                return Ok(RetryOutcome::Accepted {
                    value,
                    attempts: attempt,
                });
            }
            Ok(None) => {
                tracing::debug!(attempt, max_attempts, "candidate rejected, retrying");
            }
            Err(e) => {
                tracing::debug!(error = %e, attempt, "attempt failed with non-retryable error");
                return Err(e);
            }
        }
    }

    tracing::warn!(attempts = attempt, "no acceptable candidate after all attempts");
    Ok(RetryOutcome::Exhausted { attempts: attempt })
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct TestError;

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "test error")
        }
    }

    #[tokio::test]
    async fn test_accept_first_attempt() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_until_accepted(MAX_CANDIDATE_ATTEMPTS, |_| {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, TestError>(Some(42))
            }
        })
        .await
        .unwrap();

        assert_eq!(
            result,
            RetryOutcome::Accepted {
                value: 42,
                attempts: 1
            }
        );
        assert_eq!(counter.load(Ordering::SeqCst), 1, "should only call once");
    }

    #[tokio::test]
    async fn test_reject_then_accept() {
        let result = retry_until_accepted(MAX_CANDIDATE_ATTEMPTS, |attempt| async move {
            Ok::<_, TestError>((attempt == 4).then_some("ok"))
        })
        .await
        .unwrap();

        assert_eq!(
            result,
            RetryOutcome::Accepted {
                value: "ok",
                attempts: 4
            }
        );
    }

    #[tokio::test]
    async fn test_exhausted_after_max_attempts() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_until_accepted(MAX_CANDIDATE_ATTEMPTS, |_| {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<Option<()>, TestError>(None)
            }
        })
        .await
        .unwrap();

        assert_eq!(result, RetryOutcome::Exhausted { attempts: 5 });
        assert_eq!(
            counter.load(Ordering::SeqCst),
            5,
            "should make exactly five attempts"
        );
    }

    #[tokio::test]
    async fn test_error_is_not_retried() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_until_accepted(MAX_CANDIDATE_ATTEMPTS, |attempt| {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if attempt == 2 {
                    Err(TestError)
                } else {
                    Ok::<Option<()>, _>(None)
                }
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(
            counter.load(Ordering::SeqCst),
            2,
            "error on second attempt should stop the loop"
        );
    }

    #[tokio::test]
    async fn test_zero_attempts_is_exhausted() {
        let result =
            retry_until_accepted(0, |_| async { Ok::<_, TestError>(Some(1)) }).await.unwrap();
        assert_eq!(result, RetryOutcome::Exhausted { attempts: 0 });
    }
}
