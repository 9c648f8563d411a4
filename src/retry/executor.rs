//! Retry Executor Module
//!
//! Re-invokes a failing async operation with exponentially growing waits.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::retry::RetryPolicy;

// == Failed Attempt ==
/// Details of one failed attempt, handed to retry observers along with the
/// error itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FailedAttempt {
    /// 1-based number of the attempt that failed
    pub attempt: u32,
    pub max_attempts: u32,
    /// Wait before the next attempt, `None` when retries are exhausted
    pub next_delay: Option<Duration>,
}

// == Execute ==
/// Runs `operation` until it succeeds or `policy.max_attempts()` is reached.
///
/// Attempts are strictly sequential. On exhaustion the last error is
/// returned unchanged. Every failed attempt is logged.
pub async fn execute<T, E, F, Fut>(policy: &RetryPolicy, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    execute_observed(policy, operation, |_, _| {}).await
}

/// Like [`execute`], also reporting each failed attempt to `observer`.
pub async fn execute_observed<T, E, F, Fut, O>(
    policy: &RetryPolicy,
    mut operation: F,
    mut observer: O,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    O: FnMut(&FailedAttempt, &E),
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;

    loop {
        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        let next_delay = policy.delay_before(attempt + 1);
        observer(
            &FailedAttempt {
                attempt,
                max_attempts,
                next_delay,
            },
            &error,
        );

        let Some(delay) = next_delay else {
            warn!(
                attempt,
                max_attempts,
                error = %error,
                "operation failed, retries exhausted"
            );
            return Err(error);
        };

        warn!(
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "operation failed, retrying"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use tokio::time::Instant;

    use crate::error::NavCacheError;

    fn policy(max_attempts: u32, initial_ms: u64, factor: f64) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(initial_ms), factor).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_try_does_not_retry() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, NavCacheError> = execute(&policy(3, 100, 2.0), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_second_attempt() {
        let calls = AtomicU32::new(0);

        let result = execute(&policy(3, 100, 2.0), || async {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 1 {
                Err(NavCacheError::Internal("flaky".to_string()))
            } else {
                Ok(42)
            }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_is_bounded_and_error_unchanged() {
        let calls = AtomicU32::new(0);
        let original = NavCacheError::load_failed("coach", "timeout");

        let result: Result<(), NavCacheError> = execute(&policy(3, 100, 2.0), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(original.clone())
        })
        .await;

        assert_eq!(result, Err(original));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_delays_between_attempts() {
        let started = Instant::now();
        let stamps = Arc::new(std::sync::Mutex::new(Vec::new()));

        let recorded = stamps.clone();
        let _: Result<(), &str> = execute(&policy(3, 100, 2.0), move || {
            let recorded = recorded.clone();
            async move {
                recorded.lock().unwrap().push(started.elapsed());
                Err("down")
            }
        })
        .await;

        let stamps = stamps.lock().unwrap();
        assert_eq!(stamps.len(), 3);
        assert_eq!(stamps[1] - stamps[0], Duration::from_millis(100));
        assert_eq!(stamps[2] - stamps[1], Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_policy_never_sleeps() {
        let started = Instant::now();
        let result: Result<(), &str> = execute(&RetryPolicy::no_retry(), || async { Err("nope") }).await;

        assert_eq!(result, Err("nope"));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_sees_every_failure() {
        let mut seen = Vec::new();

        let _: Result<(), &str> = execute_observed(
            &policy(3, 50, 3.0),
            || async { Err("boom") },
            |failed, error| {
                assert_eq!(*error, "boom");
                seen.push((failed.attempt, failed.next_delay));
            },
        )
        .await;

        assert_eq!(
            seen,
            vec![
                (1, Some(Duration::from_millis(50))),
                (2, Some(Duration::from_millis(150))),
                (3, None),
            ]
        );
    }
}
