//! Retry executor for backend calls.
//!
//! The policy comes from configuration; adapters never retry on their own.

use std::future::Future;

use ci_core::ports::ApiError;
use ci_core::RetryPolicy;
use tracing::{error, warn};

pub async fn execute_with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    op: &str,
    mut action: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 1;
    loop {
        match action().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_retryable() || !policy.allows_retry_after(attempt) {
                    if attempt > 1 {
                        error!(op, attempts = attempt, error = %err, "request failed after retries");
                    }
                    return Err(err);
                }
                let backoff = policy.backoff_for(attempt);
                warn!(op, attempt, error = %err, ?backoff, "request failed, retrying");
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn default_policy_makes_a_single_attempt() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), ApiError> =
            execute_with_retry(&RetryPolicy::default(), "check", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Timeout)
            })
            .await;

        assert_eq!(result, Err(ApiError::Timeout));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_errors_until_success() {
        let calls = &AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        let result = execute_with_retry(&policy, "upload", move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(ApiError::Network("reset".into()))
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_rejections() {
        let calls = &AtomicU32::new(0);
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let result: Result<(), ApiError> = execute_with_retry(&policy, "register", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::Rejected("email taken".into()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
