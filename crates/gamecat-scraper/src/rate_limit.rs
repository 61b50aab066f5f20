//! Retry utilities for outbound catalog requests.
//!
//! Provides exponential backoff with jitter for transient HTTP errors such as
//! 429 and 5xx responses. Non-retriable errors (parse failures, 404s, missing
//! elements) are propagated immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Upper bound on a single backoff sleep.
const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable:
/// - [`ScraperError::RateLimited`]: HTTP 429.
/// - [`ScraperError::Http`]: network-level failure (connection reset, timeout).
/// - [`ScraperError::UnexpectedStatus`] with a 5xx status.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// The n-th retry sleeps `backoff_base_secs * 2^(n-1)` seconds ±25 % jitter,
/// capped at 60 s. A 429 carrying a longer `Retry-After` waits for that
/// instead. With `max_retries = 3` the operation runs at most 4 times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let computed_ms = backoff_base_secs
            .saturating_mul(1000)
            .saturating_mul(1u64 << attempt.min(20));
        let requested_ms = match &err {
            ScraperError::RateLimited {
                retry_after_secs, ..
            } => retry_after_secs.saturating_mul(1000),
            _ => 0,
        };
        let capped = computed_ms.max(requested_ms).min(MAX_DELAY_MS);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;

        attempt += 1;
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms,
            error = %err,
            "transient catalog error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited() -> ScraperError {
        ScraperError::RateLimited {
            host: "catalog.example.com".to_owned(),
            retry_after_secs: 0,
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScraperError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_on_rate_limited_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(rate_limited())
                } else {
                    Ok::<u32, ScraperError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_server_errors() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(1, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(ScraperError::UnexpectedStatus {
                    status: 503,
                    url: "https://catalog.example.com/v1/catalog".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(ScraperError::NotFound {
                    url: "https://catalog.example.com/v1/catalog".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScraperError::NotFound { .. })));
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(2, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(rate_limited())
            }
        })
        .await;
        // max_retries=2 → 3 total attempts
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(ScraperError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_deserialize_error() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                let e = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
                Err::<u32, ScraperError>(ScraperError::Deserialize {
                    context: "test".to_owned(),
                    source: e,
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScraperError::Deserialize { .. })));
    }
}
