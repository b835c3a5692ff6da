//! Bounded retry with randomized exponential backoff.
//!
//! A `RetryPolicy` is a plain value applied around a call site:
//!
//! ```ignore
//! let text = RetryPolicy::model_invocation()
//!     .run("redaction", || model.complete(&request))
//!     .await?;
//! ```
//!
//! Only errors for which `LlmError::is_transient` holds are retried. When the
//! attempt ceiling is reached the last error is returned wrapped in
//! `LlmError::RetriesExhausted`.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{error, warn};

use super::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero behaves like one.
    pub max_attempts: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Building the HTTP client: 3 attempts, 1–10 s backoff.
    pub const fn client_construction() -> Self {
        Self {
            max_attempts: 3,
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
        }
    }

    /// A single model call: 5 attempts, 1–10 s backoff.
    pub const fn model_invocation() -> Self {
        Self {
            max_attempts: 5,
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
        }
    }

    /// Upper bound of the wait before retry number `retry` (0-based):
    /// `min_backoff * 2^retry`, clamped to `[min_backoff, max_backoff]`.
    pub fn backoff_ceiling(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.min_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
            .max(self.min_backoff)
    }

    /// Wait before retry number `retry`, drawn uniformly from
    /// `[min_backoff, backoff_ceiling(retry)]`.
    pub fn backoff(&self, retry: u32) -> Duration {
        let high = self.backoff_ceiling(retry).as_millis() as u64;
        let low = (self.min_backoff.as_millis() as u64).min(high);
        if low == high {
            return Duration::from_millis(high);
        }
        Duration::from_millis(rand::thread_rng().gen_range(low..=high))
    }

    /// Runs `call` until it succeeds, fails permanently, or the attempt
    /// ceiling is reached.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_transient() => return Err(err),
                Err(err) if attempt >= max_attempts => {
                    error!("{operation} failed after {attempt} attempts: {err}");
                    return Err(LlmError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }
                Err(err) => {
                    let delay = self.backoff(attempt - 1);
                    warn!(
                        "{operation} attempt {attempt}/{max_attempts} failed ({err}), retrying after {}ms",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn api_error(status: u16) -> LlmError {
        LlmError::Api {
            status,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_backoff_ceiling_doubles_then_caps() {
        let policy = RetryPolicy::model_invocation();
        assert_eq!(policy.backoff_ceiling(0), Duration::from_secs(1));
        assert_eq!(policy.backoff_ceiling(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_ceiling(3), Duration::from_secs(8));
        assert_eq!(policy.backoff_ceiling(4), Duration::from_secs(10));
        assert_eq!(policy.backoff_ceiling(40), Duration::from_secs(10));
    }

    #[test]
    fn test_backoff_stays_within_bounds() {
        let policy = RetryPolicy::model_invocation();
        for retry in 0..12 {
            for _ in 0..50 {
                let delay = policy.backoff(retry);
                assert!(delay >= policy.min_backoff, "retry {retry}: {delay:?}");
                assert!(delay <= policy.backoff_ceiling(retry), "retry {retry}: {delay:?}");
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_transient_failures_then_success() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = RetryPolicy::model_invocation()
            .run("test", || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err(api_error(503))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // First wait is exactly 1s, second is drawn from [1s, 2s].
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2), "elapsed {elapsed:?}");
        assert!(elapsed <= Duration::from_secs(3), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_reports_attempts_and_last_error() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::model_invocation()
            .run("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(LlmError::EmptyContent) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        match result {
            Err(LlmError::RetriesExhausted { attempts, last }) => {
                assert_eq!(attempts, 5);
                assert!(matches!(*last, LlmError::EmptyContent));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_construction_ceiling_is_three() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::client_construction()
            .run("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(api_error(500)) }
            })
            .await;

        assert!(matches!(result, Err(LlmError::RetriesExhausted { attempts: 3, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_is_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::model_invocation()
            .run("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(api_error(401)) }
            })
            .await;

        assert!(matches!(result, Err(LlmError::Api { status: 401, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_calls_once() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::model_invocation()
        };

        let result = policy
            .run("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, LlmError>("ok") }
            })
            .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
