use docqa_core::{RagError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Exponential backoff for rate limits and transient network failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

impl RetryPolicy {
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(16),
        }
    }

    pub fn none() -> Self {
        Self::new(0)
    }

    /// `min(base_delay * 2^attempt, max_delay)`
    pub fn backoff(&self, attempt: usize) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(31) as u32).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    fn delay_for(&self, err: &RagError, attempt: usize) -> Duration {
        match err {
            RagError::RateLimited {
                retry_after: Some(after),
                ..
            } => *after,
            _ => self.backoff(attempt),
        }
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or retries run out
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    let delay = self.delay_for(&err, attempt);
                    warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        what,
                        attempt + 1,
                        self.max_retries + 1,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast(max_retries: usize) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(5);
        assert_eq!(policy.backoff(0), Duration::from_millis(500));
        assert_eq!(policy.backoff(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff(3), Duration::from_millis(4000));
        assert_eq!(policy.backoff(10), Duration::from_secs(16));
        assert_eq!(policy.backoff(200), Duration::from_secs(16));
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let calls = AtomicUsize::new(0);
        let result = fast(3)
            .run("embed", || async {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(RagError::TransientNetwork("connection reset".into()))
                } else {
                    Ok(42)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_auth_error_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<()> = fast(3)
            .run("embed", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(RagError::AuthenticationFailed("bad key".into()))
            })
            .await;
        assert!(matches!(result, Err(RagError::AuthenticationFailed(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicUsize::new(0);
        let result: Result<()> = fast(2)
            .run("embed", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(RagError::RateLimited {
                    retry_after: Some(Duration::from_millis(1)),
                    message: "slow down".into(),
                })
            })
            .await;
        assert!(matches!(result, Err(RagError::RateLimited { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
