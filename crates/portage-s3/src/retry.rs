//! Retry policy for storage operations.

use std::time::Duration;

use crate::{Error, Result, TRACING_TARGET_RETRY};

/// Configuration for retry behavior on failed storage calls.
///
/// The policy bounds the number of attempts per call but imposes no overall
/// deadline; callers needing one must wrap the returned future externally.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 means no retries)
    pub max_attempts: u32,
    /// Initial backoff duration
    pub initial_backoff: Duration,
    /// Maximum backoff duration
    pub max_backoff: Duration,
    /// Backoff multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration.
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            max_backoff: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }

    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 0,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Set the maximum backoff duration.
    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Set the backoff multiplier.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculate the backoff duration for a given attempt number.
    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let backoff_millis = (self.initial_backoff.as_millis() as f64)
            * self.backoff_multiplier.powi(attempt as i32);
        let backoff = Duration::from_millis(backoff_millis as u64);
        backoff.min(self.max_backoff)
    }

    /// Retry an async operation according to this configuration.
    ///
    /// Errors whose [`Error::is_retryable`] is false surface immediately;
    /// retryable errors are retried with exponential backoff until the
    /// attempt limit is exhausted.
    pub async fn retry<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        self.retry_if(operation, Error::is_retryable).await
    }

    /// Retry an async operation with a custom retry predicate.
    ///
    /// The predicate decides, per error, whether another attempt is made.
    pub async fn retry_if<F, Fut, T, P>(&self, mut operation: F, mut should_retry: P) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
        P: FnMut(&Error) -> bool,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !should_retry(&err) {
                        tracing::debug!(
                            target: TRACING_TARGET_RETRY,
                            error = %err,
                            "Non-retryable error, failing immediately"
                        );
                        return Err(err);
                    }

                    last_error = Some(err);

                    // Don't sleep after the last attempt
                    if attempt < self.max_attempts {
                        let backoff = self.calculate_backoff(attempt);
                        tracing::debug!(
                            target: TRACING_TARGET_RETRY,
                            attempt = attempt + 1,
                            max_attempts = self.max_attempts,
                            backoff_ms = backoff.as_millis(),
                            "Retrying operation after backoff"
                        );
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        // All retries exhausted
        Err(last_error
            .unwrap_or_else(|| Error::Config("All retry attempts exhausted".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn transient() -> Error {
        Error::Io(std::io::Error::other("connection reset"))
    }

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.initial_backoff, Duration::from_millis(100));
        assert_eq!(config.backoff_multiplier, 2.0);
    }

    #[test]
    fn test_no_retry() {
        let config = RetryConfig::no_retry();
        assert_eq!(config.max_attempts, 0);
    }

    #[test]
    fn test_backoff_calculation() {
        let config = RetryConfig::default();

        assert_eq!(config.calculate_backoff(0), Duration::from_millis(100));
        assert_eq!(config.calculate_backoff(1), Duration::from_millis(200));
        assert_eq!(config.calculate_backoff(2), Duration::from_millis(400));
    }

    #[test]
    fn test_max_backoff_caps_growth() {
        let config = RetryConfig::default().with_max_backoff(Duration::from_millis(300));

        assert_eq!(config.calculate_backoff(2), Duration::from_millis(300));
    }

    #[test]
    fn test_builder_methods() {
        let config = RetryConfig::new(5, Duration::from_millis(50))
            .with_max_backoff(Duration::from_secs(1))
            .with_multiplier(3.0);

        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.initial_backoff, Duration::from_millis(50));
        assert_eq!(config.max_backoff, Duration::from_secs(1));
        assert_eq!(config.backoff_multiplier, 3.0);
    }

    #[tokio::test]
    async fn test_retry_success_on_first_attempt() {
        let config = RetryConfig::default();
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = config
            .retry(|| {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Error>(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_retries() {
        let config = RetryConfig::default();
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = config
            .retry(|| {
                let calls = calls_clone.clone();
                async move {
                    let current = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    if current < 3 { Err(transient()) } else { Ok(42) }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_exhausts_attempts() {
        let config = RetryConfig::new(2, Duration::from_millis(1));
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result: Result<u32> = config
            .retry(|| {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(transient())
                }
            })
            .await;

        assert!(result.is_err());
        // Initial attempt plus two retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_non_retryable_error() {
        let config = RetryConfig::default();
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result: Result<u32> = config
            .retry(|| {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(Error::validation("bucketName"))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
