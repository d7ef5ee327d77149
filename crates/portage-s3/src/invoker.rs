//! Resilient asynchronous call layer over the storage connector.
//!
//! The provisioner and data plane never call the connector directly for
//! multi-step workflows; they go through a [`ResilientInvoker`], which
//! applies the configured [`RetryConfig`] to every call and emits progress
//! events for the observability subscriber.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::connector::StorageConnector;
use crate::retry::RetryConfig;
use crate::{Result, TRACING_TARGET_BUCKETS, TRACING_TARGET_OBJECTS};

/// Wraps storage connector calls with a retry policy.
///
/// Two call shapes are exposed: [`get`](Self::get) for value-returning calls
/// and [`run`](Self::run) for completion-only calls, mirroring how callers
/// compose multi-step workflows. Cloning shares the connector and policy.
#[derive(Clone)]
pub struct ResilientInvoker {
    connector: Arc<dyn StorageConnector>,
    retry: RetryConfig,
}

impl ResilientInvoker {
    /// Creates an invoker over `connector` with the given retry policy.
    pub fn new(connector: Arc<dyn StorageConnector>, retry: RetryConfig) -> Self {
        Self { connector, retry }
    }

    /// Returns the wrapped connector.
    pub fn connector(&self) -> &Arc<dyn StorageConnector> {
        &self.connector
    }

    /// Returns the retry policy in effect.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Invokes a value-returning operation under the retry policy.
    pub async fn get<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.retry.retry(operation).await
    }

    /// Invokes a completion-only operation under the retry policy.
    pub async fn run<F, Fut>(&self, operation: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        self.retry.retry(operation).await
    }

    /// Checks bucket existence, retried per policy.
    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        debug!(
            target: TRACING_TARGET_BUCKETS,
            bucket = %bucket,
            "Invoking bucket existence check"
        );
        self.get(|| self.connector.bucket_exists(bucket)).await
    }

    /// Creates a bucket, retried per policy.
    pub async fn create_bucket(&self, bucket: &str) -> Result<()> {
        debug!(
            target: TRACING_TARGET_BUCKETS,
            bucket = %bucket,
            "Invoking bucket creation"
        );
        self.run(|| self.connector.create_bucket(bucket)).await
    }

    /// Deletes a bucket, retried per policy.
    pub async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        debug!(
            target: TRACING_TARGET_BUCKETS,
            bucket = %bucket,
            "Invoking bucket deletion"
        );
        self.run(|| self.connector.delete_bucket(bucket)).await
    }

    /// Lists objects by prefix, retried per policy.
    pub async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            prefix = %prefix,
            "Invoking object listing"
        );
        self.get(|| self.connector.list_objects(bucket, prefix)).await
    }

    /// Batch-deletes objects, retried per policy.
    pub async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<()> {
        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            count = keys.len(),
            "Invoking batch object deletion"
        );
        self.run(|| self.connector.delete_objects(bucket, keys.clone()))
            .await
    }
}

impl std::fmt::Debug for ResilientInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientInvoker")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::mock::MockConnector;

    fn invoker(connector: MockConnector) -> ResilientInvoker {
        ResilientInvoker::new(
            Arc::new(connector),
            RetryConfig::new(2, Duration::from_millis(1)),
        )
    }

    #[tokio::test]
    async fn test_get_returns_value() {
        let connector = MockConnector::new().with_bucket("transfer-bucket");
        let invoker = invoker(connector);

        assert!(invoker.bucket_exists("transfer-bucket").await.unwrap());
        assert!(!invoker.bucket_exists("other-bucket").await.unwrap());
    }

    #[tokio::test]
    async fn test_run_retries_transient_failures() {
        let connector = MockConnector::new().failing_times("create_bucket", 2);
        let invoker = invoker(connector.clone());

        invoker.create_bucket("transfer-bucket").await.unwrap();

        // Two injected failures plus the successful attempt
        assert_eq!(connector.call_count("create_bucket"), 3);
    }

    #[tokio::test]
    async fn test_run_surfaces_exhausted_failures() {
        let connector = MockConnector::new().failing_times("create_bucket", 5);
        let invoker = invoker(connector);

        let result = invoker.create_bucket("transfer-bucket").await;
        assert!(result.is_err());
    }
}
