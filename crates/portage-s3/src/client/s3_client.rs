//! High-level S3 client wrapper.

use std::sync::Arc;

use minio::s3::Client;
use minio::s3::creds::StaticProvider;
use minio::s3::types::S3Api;
use tracing::{debug, error, info, instrument};

use crate::{Error, Result, TRACING_TARGET_CLIENT};

use super::s3_config::S3Config;

/// Authenticated client for an S3-compatible store.
///
/// Wraps the minio client together with its configuration. Cloning is cheap;
/// clones share the underlying connection pool.
#[derive(Clone)]
pub struct S3Client {
    inner: Client,
    config: Arc<S3Config>,
}

impl S3Client {
    /// Creates a client from the provided configuration.
    ///
    /// Builds the client without testing connectivity; use
    /// [`new_with_test`](Self::new_with_test) to verify the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation or client construction
    /// fails.
    #[instrument(skip(config), target = TRACING_TARGET_CLIENT, fields(endpoint = %config.endpoint_masked()))]
    pub fn new(config: S3Config) -> Result<Self> {
        info!(target: TRACING_TARGET_CLIENT, "Initializing S3 client");

        config.validate().map_err(|e| {
            error!(target: TRACING_TARGET_CLIENT, error = %e, "Configuration validation failed");
            e
        })?;

        let provider = StaticProvider::from(config.credentials().clone());

        let endpoint = config.endpoint().to_string().parse().map_err(|e| {
            error!(target: TRACING_TARGET_CLIENT, error = %e, "Invalid endpoint URL");
            Error::Config(format!("Invalid endpoint URL: {}", e))
        })?;

        let provider = Box::new(provider);
        let inner = Client::new(endpoint, Some(provider), None, None).map_err(|e| {
            error!(target: TRACING_TARGET_CLIENT, error = %e, "Failed to create S3 client");
            Error::Config(format!("Failed to build S3 client: {}", e))
        })?;

        info!(
            target: TRACING_TARGET_CLIENT,
            endpoint = %config.endpoint_masked(),
            region = %config.region(),
            path_style = config.path_style,
            "S3 client initialized successfully"
        );

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Creates a client and verifies connectivity by listing buckets.
    ///
    /// # Errors
    ///
    /// Returns an error if construction fails or the connectivity probe does.
    #[instrument(skip(config), target = TRACING_TARGET_CLIENT, fields(endpoint = %config.endpoint_masked()))]
    pub async fn new_with_test(config: S3Config) -> Result<Self> {
        let client = Self::new(config)?;
        client.test_connection().await?;
        Ok(client)
    }

    /// Tests the connection by attempting to list buckets.
    ///
    /// # Errors
    ///
    /// Returns the underlying client error if the probe fails.
    #[instrument(skip(self), target = TRACING_TARGET_CLIENT)]
    pub async fn test_connection(&self) -> Result<()> {
        debug!(target: TRACING_TARGET_CLIENT, "Testing S3 connection");

        let start = std::time::Instant::now();
        let result = self.inner.list_buckets().send().await;
        let elapsed = start.elapsed();

        match result {
            Ok(_) => {
                debug!(
                    target: TRACING_TARGET_CLIENT,
                    elapsed = ?elapsed,
                    "Connection test successful"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_CLIENT,
                    error = %e,
                    elapsed = ?elapsed,
                    "Connection test failed"
                );
                Err(Error::Client(e))
            }
        }
    }

    /// Returns the region this client signs requests for.
    pub fn region(&self) -> &str {
        self.config.region()
    }

    /// Returns a reference to the inner client.
    #[inline]
    pub(crate) fn as_inner(&self) -> &Client {
        &self.inner
    }
}

impl std::fmt::Debug for S3Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Client")
            .field("endpoint", &self.config.endpoint_masked())
            .field("region", &self.config.region())
            .field("path_style", &self.config.path_style)
            .field("access_key", &self.config.credentials().access_key_masked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::S3Credentials;

    fn create_test_config() -> S3Config {
        let endpoint = Url::parse("https://s3.gra.example.net").unwrap();
        let credentials = S3Credentials::new("portageadmin", "portageadmin");
        S3Config::new(endpoint, credentials).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = S3Client::new(create_test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_invalid_config() {
        let endpoint = Url::parse("https://s3.gra.example.net").unwrap();
        let credentials = S3Credentials::new("", "");
        let config = S3Config::new(endpoint, credentials).unwrap();

        let client = S3Client::new(config);
        assert!(client.is_err());
    }

    #[test]
    fn test_client_debug_masks_credentials() {
        let client = S3Client::new(create_test_config()).unwrap();
        let debug_str = format!("{:?}", client);

        assert!(debug_str.contains("S3Client"));
        assert!(debug_str.contains("s3.gra.example.net"));
        assert!(!debug_str.contains("portageadmin"));
    }
}
