//! S3-backed implementation of the storage connector capability.

use bytes::Bytes;
use futures::StreamExt;
use minio::s3::builders::ObjectToDelete;
use minio::s3::segmented_bytes::SegmentedBytes;
use minio::s3::types::{S3Api, ToStream};
use tracing::{debug, error, info, instrument, warn};

use crate::client::S3Client;
use crate::connector::StorageConnector;
use crate::{Error, Result, TRACING_TARGET_BUCKETS, TRACING_TARGET_OBJECTS};

/// [`StorageConnector`] implementation over an S3-compatible store.
///
/// Holds an optionally bound [`S3Client`]; every operation fails fast with
/// [`Error::Uninitialized`] until a client is bound. The connector is cheap
/// to clone and safe for concurrent use.
#[derive(Debug, Clone)]
pub struct S3Connector {
    client: Option<S3Client>,
}

impl S3Connector {
    /// Creates a connector bound to a live client.
    pub fn new(client: S3Client) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Creates a connector with no client bound.
    ///
    /// Every operation on an unbound connector fails with
    /// [`Error::Uninitialized`].
    pub fn unbound() -> Self {
        Self { client: None }
    }

    /// Returns whether a client is bound.
    pub fn is_bound(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&S3Client> {
        self.client.as_ref().ok_or(Error::Uninitialized)
    }
}

#[async_trait::async_trait]
impl StorageConnector for S3Connector {
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket))]
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        let client = self.client()?;

        debug!(target: TRACING_TARGET_BUCKETS, bucket = %bucket, "Checking if bucket exists");

        let start = std::time::Instant::now();
        let response = client
            .as_inner()
            .bucket_exists(bucket)
            .send()
            .await
            .map_err(|e| {
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket = %bucket,
                    error = %e,
                    "Failed to check bucket existence"
                );
                Error::Client(e)
            })?;

        debug!(
            target: TRACING_TARGET_BUCKETS,
            bucket = %bucket,
            exists = response.exists,
            elapsed = ?start.elapsed(),
            "Bucket existence check completed"
        );

        Ok(response.exists)
    }

    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket))]
    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let client = self.client()?;

        if self.bucket_exists(bucket).await? {
            debug!(
                target: TRACING_TARGET_BUCKETS,
                bucket = %bucket,
                "Bucket already exists, skipping creation"
            );
            return Ok(());
        }

        debug!(target: TRACING_TARGET_BUCKETS, bucket = %bucket, "Creating bucket");

        let start = std::time::Instant::now();
        client
            .as_inner()
            .create_bucket(bucket)
            .send()
            .await
            .map_err(|e| {
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket = %bucket,
                    error = %e,
                    "Failed to create bucket"
                );
                Error::Client(e)
            })?;

        info!(
            target: TRACING_TARGET_BUCKETS,
            bucket = %bucket,
            elapsed = ?start.elapsed(),
            "Bucket created successfully"
        );

        Ok(())
    }

    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket))]
    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        let client = self.client()?;

        if !self.bucket_exists(bucket).await? {
            debug!(
                target: TRACING_TARGET_BUCKETS,
                bucket = %bucket,
                "Bucket does not exist, skipping deletion"
            );
            return Ok(());
        }

        debug!(target: TRACING_TARGET_BUCKETS, bucket = %bucket, "Deleting bucket");

        let start = std::time::Instant::now();
        client
            .as_inner()
            .delete_bucket(bucket)
            .send()
            .await
            .map_err(|e| {
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket = %bucket,
                    error = %e,
                    "Failed to delete bucket"
                );
                Error::Client(e)
            })?;

        info!(
            target: TRACING_TARGET_BUCKETS,
            bucket = %bucket,
            elapsed = ?start.elapsed(),
            "Bucket deleted successfully"
        );

        Ok(())
    }

    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, prefix = %prefix))]
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let client = self.client()?;

        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            prefix = %prefix,
            "Listing objects"
        );

        let start = std::time::Instant::now();

        let mut list_request = client.as_inner().list_objects(bucket);
        if !prefix.is_empty() {
            list_request = list_request.prefix(Some(prefix.to_string()));
        }

        // No delimiter: the listing is recursive over any key hierarchy.
        let mut stream = list_request.to_stream().await;

        let mut keys = Vec::new();
        while let Some(page) = stream.next().await {
            let response = page.map_err(|e| {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    prefix = %prefix,
                    error = %e,
                    "Failed to list objects"
                );
                Error::Client(e)
            })?;

            keys.extend(response.contents.into_iter().map(|entry| entry.name));
        }

        info!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            prefix = %prefix,
            count = keys.len(),
            elapsed = ?start.elapsed(),
            "Objects listed successfully"
        );

        Ok(keys)
    }

    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let client = self.client()?;

        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            "Getting object"
        );

        let start = std::time::Instant::now();
        let response = client
            .as_inner()
            .get_object(bucket, key)
            .send()
            .await
            .map_err(|e| {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    "Failed to get object"
                );
                Error::Client(e)
            })?;

        let segmented = response.content.to_segmented_bytes().await.map_err(Error::Io)?;
        let data = segmented.to_bytes();

        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            size = data.len(),
            elapsed = ?start.elapsed(),
            "Object retrieved successfully"
        );

        Ok(data)
    }

    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key, offset, length))]
    async fn get_object_range(
        &self,
        bucket: &str,
        key: &str,
        offset: u64,
        length: u64,
    ) -> Result<Bytes> {
        let client = self.client()?;

        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            offset = offset,
            length = length,
            "Getting object range"
        );

        let start = std::time::Instant::now();
        let response = client
            .as_inner()
            .get_object(bucket, key)
            .offset(Some(offset))
            .length(Some(length))
            .send()
            .await
            .map_err(|e| {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    offset = offset,
                    length = length,
                    error = %e,
                    "Failed to get object range"
                );
                Error::Client(e)
            })?;

        let segmented = response.content.to_segmented_bytes().await.map_err(Error::Io)?;
        let data = segmented.to_bytes();

        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            size = data.len(),
            elapsed = ?start.elapsed(),
            "Object range retrieved successfully"
        );

        Ok(data)
    }

    #[instrument(skip(self, keys), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, count = keys.len()))]
    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<()> {
        let client = self.client()?;

        if keys.is_empty() {
            warn!(
                target: TRACING_TARGET_OBJECTS,
                bucket = %bucket,
                "No keys provided for batch deletion"
            );
            return Ok(());
        }

        let count = keys.len();

        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            count = count,
            "Deleting objects"
        );

        let start = std::time::Instant::now();
        let objects_to_delete: Vec<ObjectToDelete> = keys
            .iter()
            .map(|key| ObjectToDelete::from(key.as_str()))
            .collect();

        // Per-key failures are reported inside the response body by the
        // store; only transport failures surface here and fail the call.
        client
            .as_inner()
            .delete_objects::<&str, ObjectToDelete>(bucket, objects_to_delete)
            .send()
            .await
            .map_err(|e| {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    count = count,
                    error = %e,
                    "Failed to delete objects"
                );
                Error::Client(e)
            })?;

        info!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            count = count,
            elapsed = ?start.elapsed(),
            "Objects deleted successfully"
        );

        Ok(())
    }

    #[instrument(skip(self, data), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key, size = data.len()))]
    async fn put_object(&self, bucket: &str, key: &str, data: Bytes) -> Result<()> {
        let client = self.client()?;

        let size = data.len();

        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            size = size,
            "Putting object"
        );

        let start = std::time::Instant::now();
        let segmented = SegmentedBytes::from(data);

        client
            .as_inner()
            .put_object(bucket, key, segmented)
            .send()
            .await
            .map_err(|e| {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    "Failed to put object"
                );
                Error::Client(e)
            })?;

        info!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            size = size,
            elapsed = ?start.elapsed(),
            "Object uploaded successfully"
        );

        Ok(())
    }

    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    async fn get_object_size(&self, bucket: &str, key: &str) -> Result<u64> {
        let client = self.client()?;

        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            "Getting object size"
        );

        let response = client
            .as_inner()
            .stat_object(bucket, key)
            .send()
            .await
            .map_err(|e| {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    "Failed to stat object"
                );
                Error::Client(e)
            })?;

        let size = response.size as u64;

        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            size = size,
            "Object size retrieved"
        );

        Ok(size)
    }
}
