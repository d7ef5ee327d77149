//! Streaming sink: uploads parts in parallel with computed destination keys.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument};

use portage_s3::StorageConnector;

use crate::part::ObjectPart;
use crate::{Error, Result, TRACING_TARGET_SINK};

/// Default number of concurrent part uploads.
const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Computes the destination key for a part.
///
/// Pure function of the configured path, the configured object name and the
/// part's own name: when a path is present, a `/` separator is inserted only
/// if the path is non-empty and lacks a trailing slash; the configured
/// object name wins over the part's own name when both are present.
pub fn determine_destination_name(
    path: Option<&str>,
    object_name: Option<&str>,
    part_name: &str,
) -> String {
    let target = object_name.unwrap_or(part_name);

    match path {
        Some(path) if !path.is_empty() && !path.ends_with('/') => format!("{path}/{target}"),
        Some(path) => format!("{path}{target}"),
        None => target.to_string(),
    }
}

/// Uploads a bounded collection of parts to a bucket in parallel.
///
/// One upload task runs per part on a bounded pool; uploads may complete in
/// any order and callers must not depend on ordering. The first failing
/// upload aborts the remaining tasks; already-completed uploads are not
/// rolled back.
pub struct ObjectSink {
    connector: Arc<dyn StorageConnector>,
    bucket_name: String,
    object_name: Option<String>,
    path: Option<String>,
    max_concurrency: usize,
}

impl ObjectSink {
    /// Returns a builder over the given connector.
    pub fn builder(connector: Arc<dyn StorageConnector>) -> ObjectSinkBuilder {
        ObjectSinkBuilder {
            connector,
            bucket_name: None,
            object_name: None,
            path: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Returns the destination bucket.
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Computes the destination key for `part`.
    pub fn destination_name(&self, part: &ObjectPart) -> String {
        determine_destination_name(self.path.as_deref(), self.object_name.as_deref(), part.name())
    }

    /// Uploads every part to the destination bucket.
    ///
    /// # Errors
    ///
    /// Returns the first upload failure; remaining uploads are aborted and
    /// uploads that already completed are not rolled back.
    #[instrument(skip(self, parts), target = TRACING_TARGET_SINK, fields(bucket = %self.bucket_name, parts = parts.len()))]
    pub async fn transfer_parts(&self, parts: Vec<ObjectPart>) -> Result<()> {
        let count = parts.len();

        debug!(
            target: TRACING_TARGET_SINK,
            bucket = %self.bucket_name,
            parts = count,
            max_concurrency = self.max_concurrency,
            "Transferring parts"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut uploads: JoinSet<Result<()>> = JoinSet::new();

        for mut part in parts {
            let destination = self.destination_name(&part);
            let connector = self.connector.clone();
            let bucket_name = self.bucket_name.clone();
            let semaphore = semaphore.clone();

            uploads.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| Error::State("upload pool closed".to_string()))?;

                let part_name = part.name().to_string();
                let result: Result<()> = async {
                    let data = part.open_stream().await?;
                    connector.put_object(&bucket_name, &destination, data).await
                }
                .await;

                result.inspect_err(|e| {
                    error!(
                        target: TRACING_TARGET_SINK,
                        part = %part_name,
                        bucket = %bucket_name,
                        error = %e,
                        "Error uploading part to bucket"
                    );
                })
            });
        }

        while let Some(joined) = uploads.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    uploads.abort_all();
                    return Err(e);
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    uploads.abort_all();
                    return Err(Error::State(format!("upload task failed: {e}")));
                }
            }
        }

        info!(
            target: TRACING_TARGET_SINK,
            bucket = %self.bucket_name,
            parts = count,
            "All parts transferred"
        );

        Ok(())
    }
}

impl std::fmt::Debug for ObjectSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectSink")
            .field("bucket_name", &self.bucket_name)
            .field("object_name", &self.object_name)
            .field("path", &self.path)
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ObjectSink`].
pub struct ObjectSinkBuilder {
    connector: Arc<dyn StorageConnector>,
    bucket_name: Option<String>,
    object_name: Option<String>,
    path: Option<String>,
    max_concurrency: usize,
}

impl ObjectSinkBuilder {
    /// Sets the destination bucket.
    pub fn with_bucket_name(mut self, bucket_name: impl Into<String>) -> Self {
        self.bucket_name = Some(bucket_name.into());
        self
    }

    /// Sets the destination object name, overriding the parts' own names.
    pub fn with_object_name(mut self, object_name: impl Into<String>) -> Self {
        self.object_name = Some(object_name.into());
        self
    }

    /// Sets the destination directory path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the maximum number of concurrent uploads.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Validates the staged fields and builds the sink.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the bucket name is missing or empty.
    pub fn build(self) -> Result<ObjectSink> {
        let bucket_name = match self.bucket_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(Error::validation("bucketName")),
        };

        Ok(ObjectSink {
            connector: self.connector,
            bucket_name,
            object_name: self.object_name,
            path: self.path,
            max_concurrency: self.max_concurrency,
        })
    }
}
