//! Streaming source: lists matching objects and exposes them as parts.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use portage_s3::StorageConnector;

use crate::part::ObjectPart;
use crate::{Error, Result, TRACING_TARGET_SOURCE};

/// Reads objects out of a bucket as a sequence of [`ObjectPart`]s.
///
/// The lookup key precedence is: object prefix when present, otherwise the
/// exact object name (the listing matches an exact key as a one-element
/// result). Object sizes are snapshotted at listing time; content changes
/// between listing and reading are not detected.
pub struct ObjectSource {
    connector: Arc<dyn StorageConnector>,
    bucket_name: String,
    object_name: Option<String>,
    object_prefix: Option<String>,
}

impl ObjectSource {
    /// Returns a builder over the given connector.
    pub fn builder(connector: Arc<dyn StorageConnector>) -> ObjectSourceBuilder {
        ObjectSourceBuilder {
            connector,
            bucket_name: None,
            object_name: None,
            object_prefix: None,
        }
    }

    /// Returns the bucket this source reads from.
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Lists the matching objects and opens one part per key.
    ///
    /// Each part is sized via a `get_object_size` call at listing time and
    /// opened lazily on first read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the listing matches nothing — the
    /// pipeline always expects at least one readable object — and the
    /// underlying storage error when the listing or sizing call fails.
    #[instrument(skip(self), target = TRACING_TARGET_SOURCE, fields(bucket = %self.bucket_name))]
    pub async fn open_part_stream(&self) -> Result<Vec<ObjectPart>> {
        let lookup_key = self
            .object_prefix
            .as_deref()
            .or(self.object_name.as_deref())
            .unwrap_or_default();

        debug!(
            target: TRACING_TARGET_SOURCE,
            bucket = %self.bucket_name,
            lookup_key = %lookup_key,
            "Opening part stream"
        );

        let keys = self
            .connector
            .list_objects(&self.bucket_name, lookup_key)
            .await?;

        if keys.is_empty() {
            return Err(Error::NotFound(format!(
                "No objects found in bucket {} with key {}",
                self.bucket_name, lookup_key
            )));
        }

        let mut parts = Vec::with_capacity(keys.len());
        for key in keys {
            let size = self
                .connector
                .get_object_size(&self.bucket_name, &key)
                .await?;

            parts.push(ObjectPart::new(
                self.connector.clone(),
                self.bucket_name.clone(),
                key,
                0,
                size,
            )?);
        }

        info!(
            target: TRACING_TARGET_SOURCE,
            bucket = %self.bucket_name,
            parts = parts.len(),
            "Part stream opened"
        );

        Ok(parts)
    }
}

impl std::fmt::Debug for ObjectSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectSource")
            .field("bucket_name", &self.bucket_name)
            .field("object_name", &self.object_name)
            .field("object_prefix", &self.object_prefix)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ObjectSource`].
pub struct ObjectSourceBuilder {
    connector: Arc<dyn StorageConnector>,
    bucket_name: Option<String>,
    object_name: Option<String>,
    object_prefix: Option<String>,
}

impl ObjectSourceBuilder {
    /// Sets the bucket to read from.
    pub fn with_bucket_name(mut self, bucket_name: impl Into<String>) -> Self {
        self.bucket_name = Some(bucket_name.into());
        self
    }

    /// Sets the exact object name to read.
    pub fn with_object_name(mut self, object_name: impl Into<String>) -> Self {
        self.object_name = Some(object_name.into());
        self
    }

    /// Sets the object prefix to list by; takes precedence over the exact
    /// object name.
    pub fn with_object_prefix(mut self, object_prefix: impl Into<String>) -> Self {
        self.object_prefix = Some(object_prefix.into());
        self
    }

    /// Validates the staged fields and builds the source.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the bucket name is missing or empty.
    pub fn build(self) -> Result<ObjectSource> {
        let bucket_name = match self.bucket_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(Error::validation("bucketName")),
        };

        Ok(ObjectSource {
            connector: self.connector,
            bucket_name,
            object_name: self.object_name,
            object_prefix: self.object_prefix,
        })
    }
}
