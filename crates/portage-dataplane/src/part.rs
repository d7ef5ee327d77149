//! Transfer parts: one object being read, with lifecycle tracking.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use portage_s3::StorageConnector;

use crate::{Error, Result, TRACING_TARGET_SOURCE};

/// One object being read during a transfer.
///
/// A part tracks how far into the object the transfer has progressed
/// (`offset`) against the object's total size, snapshotted at listing time.
/// It moves monotonically from open to closed: either a single full-stream
/// read closes it, or ranged reads advance the offset until it reaches the
/// size. Reading a closed part is a contract violation reported as
/// [`Error::State`], never retried.
pub struct ObjectPart {
    connector: Arc<dyn StorageConnector>,
    bucket_name: String,
    object_name: String,
    offset: u64,
    size: u64,
    closed: bool,
}

impl ObjectPart {
    /// Creates a part for `object_name` in `bucket_name`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either name is empty, and an
    /// invalid-argument error if `size` is zero or smaller than `offset`.
    /// A zero-length object is therefore not representable as a part.
    pub fn new(
        connector: Arc<dyn StorageConnector>,
        bucket_name: impl Into<String>,
        object_name: impl Into<String>,
        offset: u64,
        size: u64,
    ) -> Result<Self> {
        let bucket_name = bucket_name.into();
        let object_name = object_name.into();

        if bucket_name.is_empty() {
            return Err(Error::validation("bucketName"));
        }

        if object_name.is_empty() {
            return Err(Error::validation("objectName"));
        }

        if size == 0 {
            return Err(Error::InvalidArgument(
                "size must be greater than zero".to_string(),
            ));
        }

        if size < offset {
            return Err(Error::InvalidArgument(
                "size must be greater than or equal to offset".to_string(),
            ));
        }

        Ok(Self {
            connector,
            bucket_name,
            object_name,
            offset,
            size,
            closed: false,
        })
    }

    /// Returns the name of the part (its object key).
    pub fn name(&self) -> &str {
        &self.object_name
    }

    /// Returns the bucket the part reads from.
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Returns the total byte length of the object, fixed at construction.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the number of bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns whether the part has been exhausted.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Reads the full object in one shot.
    ///
    /// Closes the part after the read regardless of the data length: a full
    /// read exhausts the object by definition.
    ///
    /// # Errors
    ///
    /// Returns a state error if the part is already closed, or the storage
    /// error of the underlying read.
    pub async fn open_stream(&mut self) -> Result<Bytes> {
        self.ensure_open()?;

        let data = self
            .connector
            .get_object(&self.bucket_name, &self.object_name)
            .await?;

        self.closed = true;

        debug!(
            target: TRACING_TARGET_SOURCE,
            bucket = %self.bucket_name,
            key = %self.object_name,
            size = data.len(),
            "Part fully read and closed"
        );

        Ok(data)
    }

    /// Reads `length` bytes starting at `offset` within the object.
    ///
    /// Advances the part's offset by the number of bytes the returned
    /// buffer makes available; once the offset reaches the part's size the
    /// part is closed.
    ///
    /// # Errors
    ///
    /// Returns a state error if the part is already closed, or the storage
    /// error of the underlying ranged read.
    pub async fn open_range(&mut self, offset: u64, length: u64) -> Result<Bytes> {
        self.ensure_open()?;

        let data = self
            .connector
            .get_object_range(&self.bucket_name, &self.object_name, offset, length)
            .await?;

        self.offset += data.len() as u64;
        if self.offset >= self.size {
            self.closed = true;
        }

        debug!(
            target: TRACING_TARGET_SOURCE,
            bucket = %self.bucket_name,
            key = %self.object_name,
            offset = self.offset,
            size = self.size,
            closed = self.closed,
            "Part range read"
        );

        Ok(data)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::State(format!(
                "Part {} is already closed",
                self.object_name
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ObjectPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPart")
            .field("bucket_name", &self.bucket_name)
            .field("object_name", &self.object_name)
            .field("offset", &self.offset)
            .field("size", &self.size)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use portage_s3::mock::MockConnector;

    use super::*;

    fn connector_with(data: &'static [u8]) -> Arc<dyn StorageConnector> {
        Arc::new(MockConnector::new().with_object("transfer-bucket", "a.bin", Bytes::from_static(data)))
    }

    fn part(connector: Arc<dyn StorageConnector>, size: u64) -> ObjectPart {
        ObjectPart::new(connector, "transfer-bucket", "a.bin", 0, size).unwrap()
    }

    #[test]
    fn test_construction_rejects_empty_names() {
        let connector: Arc<dyn StorageConnector> = Arc::new(MockConnector::new());

        let err = ObjectPart::new(connector.clone(), "", "a.bin", 0, 10).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field } if field == "bucketName"));

        let err = ObjectPart::new(connector, "transfer-bucket", "", 0, 10).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field } if field == "objectName"));
    }

    #[test]
    fn test_construction_rejects_zero_size() {
        let connector: Arc<dyn StorageConnector> = Arc::new(MockConnector::new());
        let err = ObjectPart::new(connector, "transfer-bucket", "a.bin", 0, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_construction_rejects_size_smaller_than_offset() {
        let connector: Arc<dyn StorageConnector> = Arc::new(MockConnector::new());
        let err = ObjectPart::new(connector, "transfer-bucket", "a.bin", 20, 10).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_full_read_closes_part() {
        let mut part = part(connector_with(b"0123456789"), 10);
        assert!(!part.is_closed());

        let data = part.open_stream().await.unwrap();
        assert_eq!(data, Bytes::from_static(b"0123456789"));
        assert!(part.is_closed());
    }

    #[tokio::test]
    async fn test_second_read_after_full_read_is_a_state_error() {
        let mut part = part(connector_with(b"0123456789"), 10);
        part.open_stream().await.unwrap();

        let err = part.open_stream().await.unwrap_err();
        assert!(err.is_state_error());

        let err = part.open_range(0, 4).await.unwrap_err();
        assert!(err.is_state_error());
    }

    #[tokio::test]
    async fn test_ranged_reads_advance_offset_and_close_at_size() {
        static DATA: [u8; 2048] = [7u8; 2048];
        let mut part = part(connector_with(&DATA), 2048);

        let first = part.open_range(0, 1024).await.unwrap();
        assert_eq!(first.len(), 1024);
        assert_eq!(part.offset(), 1024);
        assert!(!part.is_closed());

        let second = part.open_range(1024, 1024).await.unwrap();
        assert_eq!(second.len(), 1024);
        assert_eq!(part.offset(), 2048);
        assert!(part.is_closed());

        let err = part.open_range(2048, 1024).await.unwrap_err();
        assert!(err.is_state_error());
    }

    #[tokio::test]
    async fn test_failed_read_leaves_part_open() {
        let connector: Arc<dyn StorageConnector> = Arc::new(
            MockConnector::new()
                .with_object("transfer-bucket", "a.bin", Bytes::from_static(b"0123456789"))
                .failing_times("get_object", 1),
        );
        let mut part = ObjectPart::new(connector, "transfer-bucket", "a.bin", 0, 10).unwrap();

        assert!(part.open_stream().await.is_err());
        assert!(!part.is_closed());

        // The part is still readable after a transient failure
        assert!(part.open_stream().await.is_ok());
        assert!(part.is_closed());
    }
}
