//! Storage connector capability.
//!
//! [`StorageConnector`] is the only seam through which Portage components
//! reach the object store; the provisioner and the data plane depend on it
//! exclusively and never on the underlying client library.

mod s3_connector;

pub use s3_connector::S3Connector;

use bytes::Bytes;

use crate::Result;

/// Capability interface over a bucket/object store.
///
/// Every operation may fail with a storage error carrying the underlying
/// cause; implementations must fail fast with
/// [`Error::Uninitialized`](crate::Error::Uninitialized) when no live client
/// is bound. Implementations are safe for concurrent use from multiple
/// transfers.
#[async_trait::async_trait]
pub trait StorageConnector: Send + Sync {
    /// Checks whether `bucket` exists.
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    /// Creates `bucket`, doing nothing if it already exists.
    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// Deletes `bucket`, doing nothing if it does not exist.
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// Lists the keys in `bucket` matching `prefix`, recursively.
    ///
    /// Returns an empty vector (not an error) when nothing matches. An
    /// exact object key is matched by the listing as a one-element result.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    /// Reads the full content of an object.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// Reads `length` bytes of an object starting at `offset`.
    async fn get_object_range(
        &self,
        bucket: &str,
        key: &str,
        offset: u64,
        length: u64,
    ) -> Result<Bytes>;

    /// Best-effort batch delete of `keys` from `bucket`.
    ///
    /// Per-key failures are logged but do not fail the call; only transport
    /// failures surface as errors. An empty key list is a no-op.
    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<()>;

    /// Uploads `data` as the full content of an object.
    async fn put_object(&self, bucket: &str, key: &str, data: Bytes) -> Result<()>;

    /// Returns the size of an object in bytes.
    async fn get_object_size(&self, bucket: &str, key: &str) -> Result<u64>;
}
