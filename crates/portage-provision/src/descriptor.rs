//! Requested-resource descriptor and its builder.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Describes a requested bucket resource.
///
/// Immutable once built; use [`to_builder`](Self::to_builder) for a
/// copy-and-modify round trip. The optional `object_name` and `path` fields
/// are carried through provisioning unchanged and later drive destination
/// key composition in the data plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    id: String,
    transfer_process_id: String,
    bucket_name: String,
    region: String,
    object_name: Option<String>,
    path: Option<String>,
}

impl ResourceDescriptor {
    /// Returns a builder for a new descriptor.
    pub fn builder() -> ResourceDescriptorBuilder {
        ResourceDescriptorBuilder::default()
    }

    /// Returns a builder pre-populated with every field of this descriptor,
    /// including the optional ones.
    pub fn to_builder(&self) -> ResourceDescriptorBuilder {
        ResourceDescriptorBuilder {
            id: Some(self.id.clone()),
            transfer_process_id: Some(self.transfer_process_id.clone()),
            bucket_name: Some(self.bucket_name.clone()),
            region: Some(self.region.clone()),
            object_name: self.object_name.clone(),
            path: self.path.clone(),
        }
    }

    /// Caller-assigned unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Identifier of the owning transfer process.
    pub fn transfer_process_id(&self) -> &str {
        &self.transfer_process_id
    }

    /// Name of the requested bucket.
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Region of the requested bucket.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Exact object name, if the request names one.
    pub fn object_name(&self) -> Option<&str> {
        self.object_name.as_deref()
    }

    /// Destination directory path, if the request names one.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

/// Builder for [`ResourceDescriptor`].
#[derive(Debug, Clone, Default)]
pub struct ResourceDescriptorBuilder {
    id: Option<String>,
    transfer_process_id: Option<String>,
    bucket_name: Option<String>,
    region: Option<String>,
    object_name: Option<String>,
    path: Option<String>,
}

impl ResourceDescriptorBuilder {
    /// Sets the caller-assigned identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the owning transfer-process identifier.
    pub fn with_transfer_process_id(mut self, transfer_process_id: impl Into<String>) -> Self {
        self.transfer_process_id = Some(transfer_process_id.into());
        self
    }

    /// Sets the bucket name.
    pub fn with_bucket_name(mut self, bucket_name: impl Into<String>) -> Self {
        self.bucket_name = Some(bucket_name.into());
        self
    }

    /// Sets the bucket region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets the exact object name.
    pub fn with_object_name(mut self, object_name: impl Into<String>) -> Self {
        self.object_name = Some(object_name.into());
        self
    }

    /// Sets or clears the exact object name.
    pub fn with_maybe_object_name(mut self, object_name: Option<String>) -> Self {
        self.object_name = object_name;
        self
    }

    /// Sets the destination directory path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets or clears the destination directory path.
    pub fn with_maybe_path(mut self, path: Option<String>) -> Self {
        self.path = path;
        self
    }

    /// Validates the staged fields and builds the descriptor.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first required field that is
    /// missing or empty (`id`, `transferProcessId`, `region`, `bucketName`).
    pub fn build(self) -> Result<ResourceDescriptor> {
        let id = require("id", self.id)?;
        let transfer_process_id = require("transferProcessId", self.transfer_process_id)?;
        let region = require("region", self.region)?;
        let bucket_name = require("bucketName", self.bucket_name)?;

        Ok(ResourceDescriptor {
            id,
            transfer_process_id,
            bucket_name,
            region,
            object_name: self.object_name,
            path: self.path,
        })
    }
}

fn require(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::validation(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ResourceDescriptor {
        ResourceDescriptor::builder()
            .with_id("definition-1")
            .with_transfer_process_id("process-1")
            .with_bucket_name("transfer-bucket")
            .with_region("gra")
            .with_object_name("report.csv")
            .with_path("exports/2026")
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_with_all_fields() {
        let descriptor = descriptor();
        assert_eq!(descriptor.id(), "definition-1");
        assert_eq!(descriptor.transfer_process_id(), "process-1");
        assert_eq!(descriptor.bucket_name(), "transfer-bucket");
        assert_eq!(descriptor.region(), "gra");
        assert_eq!(descriptor.object_name(), Some("report.csv"));
        assert_eq!(descriptor.path(), Some("exports/2026"));
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let descriptor = ResourceDescriptor::builder()
            .with_id("definition-1")
            .with_transfer_process_id("process-1")
            .with_bucket_name("transfer-bucket")
            .with_region("gra")
            .build()
            .unwrap();

        assert_eq!(descriptor.object_name(), None);
        assert_eq!(descriptor.path(), None);
    }

    #[test]
    fn test_build_fails_without_region() {
        let err = ResourceDescriptor::builder()
            .with_id("definition-1")
            .with_transfer_process_id("process-1")
            .with_bucket_name("transfer-bucket")
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::Validation { ref field } if field == "region"));
    }

    #[test]
    fn test_build_fails_without_bucket_name() {
        let err = ResourceDescriptor::builder()
            .with_id("definition-1")
            .with_transfer_process_id("process-1")
            .with_region("gra")
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::Validation { ref field } if field == "bucketName"));
    }

    #[test]
    fn test_build_fails_on_empty_required_field() {
        let err = ResourceDescriptor::builder()
            .with_id("definition-1")
            .with_transfer_process_id("process-1")
            .with_bucket_name("")
            .with_region("gra")
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::Validation { ref field } if field == "bucketName"));
    }

    #[test]
    fn test_to_builder_round_trip() {
        let original = descriptor();
        let rebuilt = original.to_builder().build().unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_to_builder_round_trip_without_optionals() {
        let original = ResourceDescriptor::builder()
            .with_id("definition-1")
            .with_transfer_process_id("process-1")
            .with_bucket_name("transfer-bucket")
            .with_region("gra")
            .build()
            .unwrap();

        let rebuilt = original.to_builder().build().unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_to_builder_copy_and_modify() {
        let modified = descriptor()
            .to_builder()
            .with_region("sbg")
            .build()
            .unwrap();

        assert_eq!(modified.region(), "sbg");
        assert_eq!(modified.bucket_name(), "transfer-bucket");
        assert_eq!(modified.object_name(), Some("report.csv"));
    }

    #[test]
    fn test_descriptor_serde_round_trip() {
        let original = descriptor();
        let json = serde_json::to_string(&original).unwrap();
        let parsed: ResourceDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
