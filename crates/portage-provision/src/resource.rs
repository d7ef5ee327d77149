//! Realized-resource records produced by provisioning.

use serde::{Deserialize, Serialize};

/// The realized counterpart of a [`ResourceDescriptor`](crate::ResourceDescriptor).
///
/// Created only by a successful provision and never mutated afterward. A
/// successful deprovision conceptually destroys the resource; the record may
/// persist for audit but no longer denotes a live bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedResource {
    id: String,
    bucket_name: String,
    region: String,
    resource_name: String,
    resource_definition_id: String,
    transfer_process_id: String,
    object_name: Option<String>,
    path: Option<String>,
}

impl ProvisionedResource {
    pub(crate) fn new(
        id: impl Into<String>,
        bucket_name: impl Into<String>,
        region: impl Into<String>,
        resource_name: impl Into<String>,
        resource_definition_id: impl Into<String>,
        transfer_process_id: impl Into<String>,
        object_name: Option<String>,
        path: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            bucket_name: bucket_name.into(),
            region: region.into(),
            resource_name: resource_name.into(),
            resource_definition_id: resource_definition_id.into(),
            transfer_process_id: transfer_process_id.into(),
            object_name,
            path,
        }
    }

    /// Identifier of this resource.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the provisioned bucket.
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Region of the provisioned bucket.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Unique name of this provisioning, derived from the descriptor id and
    /// the provisioning timestamp.
    ///
    /// Resource names are not stable across provisioning calls for the same
    /// bucket; callers must not rely on them converging.
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Identifier of the descriptor this resource was provisioned from.
    pub fn resource_definition_id(&self) -> &str {
        &self.resource_definition_id
    }

    /// Identifier of the owning transfer process.
    pub fn transfer_process_id(&self) -> &str {
        &self.transfer_process_id
    }

    /// Exact object name carried through from the descriptor.
    pub fn object_name(&self) -> Option<&str> {
        self.object_name.as_deref()
    }

    /// Destination directory path carried through from the descriptor.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

/// Record of a completed deprovision, referencing the resource it destroyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeprovisionedResource {
    provisioned_resource_id: String,
}

impl DeprovisionedResource {
    pub(crate) fn new(provisioned_resource_id: impl Into<String>) -> Self {
        Self {
            provisioned_resource_id: provisioned_resource_id.into(),
        }
    }

    /// Identifier of the provisioned resource that was destroyed.
    pub fn provisioned_resource_id(&self) -> &str {
        &self.provisioned_resource_id
    }
}
