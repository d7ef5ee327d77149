//! Provision and deprovision workflows.

use jiff::Timestamp;
use portage_s3::ResilientInvoker;
use strum::Display;
use tracing::{debug, error, info, instrument};

use crate::descriptor::ResourceDescriptor;
use crate::resource::{DeprovisionedResource, ProvisionedResource};
use crate::{Result, TRACING_TARGET_PROVISION};

/// Steps of the provision workflow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ProvisionState {
    /// Provisioning was requested.
    Requested,
    /// Checking whether the bucket already exists.
    Checking,
    /// The bucket exists and is reused without a creation action.
    Reusing,
    /// The bucket is absent and being created.
    Creating,
    /// Terminal: the resource is provisioned.
    Provisioned,
    /// Terminal: provisioning failed.
    Failed,
}

/// Steps of the deprovision workflow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DeprovisionState {
    /// Deprovisioning was requested.
    Requested,
    /// Listing every object in the bucket.
    ListingObjects,
    /// Batch-deleting the listed objects.
    DeletingObjects,
    /// Deleting the now-empty bucket.
    DeletingBucket,
    /// Terminal: the resource is deprovisioned.
    Deprovisioned,
    /// Terminal: deprovisioning failed.
    Failed,
}

/// Orchestrates bucket provision and deprovision.
///
/// Each workflow is a sequential asynchronous pipeline: a step only begins
/// once the previous one completed successfully, and the first unretryable
/// failure short-circuits the remaining steps. Retries happen per step
/// inside the [`ResilientInvoker`].
///
/// No mutual exclusion is enforced per bucket name: two racing provisions of
/// the same bucket may both observe it absent, but creation is an
/// existence-checked no-op, so both converge on the same bucket (with
/// distinct resource names).
#[derive(Debug, Clone)]
pub struct Provisioner {
    invoker: ResilientInvoker,
}

impl Provisioner {
    /// Creates a provisioner issuing its storage calls through `invoker`.
    pub fn new(invoker: ResilientInvoker) -> Self {
        Self { invoker }
    }

    /// Provisions the bucket a descriptor requests.
    ///
    /// Reuses the bucket when it already exists; creates it otherwise. On
    /// success, returns a [`ProvisionedResource`] carrying the descriptor's
    /// identifiers, a freshly derived resource name and the descriptor's
    /// optional `objectName`/`path`.
    ///
    /// Provisioning the same bucket twice is safe, but each call produces a
    /// distinct, timestamp-derived resource name.
    #[instrument(skip(self, descriptor), target = TRACING_TARGET_PROVISION, fields(bucket = %descriptor.bucket_name()))]
    pub async fn provision(&self, descriptor: &ResourceDescriptor) -> Result<ProvisionedResource> {
        let bucket_name = descriptor.bucket_name();

        info!(
            target: TRACING_TARGET_PROVISION,
            bucket = %bucket_name,
            state = %ProvisionState::Requested,
            "Provisioning request submitted"
        );

        debug!(
            target: TRACING_TARGET_PROVISION,
            bucket = %bucket_name,
            state = %ProvisionState::Checking,
            "Checking bucket existence"
        );

        let exists = self
            .invoker
            .bucket_exists(bucket_name)
            .await
            .inspect_err(|e| self.provision_failed(bucket_name, e))?;

        if exists {
            info!(
                target: TRACING_TARGET_PROVISION,
                bucket = %bucket_name,
                state = %ProvisionState::Reusing,
                "Reusing existing bucket"
            );
        } else {
            debug!(
                target: TRACING_TARGET_PROVISION,
                bucket = %bucket_name,
                state = %ProvisionState::Creating,
                "Creating bucket"
            );

            self.invoker
                .create_bucket(bucket_name)
                .await
                .inspect_err(|e| self.provision_failed(bucket_name, e))?;
        }

        let resource_name = format!("{}-{}", descriptor.id(), Timestamp::now());

        let resource = ProvisionedResource::new(
            descriptor.id(),
            bucket_name,
            descriptor.region(),
            resource_name,
            descriptor.id(),
            descriptor.transfer_process_id(),
            descriptor.object_name().map(str::to_string),
            descriptor.path().map(str::to_string),
        );

        info!(
            target: TRACING_TARGET_PROVISION,
            bucket = %bucket_name,
            resource_name = %resource.resource_name(),
            state = %ProvisionState::Provisioned,
            "Bucket provisioned"
        );

        Ok(resource)
    }

    /// Deprovisions a previously provisioned bucket.
    ///
    /// Lists every object in the bucket, batch-deletes them, then deletes
    /// the bucket, strictly in that order. Returns a record referencing the
    /// destroyed resource's id.
    #[instrument(skip(self, resource), target = TRACING_TARGET_PROVISION, fields(bucket = %resource.bucket_name()))]
    pub async fn deprovision(
        &self,
        resource: &ProvisionedResource,
    ) -> Result<DeprovisionedResource> {
        let bucket_name = resource.bucket_name();

        info!(
            target: TRACING_TARGET_PROVISION,
            bucket = %bucket_name,
            state = %DeprovisionState::Requested,
            "Deprovisioning request submitted"
        );

        debug!(
            target: TRACING_TARGET_PROVISION,
            bucket = %bucket_name,
            state = %DeprovisionState::ListingObjects,
            "Listing bucket objects"
        );

        let keys = self
            .invoker
            .list_objects(bucket_name, "")
            .await
            .inspect_err(|e| self.deprovision_failed(bucket_name, e))?;

        debug!(
            target: TRACING_TARGET_PROVISION,
            bucket = %bucket_name,
            count = keys.len(),
            state = %DeprovisionState::DeletingObjects,
            "Deleting bucket objects"
        );

        self.invoker
            .delete_objects(bucket_name, keys)
            .await
            .inspect_err(|e| self.deprovision_failed(bucket_name, e))?;

        debug!(
            target: TRACING_TARGET_PROVISION,
            bucket = %bucket_name,
            state = %DeprovisionState::DeletingBucket,
            "Deleting bucket"
        );

        self.invoker
            .delete_bucket(bucket_name)
            .await
            .inspect_err(|e| self.deprovision_failed(bucket_name, e))?;

        info!(
            target: TRACING_TARGET_PROVISION,
            bucket = %bucket_name,
            state = %DeprovisionState::Deprovisioned,
            "Bucket deprovisioned"
        );

        Ok(DeprovisionedResource::new(resource.id()))
    }

    fn provision_failed(&self, bucket_name: &str, error: &crate::Error) {
        error!(
            target: TRACING_TARGET_PROVISION,
            bucket = %bucket_name,
            error = %error,
            state = %ProvisionState::Failed,
            "Provisioning failed"
        );
    }

    fn deprovision_failed(&self, bucket_name: &str, error: &crate::Error) {
        error!(
            target: TRACING_TARGET_PROVISION,
            bucket = %bucket_name,
            error = %error,
            state = %DeprovisionState::Failed,
            "Deprovisioning failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use portage_s3::mock::MockConnector;
    use portage_s3::RetryConfig;

    use super::*;

    fn provisioner(connector: MockConnector) -> Provisioner {
        Provisioner::new(ResilientInvoker::new(
            Arc::new(connector),
            RetryConfig::new(2, Duration::from_millis(1)),
        ))
    }

    fn descriptor() -> ResourceDescriptor {
        ResourceDescriptor::builder()
            .with_id("definition-1")
            .with_transfer_process_id("process-1")
            .with_bucket_name("transfer-bucket")
            .with_region("gra")
            .with_path("exports/2026")
            .build()
            .unwrap()
    }

    fn provisioned_resource() -> ProvisionedResource {
        ProvisionedResource::new(
            "definition-1",
            "transfer-bucket",
            "gra",
            "definition-1-2026-08-07T10:00:00Z",
            "definition-1",
            "process-1",
            None,
            None,
        )
    }

    #[tokio::test]
    async fn test_provision_reuses_existing_bucket() {
        let connector = MockConnector::new().with_bucket("transfer-bucket");
        let provisioner = provisioner(connector.clone());

        let resource = provisioner.provision(&descriptor()).await.unwrap();

        assert_eq!(connector.call_count("create_bucket"), 0);
        assert_eq!(resource.bucket_name(), "transfer-bucket");
        assert_eq!(resource.region(), "gra");
        assert_eq!(resource.resource_definition_id(), "definition-1");
        assert_eq!(resource.transfer_process_id(), "process-1");
        assert_eq!(resource.path(), Some("exports/2026"));
        assert!(resource.resource_name().starts_with("definition-1-"));
    }

    #[tokio::test]
    async fn test_provision_creates_absent_bucket_once() {
        let connector = MockConnector::new();
        let provisioner = provisioner(connector.clone());

        let resource = provisioner.provision(&descriptor()).await.unwrap();

        assert_eq!(connector.call_count("create_bucket"), 1);
        assert_eq!(resource.bucket_name(), "transfer-bucket");
    }

    #[tokio::test]
    async fn test_provision_twice_yields_distinct_resource_names() {
        let connector = MockConnector::new();
        let provisioner = provisioner(connector);

        let first = provisioner.provision(&descriptor()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
        let second = provisioner.provision(&descriptor()).await.unwrap();

        assert_eq!(first.bucket_name(), second.bucket_name());
        assert_ne!(first.resource_name(), second.resource_name());
    }

    #[tokio::test]
    async fn test_provision_surfaces_unrecoverable_failure() {
        let connector = MockConnector::new().failing_always("bucket_exists");
        let provisioner = provisioner(connector.clone());

        let result = provisioner.provision(&descriptor()).await;

        assert!(result.is_err());
        assert_eq!(connector.call_count("create_bucket"), 0);
    }

    #[tokio::test]
    async fn test_deprovision_runs_steps_in_order() {
        let connector = MockConnector::new()
            .with_object("transfer-bucket", "exports/a.csv", "a")
            .with_object("transfer-bucket", "exports/b.csv", "b");
        let provisioner = provisioner(connector.clone());

        let deprovisioned = provisioner
            .deprovision(&provisioned_resource())
            .await
            .unwrap();

        assert_eq!(deprovisioned.provisioned_resource_id(), "definition-1");
        assert_eq!(
            connector.calls(),
            vec!["list_objects", "delete_objects", "delete_bucket"]
        );
    }

    #[tokio::test]
    async fn test_deprovision_short_circuits_when_object_deletion_fails() {
        let connector = MockConnector::new()
            .with_object("transfer-bucket", "exports/a.csv", "a")
            .failing_always("delete_objects");
        let provisioner = provisioner(connector.clone());

        let result = provisioner.deprovision(&provisioned_resource()).await;

        assert!(result.is_err());
        assert_eq!(connector.call_count("delete_bucket"), 0);
        assert_eq!(connector.call_count("bucket_exists"), 0);
    }
}
