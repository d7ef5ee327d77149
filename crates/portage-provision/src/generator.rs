//! Descriptor generation from transfer-request destinations.

use portage_s3::schema::{self, regions};
use portage_s3::TransferAddress;
use uuid::Uuid;

use crate::descriptor::ResourceDescriptor;
use crate::Result;

/// Derives a [`ResourceDescriptor`] from a transfer process's destination
/// address.
///
/// The descriptor gets a fresh UUID id; the region falls back to
/// [`regions::DEFAULT_REGION`] when the destination does not name one, and
/// the optional `objectName`/`path` properties are carried through when
/// present.
///
/// # Errors
///
/// Returns a validation error when the destination lacks a bucket name.
pub fn descriptor_for_destination(
    transfer_process_id: &str,
    destination: &TransferAddress,
) -> Result<ResourceDescriptor> {
    let id = Uuid::new_v4().to_string();
    let region = destination.region().unwrap_or(regions::DEFAULT_REGION);

    let mut builder = ResourceDescriptor::builder()
        .with_id(id)
        .with_transfer_process_id(transfer_process_id)
        .with_region(region);

    if let Some(bucket_name) = destination.bucket_name() {
        builder = builder.with_bucket_name(bucket_name);
    }

    if destination.has_property(schema::OBJECT_NAME) {
        builder =
            builder.with_maybe_object_name(destination.object_name().map(str::to_string));
    }

    if destination.has_property(schema::PATH) {
        builder = builder.with_maybe_path(destination.path().map(str::to_string));
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination() -> TransferAddress {
        TransferAddress::new()
            .with_property(schema::BUCKET_NAME, "transfer-bucket")
            .with_property(schema::REGION, "sbg")
    }

    #[test]
    fn test_generates_descriptor_with_uuid_id() {
        let descriptor = descriptor_for_destination("process-1", &destination()).unwrap();

        assert!(Uuid::parse_str(descriptor.id()).is_ok());
        assert_eq!(descriptor.transfer_process_id(), "process-1");
        assert_eq!(descriptor.bucket_name(), "transfer-bucket");
        assert_eq!(descriptor.region(), "sbg");
        assert_eq!(descriptor.object_name(), None);
        assert_eq!(descriptor.path(), None);
    }

    #[test]
    fn test_region_defaults_when_absent() {
        let destination =
            TransferAddress::new().with_property(schema::BUCKET_NAME, "transfer-bucket");

        let descriptor = descriptor_for_destination("process-1", &destination).unwrap();
        assert_eq!(descriptor.region(), regions::DEFAULT_REGION);
    }

    #[test]
    fn test_optional_properties_carried_through() {
        let destination = destination()
            .with_property(schema::OBJECT_NAME, "report.csv")
            .with_property(schema::PATH, "exports/2026");

        let descriptor = descriptor_for_destination("process-1", &destination).unwrap();
        assert_eq!(descriptor.object_name(), Some("report.csv"));
        assert_eq!(descriptor.path(), Some("exports/2026"));
    }

    #[test]
    fn test_missing_bucket_name_fails_validation() {
        let destination = TransferAddress::new().with_property(schema::REGION, "gra");

        let err = descriptor_for_destination("process-1", &destination).unwrap_err();
        assert!(matches!(
            err,
            portage_s3::Error::Validation { ref field } if field == schema::BUCKET_NAME
        ));
    }

    #[test]
    fn test_ids_are_unique_per_call() {
        let a = descriptor_for_destination("process-1", &destination()).unwrap();
        let b = descriptor_for_destination("process-1", &destination()).unwrap();
        assert_ne!(a.id(), b.id());
    }
}
