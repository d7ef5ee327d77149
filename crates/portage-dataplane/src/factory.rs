//! Validated source/sink construction from transfer addresses.

use std::sync::Arc;

use tracing::debug;

use portage_s3::{StorageConnector, TransferAddress};

use crate::sink::ObjectSink;
use crate::source::ObjectSource;
use crate::{Result, TRACING_TARGET_SINK, TRACING_TARGET_SOURCE};

/// Builds an [`ObjectSource`] from a transfer request's source address.
///
/// Only the recognized keys are read: bucket name, object name and object
/// prefix.
///
/// # Errors
///
/// Returns a validation error naming the first missing required field
/// (bucket name or object name), before any I/O.
pub fn source_from_address(
    connector: Arc<dyn StorageConnector>,
    source: &TransferAddress,
) -> Result<ObjectSource> {
    source.validate_source()?;

    debug!(
        target: TRACING_TARGET_SOURCE,
        bucket = %source.bucket_name().unwrap_or_default(),
        "Creating object source from address"
    );

    let mut builder = ObjectSource::builder(connector)
        .with_bucket_name(source.bucket_name().unwrap_or_default());

    if let Some(object_name) = source.object_name() {
        builder = builder.with_object_name(object_name);
    }

    if let Some(object_prefix) = source.object_prefix() {
        builder = builder.with_object_prefix(object_prefix);
    }

    builder.build()
}

/// Builds an [`ObjectSink`] from a transfer request's destination address.
///
/// Only the recognized keys are read: bucket name, object name and path.
///
/// # Errors
///
/// Returns a validation error naming the first missing required field
/// (bucket name or region), before any I/O.
pub fn sink_from_address(
    connector: Arc<dyn StorageConnector>,
    destination: &TransferAddress,
) -> Result<ObjectSink> {
    destination.validate_destination()?;

    debug!(
        target: TRACING_TARGET_SINK,
        bucket = %destination.bucket_name().unwrap_or_default(),
        "Creating object sink from address"
    );

    let mut builder = ObjectSink::builder(connector)
        .with_bucket_name(destination.bucket_name().unwrap_or_default());

    if let Some(object_name) = destination.object_name() {
        builder = builder.with_object_name(object_name);
    }

    if let Some(path) = destination.path() {
        builder = builder.with_path(path);
    }

    builder.build()
}
