#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for provisioning operations.
pub const TRACING_TARGET_PROVISION: &str = "portage_provision::provisioner";

mod descriptor;
mod generator;
mod provisioner;
mod resource;

pub use descriptor::{ResourceDescriptor, ResourceDescriptorBuilder};
pub use generator::descriptor_for_destination;
pub use provisioner::{DeprovisionState, ProvisionState, Provisioner};
pub use resource::{DeprovisionedResource, ProvisionedResource};

// Provisioning reuses the storage crate's error taxonomy.
pub use portage_s3::{Error, Result};
