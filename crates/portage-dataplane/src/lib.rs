#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for source-side operations.
pub const TRACING_TARGET_SOURCE: &str = "portage_dataplane::source";

/// Tracing target for sink-side operations.
pub const TRACING_TARGET_SINK: &str = "portage_dataplane::sink";

mod factory;
mod part;
mod sink;
mod source;

pub use factory::{sink_from_address, source_from_address};
pub use part::ObjectPart;
pub use sink::{ObjectSink, ObjectSinkBuilder, determine_destination_name};
pub use source::{ObjectSource, ObjectSourceBuilder};

// The data plane reuses the storage crate's error taxonomy.
pub use portage_s3::{Error, Result};
