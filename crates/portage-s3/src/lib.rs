#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![allow(clippy::result_large_err, clippy::large_enum_variant)]

// Tracing target constants for consistent logging
pub const TRACING_TARGET_CLIENT: &str = "portage_s3::client";
pub const TRACING_TARGET_BUCKETS: &str = "portage_s3::buckets";
pub const TRACING_TARGET_OBJECTS: &str = "portage_s3::objects";
pub const TRACING_TARGET_RETRY: &str = "portage_s3::retry";

pub mod address;
pub mod client;
pub mod connector;
pub mod invoker;
pub mod retry;
pub mod schema;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

// Re-export for convenience
pub use crate::address::TransferAddress;
pub use crate::client::{S3Client, S3Config, S3Credentials};
pub use crate::connector::{S3Connector, StorageConnector};
pub use crate::invoker::ResilientInvoker;
pub use crate::retry::RetryConfig;

/// Error type for Portage storage operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum Error {
    /// Configuration error.
    ///
    /// Invalid configuration parameters, missing required settings, or a
    /// malformed endpoint URL.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required descriptor or address field is missing or empty.
    ///
    /// Raised synchronously before any I/O and never retried.
    #[error("The field {field} is required")]
    Validation {
        /// Name of the missing or empty field.
        field: String,
    },

    /// A supplied value violates an argument invariant.
    ///
    /// Raised synchronously by constructors (for example a part whose size
    /// is smaller than its offset); never retried.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The connector has no live storage client bound.
    #[error("Storage client is not initialized")]
    Uninitialized,

    /// A listing operation intended to locate at least one object found none.
    ///
    /// Not retried: a structurally empty listing will not change on retry.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// An operation was invoked on a part that is already closed.
    ///
    /// A programming-contract violation; never retried and always fatal to
    /// that part's transfer.
    #[error("Invalid state: {0}")]
    State(String),

    /// I/O failure while reading or writing object content.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying S3 client error.
    ///
    /// Wraps errors from the minio crate: network, auth, server-side and
    /// serialization failures surface here.
    #[error("S3 client error: {0}")]
    Client(#[from] minio::s3::error::Error),
}

impl Error {
    /// Builds a validation error naming the offending field.
    pub fn validation(field: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
        }
    }

    /// Returns whether this error indicates a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Returns whether this error is a part-lifecycle contract violation.
    pub fn is_state_error(&self) -> bool {
        matches!(self, Error::State(_))
    }

    /// Returns whether this error should trigger an automatic retry.
    ///
    /// Only failures of the underlying client are retryable; validation,
    /// lifecycle and not-found errors will not change on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Client(_) => true,
            Error::Io(_) => true,
            Error::Config(_) => false,
            Error::Validation { .. } => false,
            Error::InvalidArgument(_) => false,
            Error::Uninitialized => false,
            Error::NotFound(_) => false,
            Error::State(_) => false,
        }
    }
}

/// Specialized [`Result`] type for storage operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = Error::validation("bucketName");
        assert_eq!(err.to_string(), "The field bucketName is required");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(Error::Io(std::io::Error::other("reset")).is_retryable());
        assert!(!Error::Uninitialized.is_retryable());
        assert!(!Error::NotFound("missing".into()).is_retryable());
        assert!(!Error::State("closed".into()).is_retryable());
        assert!(!Error::Config("bad endpoint".into()).is_retryable());
    }

    #[test]
    fn test_error_predicates() {
        assert!(Error::NotFound("x".into()).is_not_found());
        assert!(Error::State("x".into()).is_state_error());
        assert!(!Error::Uninitialized.is_not_found());
    }
}
