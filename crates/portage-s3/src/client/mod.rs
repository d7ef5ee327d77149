//! S3 client construction and configuration.
//!
//! This module wraps the underlying minio client with validated
//! configuration, credential handling and connectivity checks. Nothing
//! outside this crate constructs or touches the raw client.

mod s3_client;
mod s3_config;
mod s3_credentials;

pub use s3_client::S3Client;
pub use s3_config::S3Config;
pub use s3_credentials::S3Credentials;
