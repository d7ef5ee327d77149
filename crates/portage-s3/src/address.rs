//! Transfer address property bag and validation.
//!
//! A [`TransferAddress`] is the untyped key/value bag a transfer request
//! carries for its source and destination. This crate only ever reads the
//! recognized keys from [`crate::schema`]; everything else passes through
//! untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result, schema};

/// String property bag describing one side of a transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferAddress {
    properties: HashMap<String, String>,
}

impl TransferAddress {
    /// Creates an empty address.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, replacing any previous value.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns the raw value for `key`, if present.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Returns whether `key` is present, regardless of its value.
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Returns the bucket name, if present.
    pub fn bucket_name(&self) -> Option<&str> {
        self.property(schema::BUCKET_NAME)
    }

    /// Returns the region, if present.
    pub fn region(&self) -> Option<&str> {
        self.property(schema::REGION)
    }

    /// Returns the exact object name, if present.
    pub fn object_name(&self) -> Option<&str> {
        self.property(schema::OBJECT_NAME)
    }

    /// Returns the object key prefix, if present.
    pub fn object_prefix(&self) -> Option<&str> {
        self.property(schema::OBJECT_PREFIX)
    }

    /// Returns the destination directory path, if present.
    pub fn path(&self) -> Option<&str> {
        self.property(schema::PATH)
    }

    /// Validates the fields a readable source requires.
    ///
    /// A source must name its bucket and the object to read. Listing by
    /// prefix still requires the object name as a fallback lookup key.
    pub fn validate_source(&self) -> Result<()> {
        self.validate_fields(&[schema::BUCKET_NAME, schema::OBJECT_NAME])
    }

    /// Validates the fields a writable destination requires.
    pub fn validate_destination(&self) -> Result<()> {
        self.validate_fields(&[schema::BUCKET_NAME, schema::REGION])
    }

    /// Validates the fields a credential address requires.
    pub fn validate_credentials(&self) -> Result<()> {
        self.validate_fields(&[schema::ACCESS_KEY, schema::SECRET_KEY, schema::ENDPOINT])
    }

    /// Checks that each named field is present and non-blank.
    ///
    /// Fields are checked in order; the first violation is returned as a
    /// validation error naming the field. Runs before any I/O.
    pub fn validate_fields(&self, fields: &[&str]) -> Result<()> {
        for field in fields {
            match self.property(field) {
                Some(value) if !value.trim().is_empty() => {}
                _ => return Err(Error::validation(*field)),
            }
        }
        Ok(())
    }
}

impl FromIterator<(String, String)> for TransferAddress {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}

/// Validates an S3 endpoint URL of the form `https://s3.<region>.<domain>`
/// and extracts the region label.
///
/// # Errors
///
/// Returns a configuration error if the URL does not use `https`, has no
/// host, or the host does not follow the `s3.<region>.<domain>` shape.
pub fn region_from_endpoint(endpoint: &Url) -> Result<String> {
    if endpoint.scheme() != "https" {
        return Err(Error::Config(format!(
            "endpoint scheme '{}' is not https",
            endpoint.scheme()
        )));
    }

    let host = endpoint
        .host_str()
        .ok_or_else(|| Error::Config("endpoint must include a hostname".to_string()))?;

    let mut labels = host.split('.');
    match (labels.next(), labels.next(), labels.next()) {
        (Some("s3"), Some(region), Some(_)) if !region.is_empty() => Ok(region.to_string()),
        _ => Err(Error::Config(format!(
            "endpoint host '{host}' is not of the form s3.<region>.<domain>"
        ))),
    }
}
