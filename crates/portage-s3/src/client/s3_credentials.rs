//! S3 authentication credentials.

use minio::s3::creds::StaticProvider;
use serde::{Deserialize, Serialize};

/// Authentication credentials for an S3-compatible store.
///
/// Credentials are supplied by the host's secret store (see
/// [`crate::schema::settings`]); this crate never resolves secrets itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Credentials {
    /// Access key for authentication.
    pub access_key: String,

    /// Secret key for authentication.
    /// Never serialized and masked in all log output.
    #[serde(skip_serializing)]
    pub secret_key: String,

    /// Optional session token for temporary credentials.
    pub session_token: Option<String>,
}

impl S3Credentials {
    /// Creates credentials from an access key and secret key.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    /// Creates temporary credentials carrying a session token.
    pub fn with_session_token(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: Some(session_token.into()),
        }
    }

    /// Returns the access key.
    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Returns the secret key.
    #[inline]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Returns the session token if available.
    #[inline]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Returns a masked version of the access key for logging.
    ///
    /// Shows only the first 4 characters followed by asterisks.
    pub fn access_key_masked(&self) -> String {
        if self.access_key.len() <= 4 {
            "*".repeat(self.access_key.len())
        } else {
            format!("{}***", &self.access_key[..4])
        }
    }
}

impl From<S3Credentials> for StaticProvider {
    fn from(credentials: S3Credentials) -> Self {
        StaticProvider::new(
            &credentials.access_key,
            &credentials.secret_key,
            credentials.session_token.as_deref(),
        )
    }
}
