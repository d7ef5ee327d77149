//! Recognized keys and well-known values for transfer addresses.
//!
//! Transfer requests carry source and destination addresses as string
//! property bags. This module names the keys this crate reads; unrecognized
//! keys are preserved but never interpreted.

/// Address type discriminator for S3-backed transfers.
pub const ADDRESS_TYPE: &str = "PortageS3";

/// Key holding the bucket name.
pub const BUCKET_NAME: &str = "bucketName";

/// Key holding the bucket region.
pub const REGION: &str = "region";

/// Key holding an exact object name.
pub const OBJECT_NAME: &str = "objectName";

/// Key holding an object key prefix.
pub const OBJECT_PREFIX: &str = "objectPrefix";

/// Key holding the destination directory path.
pub const PATH: &str = "path";

/// Key holding the access key credential.
pub const ACCESS_KEY: &str = "accessKey";

/// Key holding the secret key credential.
pub const SECRET_KEY: &str = "secretKey";

/// Key holding the storage endpoint URL.
pub const ENDPOINT: &str = "endpoint";

/// Settings keys under which the secret store holds S3 credentials.
///
/// Resolution of these settings is the host's responsibility; they are named
/// here so every launcher spells them the same way.
pub mod settings {
    /// The key of the secret where the S3 access key is stored.
    pub const S3_ACCESS_KEY: &str = "portage.s3.access.key";

    /// The key of the secret where the S3 secret key is stored.
    pub const S3_SECRET_KEY: &str = "portage.s3.secret.key";

    /// The key of the secret where the S3 endpoint is stored.
    pub const S3_ENDPOINT: &str = "portage.s3.endpoint";
}

/// Well-known storage regions.
pub mod regions {
    /// Gravelines.
    pub const GRAVELINES: &str = "gra";

    /// Strasbourg.
    pub const STRASBOURG: &str = "sbg";

    /// Beauharnois.
    pub const BEAUHARNOIS: &str = "bhs";

    /// Roubaix.
    pub const ROUBAIX: &str = "rbx";

    /// London.
    pub const LONDON: &str = "lon";

    /// Frankfurt.
    pub const FRANKFURT: &str = "de";

    /// Warsaw.
    pub const WARSAW: &str = "waw";

    /// Singapore.
    pub const SINGAPORE: &str = "sgp";

    /// Region used when a destination does not name one.
    pub const DEFAULT_REGION: &str = GRAVELINES;
}
