//! S3-specific configuration.
//!
//! Provides [`S3Config`] for configuring the S3 mock. Values are loaded from
//! environment variables with defaults matching a fresh mock account.

use awsmock_core::MockConfig;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Canonical user ID of the default bucket and object owner.
pub const DEFAULT_OWNER_ID: &str =
    "2744ccd10c7533bd736ad890f9dd5cab2adb27b07d500b9493f29cdc420cb2e0";

/// Display name of the default bucket and object owner.
pub const DEFAULT_OWNER_DISPLAY_NAME: &str = "me";

/// Smallest size a non-final multipart part may have (5 MiB).
pub const DEFAULT_MIN_PART_SIZE: u64 = 5_242_880;

/// S3 mock configuration.
///
/// # Examples
///
/// ```
/// use awsmock_s3::config::S3Config;
///
/// let config = S3Config::default();
/// assert_eq!(config.default_region, "us-east-1");
/// assert_eq!(config.min_part_size, 5_242_880);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct S3Config {
    /// Region new buckets land in when no location constraint is given.
    #[builder(default = String::from("us-east-1"))]
    pub default_region: String,

    /// Canonical user ID of the owner of every bucket and object.
    #[builder(default = String::from(DEFAULT_OWNER_ID))]
    pub owner_id: String,

    /// Display name of the owner.
    #[builder(default = String::from(DEFAULT_OWNER_DISPLAY_NAME))]
    pub owner_display_name: String,

    /// Minimum size of every multipart part except the last.
    #[builder(default = DEFAULT_MIN_PART_SIZE)]
    pub min_part_size: u64,

    /// Upper bound for `max-keys`, `max-uploads` and `max-parts`.
    #[builder(default = 1000)]
    pub max_keys: usize,

    /// Whether a supplied `Content-MD5` is checked against the body.
    #[builder(default = true)]
    pub validate_content_md5: bool,

    /// Whether bucket names must follow the DNS-compliant naming rules.
    #[builder(default = true)]
    pub strict_bucket_names: bool,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            default_region: String::from("us-east-1"),
            owner_id: String::from(DEFAULT_OWNER_ID),
            owner_display_name: String::from(DEFAULT_OWNER_DISPLAY_NAME),
            min_part_size: DEFAULT_MIN_PART_SIZE,
            max_keys: 1000,
            validate_content_md5: true,
            strict_bucket_names: true,
            log_level: String::from("info"),
        }
    }
}

impl S3Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DEFAULT_REGION` | `us-east-1` |
    /// | `S3_OWNER_ID` | `2744ccd1...` |
    /// | `S3_OWNER_DISPLAY_NAME` | `me` |
    /// | `S3_MIN_PART_SIZE` | `5242880` |
    /// | `S3_MAX_KEYS` | `1000` |
    /// | `S3_VALIDATE_CONTENT_MD5` | `true` |
    /// | `S3_STRICT_BUCKET_NAMES` | `true` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("DEFAULT_REGION") {
            config.default_region = v;
        }
        if let Ok(v) = std::env::var("S3_OWNER_ID") {
            config.owner_id = v;
        }
        if let Ok(v) = std::env::var("S3_OWNER_DISPLAY_NAME") {
            config.owner_display_name = v;
        }
        if let Ok(v) = std::env::var("S3_MIN_PART_SIZE") {
            if let Ok(n) = v.parse::<u64>() {
                config.min_part_size = n;
            }
        }
        if let Ok(v) = std::env::var("S3_MAX_KEYS") {
            if let Ok(n) = v.parse::<usize>() {
                config.max_keys = n;
            }
        }
        if let Ok(v) = std::env::var("S3_VALIDATE_CONTENT_MD5") {
            config.validate_content_md5 = MockConfig::parse_bool(&v);
        }
        if let Ok(v) = std::env::var("S3_STRICT_BUCKET_NAMES") {
            config.strict_bucket_names = MockConfig::parse_bool(&v);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}
