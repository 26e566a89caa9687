//! Configuration management for AWSMock.
//!
//! All configuration is driven by environment variables with defaults that
//! match a fresh AWS test account.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::types::{AccountId, AwsRegion};

/// Global configuration shared by every mocked service.
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct MockConfig {
    /// Default AWS region for clients that do not pick one.
    #[builder(default)]
    pub default_region: AwsRegion,
    /// Account that owns every resource created without explicit scoping.
    #[builder(default)]
    pub account_id: AccountId,
    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            default_region: AwsRegion::default(),
            account_id: AccountId::default(),
            log_level: "info".to_owned(),
        }
    }
}

impl MockConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DEFAULT_REGION` | `us-east-1` |
    /// | `MOCK_ACCOUNT_ID` | `000000000000` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// An invalid `MOCK_ACCOUNT_ID` is ignored and the default is kept.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("DEFAULT_REGION") {
            config.default_region = AwsRegion::new(v);
        }
        if let Ok(v) = std::env::var("MOCK_ACCOUNT_ID") {
            match AccountId::new(v) {
                Ok(id) => config.account_id = id,
                Err(e) => tracing::warn!(error = %e, "ignoring MOCK_ACCOUNT_ID"),
            }
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use awsmock_core::MockConfig;
    ///
    /// assert!(MockConfig::parse_bool("TRUE"));
    /// assert!(!MockConfig::parse_bool("no"));
    /// ```
    #[must_use]
    pub fn parse_bool(value: &str) -> bool {
        value == "1" || value.eq_ignore_ascii_case("true")
    }
}
