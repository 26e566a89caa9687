//! IAM-specific configuration.

use awsmock_core::{AccountId, MockConfig};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// IAM mock configuration.
///
/// # Examples
///
/// ```
/// use awsmock_iam::config::IamConfig;
///
/// let config = IamConfig::default();
/// assert_eq!(config.max_items, 100);
/// assert_eq!(config.max_access_keys, 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct IamConfig {
    /// Account that owns every IAM entity.
    #[builder(default)]
    pub account_id: AccountId,

    /// Page size used when a list call gives no `MaxItems`.
    #[builder(default = 100)]
    pub max_items: usize,

    /// Access keys a single user may hold.
    #[builder(default = 2)]
    pub max_access_keys: usize,

    /// Versions a single managed policy may hold.
    #[builder(default = 5)]
    pub max_policy_versions: usize,

    /// Whether the AWS managed policy catalog is loaded on start and reset.
    #[builder(default = true)]
    pub seed_aws_managed_policies: bool,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for IamConfig {
    fn default() -> Self {
        Self {
            account_id: AccountId::default(),
            max_items: 100,
            max_access_keys: 2,
            max_policy_versions: 5,
            seed_aws_managed_policies: true,
            log_level: String::from("info"),
        }
    }
}

impl IamConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `MOCK_ACCOUNT_ID` | `000000000000` |
    /// | `IAM_MAX_ITEMS` | `100` |
    /// | `IAM_MAX_ACCESS_KEYS` | `2` |
    /// | `IAM_MAX_POLICY_VERSIONS` | `5` |
    /// | `IAM_SEED_AWS_MANAGED_POLICIES` | `true` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("MOCK_ACCOUNT_ID") {
            match AccountId::new(v) {
                Ok(id) => config.account_id = id,
                Err(e) => tracing::warn!(error = %e, "ignoring MOCK_ACCOUNT_ID"),
            }
        }
        if let Ok(v) = std::env::var("IAM_MAX_ITEMS") {
            if let Ok(n) = v.parse::<usize>() {
                config.max_items = n;
            }
        }
        if let Ok(v) = std::env::var("IAM_MAX_ACCESS_KEYS") {
            if let Ok(n) = v.parse::<usize>() {
                config.max_access_keys = n;
            }
        }
        if let Ok(v) = std::env::var("IAM_MAX_POLICY_VERSIONS") {
            if let Ok(n) = v.parse::<usize>() {
                config.max_policy_versions = n;
            }
        }
        if let Ok(v) = std::env::var("IAM_SEED_AWS_MANAGED_POLICIES") {
            config.seed_aws_managed_policies = MockConfig::parse_bool(&v);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = IamConfig::default();
        assert_eq!(config.account_id.as_str(), "000000000000");
        assert_eq!(config.max_items, 100);
        assert_eq!(config.max_access_keys, 2);
        assert_eq!(config.max_policy_versions, 5);
        assert!(config.seed_aws_managed_policies);
    }

    #[test]
    fn test_should_build_with_typed_builder() {
        let config = IamConfig::builder()
            .max_items(2)
            .seed_aws_managed_policies(false)
            .build();
        assert_eq!(config.max_items, 2);
        assert!(!config.seed_aws_managed_policies);
        assert_eq!(config.max_policy_versions, 5);
    }

    #[test]
    fn test_should_serialize_to_camel_case_json() {
        let json = serde_json::to_string(&IamConfig::default()).expect("test serialization");
        assert!(json.contains("maxAccessKeys"));
        assert!(json.contains("seedAwsManagedPolicies"));
    }
}
