//! The S3 mock entry points.
//!
//! [`MockS3`] owns the state of one account/region scope. Individual S3
//! operations are implemented in the [`crate::ops`] submodules as inherent
//! methods. [`MockS3Registry`] hands out one `MockS3` per scope, all sharing
//! the global bucket-name index.

use std::sync::Arc;

use awsmock_core::{AccountId, AccountRegionStore, AwsRegion};
use tracing::info;

use crate::acl::Owner;
use crate::config::S3Config;
use crate::state::{GlobalBucketIndex, S3ServiceState};
use crate::utils::canonical_user_id;

/// In-memory S3 for one account/region scope.
///
/// # Examples
///
/// ```
/// use awsmock_s3::MockS3;
/// use awsmock_s3::config::S3Config;
///
/// let s3 = MockS3::new(S3Config::default());
/// assert_eq!(s3.region(), "us-east-1");
/// assert!(s3.state().list_buckets().is_empty());
/// ```
#[derive(Debug)]
pub struct MockS3 {
    pub(crate) state: Arc<S3ServiceState>,
    pub(crate) config: Arc<S3Config>,
    pub(crate) region: String,
    pub(crate) owner: Owner,
}

impl MockS3 {
    /// Create a standalone mock owned by the configured owner.
    #[must_use]
    pub fn new(config: S3Config) -> Self {
        let owner = Owner::new(config.owner_id.clone(), config.owner_display_name.clone());
        let region = config.default_region.clone();
        Self::scoped(
            Arc::new(config),
            region,
            owner,
            GlobalBucketIndex::default(),
        )
    }

    /// Create a mock for one scope that shares `index` with its siblings.
    #[must_use]
    pub fn scoped(
        config: Arc<S3Config>,
        region: impl Into<String>,
        owner: Owner,
        index: GlobalBucketIndex,
    ) -> Self {
        Self {
            state: Arc::new(S3ServiceState::new(index)),
            config,
            region: region.into(),
            owner,
        }
    }

    /// Returns a reference to the service state.
    #[must_use]
    pub fn state(&self) -> &S3ServiceState {
        &self.state
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &S3Config {
        &self.config
    }

    /// Region new buckets default to.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Owner of every bucket and object created through this mock.
    #[must_use]
    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Drop every bucket of this scope.
    pub fn reset(&self) {
        self.state.reset();
    }
}

/// Per-(account, region) S3 mocks with globally unique bucket names.
///
/// The default account uses the configured owner; any other account gets a
/// canonical ID derived from its account ID.
pub struct MockS3Registry {
    scopes: AccountRegionStore<MockS3>,
    index: GlobalBucketIndex,
}

impl std::fmt::Debug for MockS3Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockS3Registry")
            .field("scopes", &self.scopes.len())
            .field("buckets", &self.index.len())
            .finish()
    }
}

impl Default for MockS3Registry {
    fn default() -> Self {
        Self::new(S3Config::default())
    }
}

impl MockS3Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(config: S3Config) -> Self {
        let config = Arc::new(config);
        let index = GlobalBucketIndex::default();
        let shared = Arc::clone(&index);
        let scopes = AccountRegionStore::with_factory(move |account: &AccountId, region: &AwsRegion| {
            let owner = if account.as_str() == AccountId::DEFAULT {
                Owner::new(config.owner_id.clone(), config.owner_display_name.clone())
            } else {
                Owner::new(canonical_user_id(account.as_str()), account.as_str())
            };
            MockS3::scoped(
                Arc::clone(&config),
                region.as_str(),
                owner,
                Arc::clone(&shared),
            )
        });
        Self { scopes, index }
    }

    /// The mock for `(account, region)`, created on first use.
    #[must_use]
    pub fn get(&self, account: &AccountId, region: &AwsRegion) -> Arc<MockS3> {
        self.scopes.get_or_create(account, region)
    }

    /// Drop the data of one scope.
    pub fn reset_scope(&self, account: &AccountId, region: &AwsRegion) {
        if let Some(s3) = self.scopes.remove(account, region) {
            s3.reset();
        }
    }

    /// Drop every scope and release every bucket name.
    pub fn reset(&self) {
        info!(scopes = self.scopes.len(), "resetting S3 registry");
        self.scopes.reset();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::S3ServiceError;
    use crate::model::CreateBucketInput;

    fn create_input(bucket: &str) -> CreateBucketInput {
        CreateBucketInput {
            bucket: bucket.to_owned(),
            ..CreateBucketInput::default()
        }
    }

    #[test]
    fn test_should_create_mock_with_defaults() {
        let s3 = MockS3::new(S3Config::default());
        assert_eq!(s3.owner().display_name, "me");
        assert!(format!("{s3:?}").contains("MockS3"));
    }

    #[test]
    fn test_should_reset_state() {
        let s3 = MockS3::new(S3Config::default());
        s3.create_bucket(create_input("test-bucket"))
            .unwrap_or_else(|e| panic!("create failed: {e}"));
        assert!(s3.state().bucket_exists("test-bucket"));

        s3.reset();
        assert!(!s3.state().bucket_exists("test-bucket"));
    }

    #[test]
    fn test_should_scope_buckets_but_share_names() {
        let registry = MockS3Registry::default();
        let default_account = AccountId::default();
        let other = AccountId::new("123456789012").unwrap_or_else(|e| panic!("account: {e}"));
        let region = AwsRegion::default();

        let mine = registry.get(&default_account, &region);
        let theirs = registry.get(&other, &region);
        assert_ne!(mine.owner().id, theirs.owner().id);
        assert_eq!(theirs.owner().display_name, "123456789012");

        mine.create_bucket(create_input("shared-name"))
            .unwrap_or_else(|e| panic!("create failed: {e}"));
        assert!(
            matches!(
                theirs.create_bucket(create_input("shared-name")),
                Err(S3ServiceError::BucketAlreadyExists { .. })
            ),
            "other account should see BucketAlreadyExists"
        );
        assert!(theirs.list_buckets().buckets.is_empty());

        registry.reset_scope(&default_account, &region);
        theirs
            .create_bucket(create_input("shared-name"))
            .unwrap_or_else(|e| panic!("name should be free after reset: {e}"));
    }
}
