//! The IAM mock entry point.
//!
//! [`MockIam`] owns the entities of one account. Operations are implemented
//! as inherent methods in the `ops` submodules; the Query-protocol
//! front end lives in [`crate::query`].

use awsmock_core::{Arn, MarkerPager, Page};
use parking_lot::RwLock;
use tracing::info;

use crate::config::IamConfig;
use crate::error::IamResult;
use crate::managed::aws_managed_policies;
use crate::state::{IamStore, Pagers};
use crate::validation::validate_path_prefix;

/// In-memory IAM for one account.
///
/// # Examples
///
/// ```
/// use awsmock_iam::{IamConfig, MockIam};
///
/// let iam = MockIam::new(IamConfig::default());
/// let user = iam.create_user("alice", None)?;
/// assert_eq!(user.arn, "arn:aws:iam::000000000000:user/alice");
/// # Ok::<(), awsmock_iam::IamError>(())
/// ```
#[derive(Debug)]
pub struct MockIam {
    pub(crate) config: IamConfig,
    pub(crate) store: RwLock<IamStore>,
    pub(crate) pagers: Pagers,
}

impl Default for MockIam {
    fn default() -> Self {
        Self::new(IamConfig::default())
    }
}

impl MockIam {
    /// Create a mock, seeding the AWS managed policy catalog when configured.
    #[must_use]
    pub fn new(config: IamConfig) -> Self {
        let iam = Self {
            config,
            store: RwLock::new(IamStore::default()),
            pagers: Pagers::default(),
        };
        iam.seed();
        iam
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &IamConfig {
        &self.config
    }

    /// Drop every entity and marker, then re-seed the managed policy catalog.
    pub fn reset(&self) {
        info!(account = %self.config.account_id, "resetting IAM state");
        *self.store.write() = IamStore::default();
        self.pagers.reset();
        self.seed();
    }

    fn seed(&self) {
        if !self.config.seed_aws_managed_policies {
            return;
        }
        let mut store = self.store.write();
        for policy in aws_managed_policies() {
            store.policies.insert(policy.arn.clone(), policy);
        }
    }

    /// ARN of an entity of this account: `arn:aws:iam::{account}:{kind}{path}{name}`.
    pub(crate) fn arn(&self, kind: &str, path: &str, name: &str) -> String {
        Arn::iam(&self.config.account_id, format!("{kind}{path}{name}")).to_string()
    }

    /// Cut one page from `items` or from the remainder behind `marker`.
    pub(crate) fn page<T: Clone>(
        &self,
        pager: &MarkerPager<T>,
        scope: &str,
        items: Vec<T>,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<T>> {
        let max_items = max_items.unwrap_or(self.config.max_items);
        Ok(pager.paginate(scope, items, marker, max_items)?)
    }
}

/// Validate an optional path prefix and turn it into a filter.
pub(crate) fn path_filter(prefix: Option<&str>) -> IamResult<impl Fn(&str) -> bool + '_> {
    if let Some(p) = prefix {
        validate_path_prefix(p)?;
    }
    Ok(move |path: &str| prefix.is_none_or(|p| path.starts_with(p)))
}
