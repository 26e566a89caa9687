//! In-memory IAM mock for tests.
//!
//! Users, groups, roles, managed and inline policies, instance profiles,
//! access keys and login profiles for a single account, reachable through
//! synchronous methods on [`MockIam`] or through the Query protocol via
//! [`MockIam::handle_query`].
//!
//! All entities live behind one lock so that cross-entity rules (group
//! membership, attachment counts, delete conflicts) are checked and applied
//! atomically. List operations page with single-use markers.
//!
//! # Example
//!
//! ```
//! use awsmock_iam::{IamConfig, MockIam};
//!
//! let iam = MockIam::new(IamConfig::default());
//! iam.create_user("alice", None)?;
//! iam.create_group("devs", None)?;
//! iam.add_user_to_group("devs", "alice")?;
//! iam.attach_group_policy("devs", "arn:aws:iam::aws:policy/ReadOnlyAccess")?;
//!
//! let groups = iam.list_groups_for_user("alice", None, None)?;
//! assert_eq!(groups.items[0].group_name, "devs");
//!
//! let resp = iam.handle_query_string("Action=ListAttachedGroupPolicies&GroupName=devs");
//! assert!(resp.text().contains("<PolicyName>ReadOnlyAccess</PolicyName>"));
//! # Ok::<(), awsmock_iam::IamError>(())
//! ```

pub mod config;
pub mod error;
pub mod managed;
mod ops;
pub mod operations;
pub mod provider;
pub mod query;
pub mod state;
pub mod types;
pub mod validation;

pub use config::IamConfig;
pub use error::{IamError, IamErrorCode, IamResult};
pub use operations::IamOperation;
pub use ops::instance_profiles::MAX_ROLES_PER_PROFILE;
pub use ops::roles::DEFAULT_SESSION_DURATION;
pub use provider::MockIam;
pub use query::QueryResponse;
pub use types::{
    AccessKey, AccessKeyMetadata, AccessKeyStatus, AttachedPolicy, CreatePolicyInput,
    CreateRoleInput, Group, GroupDetail, InlinePolicy, InstanceProfile, InstanceProfileDetail,
    ListPoliciesInput, LoginProfile, ManagedPolicy, PolicyScope, PolicyVersion, Role, User,
};
