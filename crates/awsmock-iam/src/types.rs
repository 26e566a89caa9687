//! IAM entity types.
//!
//! Users, groups and roles keep their own attachment and inline policy sets.
//! Membership is recorded on both sides (`User::groups` and
//! `Group::members`) and every mutation updates both.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::IamError;

/// An IAM user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User name, unique within the account.
    pub user_name: String,
    /// Stable unique ID (`AIDA...`).
    pub user_id: String,
    /// Full ARN, including the path.
    pub arn: String,
    /// Path, `/` by default.
    pub path: String,
    /// Creation time.
    pub create_date: DateTime<Utc>,
    /// Names of the groups the user belongs to.
    pub groups: BTreeSet<String>,
    /// ARNs of attached managed policies.
    pub attached_policies: BTreeSet<String>,
    /// Inline policies, name to document.
    pub inline_policies: BTreeMap<String, String>,
}

/// An IAM group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Group name, unique within the account.
    pub group_name: String,
    /// Stable unique ID (`AGPA...`).
    pub group_id: String,
    /// Full ARN, including the path.
    pub arn: String,
    /// Path, `/` by default.
    pub path: String,
    /// Creation time.
    pub create_date: DateTime<Utc>,
    /// Names of member users.
    pub members: BTreeSet<String>,
    /// ARNs of attached managed policies.
    pub attached_policies: BTreeSet<String>,
    /// Inline policies, name to document.
    pub inline_policies: BTreeMap<String, String>,
}

/// An IAM role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    /// Role name, unique within the account.
    pub role_name: String,
    /// Stable unique ID (`AROA...`).
    pub role_id: String,
    /// Full ARN, including the path.
    pub arn: String,
    /// Path, `/` by default.
    pub path: String,
    /// Creation time.
    pub create_date: DateTime<Utc>,
    /// Trust policy.
    pub assume_role_policy_document: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Maximum session duration in seconds.
    pub max_session_duration: i32,
    /// ARNs of attached managed policies.
    pub attached_policies: BTreeSet<String>,
    /// Inline policies, name to document.
    pub inline_policies: BTreeMap<String, String>,
    /// Names of the instance profiles holding this role.
    pub instance_profiles: BTreeSet<String>,
}

/// Role creation parameters.
#[derive(Debug, Clone, Default)]
pub struct CreateRoleInput {
    /// Role name.
    pub role_name: String,
    /// Path, `/` when absent.
    pub path: Option<String>,
    /// Trust policy.
    pub assume_role_policy_document: String,
    /// Description.
    pub description: Option<String>,
    /// Maximum session duration, 3600 when absent.
    pub max_session_duration: Option<i32>,
}

/// Which managed policies a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolicyScope {
    /// Both AWS and customer managed policies.
    #[default]
    All,
    /// AWS managed policies.
    Aws,
    /// Customer managed policies.
    Local,
}

impl PolicyScope {
    /// Returns the wire name of the scope.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Aws => "AWS",
            Self::Local => "Local",
        }
    }
}

impl fmt::Display for PolicyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyScope {
    type Err = IamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" => Ok(Self::All),
            "AWS" => Ok(Self::Aws),
            "Local" => Ok(Self::Local),
            other => Err(IamError::validation(format!(
                "Invalid scope {other}: must be one of All, AWS, Local"
            ))),
        }
    }
}

/// One version of a managed policy document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyVersion {
    /// `v1`, `v2`, ...
    pub version_id: String,
    /// Policy document.
    pub document: String,
    /// Whether this is the version in effect.
    pub is_default_version: bool,
    /// Creation time.
    pub create_date: DateTime<Utc>,
}

/// A managed policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedPolicy {
    /// Policy name.
    pub policy_name: String,
    /// Stable unique ID (`ANPA...`).
    pub policy_id: String,
    /// Full ARN; AWS managed policies use the `aws` account.
    pub arn: String,
    /// Path, `/` by default.
    pub path: String,
    /// Description.
    pub description: Option<String>,
    /// Creation time.
    pub create_date: DateTime<Utc>,
    /// Time of the last default version change.
    pub update_date: DateTime<Utc>,
    /// Version in effect.
    pub default_version_id: String,
    /// Number of users, groups and roles the policy is attached to.
    pub attachment_count: usize,
    /// `Aws` or `Local`; never `All`.
    pub scope: PolicyScope,
    /// Versions, oldest first.
    pub versions: Vec<PolicyVersion>,
    /// Number used for the next version ID.
    pub next_version: u32,
}

impl ManagedPolicy {
    /// The version with `version_id`.
    #[must_use]
    pub fn version(&self, version_id: &str) -> Option<&PolicyVersion> {
        self.versions.iter().find(|v| v.version_id == version_id)
    }

    /// Document of the default version.
    #[must_use]
    pub fn default_document(&self) -> Option<&str> {
        self.version(&self.default_version_id).map(|v| v.document.as_str())
    }

    /// Mark `version_id` as the default version.
    pub(crate) fn make_default(&mut self, version_id: &str, now: DateTime<Utc>) {
        for v in &mut self.versions {
            v.is_default_version = v.version_id == version_id;
        }
        version_id.clone_into(&mut self.default_version_id);
        self.update_date = now;
    }
}

/// Managed policy creation parameters.
#[derive(Debug, Clone, Default)]
pub struct CreatePolicyInput {
    /// Policy name.
    pub policy_name: String,
    /// Path, `/` when absent.
    pub path: Option<String>,
    /// Document of version `v1`.
    pub policy_document: String,
    /// Description.
    pub description: Option<String>,
}

/// Managed policy listing parameters.
#[derive(Debug, Clone, Default)]
pub struct ListPoliciesInput {
    /// Which policies to include.
    pub scope: PolicyScope,
    /// Only policies with a non-zero attachment count.
    pub only_attached: bool,
    /// Path prefix filter.
    pub path_prefix: Option<String>,
    /// Marker from a previous page.
    pub marker: Option<String>,
    /// Page size.
    pub max_items: Option<usize>,
}

/// A managed policy as listed on a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedPolicy {
    /// Policy name.
    pub policy_name: String,
    /// Policy ARN.
    pub policy_arn: String,
}

/// An inline policy of a user, group or role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinePolicy {
    /// Name of the owning user, group or role.
    pub owner_name: String,
    /// Policy name.
    pub policy_name: String,
    /// Policy document.
    pub policy_document: String,
}

/// An instance profile as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceProfile {
    /// Instance profile name.
    pub instance_profile_name: String,
    /// Stable unique ID (`AIPA...`).
    pub instance_profile_id: String,
    /// Full ARN, including the path.
    pub arn: String,
    /// Path, `/` by default.
    pub path: String,
    /// Creation time.
    pub create_date: DateTime<Utc>,
    /// Names of the contained roles; at most one.
    pub role_names: Vec<String>,
}

/// An instance profile together with its roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceProfileDetail {
    /// The profile.
    pub profile: InstanceProfile,
    /// The contained roles.
    pub roles: Vec<Role>,
}

/// A group together with one page of its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDetail {
    /// The group.
    pub group: Group,
    /// Member users.
    pub users: awsmock_core::Page<User>,
}

/// Access key status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessKeyStatus {
    /// Usable.
    #[default]
    Active,
    /// Disabled.
    Inactive,
}

impl AccessKeyStatus {
    /// Returns the wire name of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl FromStr for AccessKeyStatus {
    type Err = IamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            other => Err(IamError::validation(format!(
                "Invalid status {other}: must be Active or Inactive"
            ))),
        }
    }
}

/// An access key, including its secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessKey {
    /// Owning user.
    pub user_name: String,
    /// Key ID (`AKIA...`).
    pub access_key_id: String,
    /// Secret, returned only on creation.
    pub secret_access_key: String,
    /// Status.
    pub status: AccessKeyStatus,
    /// Creation time.
    pub create_date: DateTime<Utc>,
}

impl AccessKey {
    /// The key without its secret.
    #[must_use]
    pub fn metadata(&self) -> AccessKeyMetadata {
        AccessKeyMetadata {
            user_name: self.user_name.clone(),
            access_key_id: self.access_key_id.clone(),
            status: self.status,
            create_date: self.create_date,
        }
    }
}

/// An access key without its secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessKeyMetadata {
    /// Owning user.
    pub user_name: String,
    /// Key ID.
    pub access_key_id: String,
    /// Status.
    pub status: AccessKeyStatus,
    /// Creation time.
    pub create_date: DateTime<Utc>,
}

/// Console password settings of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginProfile {
    /// Owning user.
    pub user_name: String,
    /// Creation time.
    pub create_date: DateTime<Utc>,
    /// Whether the user must choose a new password at next sign-in.
    pub password_reset_required: bool,
}
