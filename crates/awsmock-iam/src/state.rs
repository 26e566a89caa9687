//! In-memory IAM state.
//!
//! All entities of one account live in a single [`IamStore`] guarded by one
//! lock, so cross-entity invariants (membership on both sides, attachment
//! counts) hold after every operation.

use std::collections::BTreeMap;

use awsmock_core::MarkerPager;

use crate::error::{IamError, IamResult};
use crate::types::{
    AccessKey, AccessKeyMetadata, AttachedPolicy, Group, InstanceProfile, InstanceProfileDetail,
    LoginProfile, ManagedPolicy, PolicyVersion, Role, User,
};

/// Every IAM entity of an account, keyed by name (policies by ARN).
#[derive(Debug, Default)]
pub struct IamStore {
    /// Users by name.
    pub users: BTreeMap<String, User>,
    /// Groups by name.
    pub groups: BTreeMap<String, Group>,
    /// Roles by name.
    pub roles: BTreeMap<String, Role>,
    /// Managed policies by ARN.
    pub policies: BTreeMap<String, ManagedPolicy>,
    /// Instance profiles by name.
    pub instance_profiles: BTreeMap<String, InstanceProfile>,
    /// Access keys by key ID.
    pub access_keys: BTreeMap<String, AccessKey>,
    /// Login profiles by user name.
    pub login_profiles: BTreeMap<String, LoginProfile>,
}

impl IamStore {
    /// The user named `name`.
    pub fn user(&self, name: &str) -> IamResult<&User> {
        self.users
            .get(name)
            .ok_or_else(|| IamError::no_such_entity("user", name))
    }

    /// Mutable access to the user named `name`.
    pub fn user_mut(&mut self, name: &str) -> IamResult<&mut User> {
        self.users
            .get_mut(name)
            .ok_or_else(|| IamError::no_such_entity("user", name))
    }

    /// The group named `name`.
    pub fn group(&self, name: &str) -> IamResult<&Group> {
        self.groups
            .get(name)
            .ok_or_else(|| IamError::no_such_entity("group", name))
    }

    /// Mutable access to the group named `name`.
    pub fn group_mut(&mut self, name: &str) -> IamResult<&mut Group> {
        self.groups
            .get_mut(name)
            .ok_or_else(|| IamError::no_such_entity("group", name))
    }

    /// The role named `name`.
    pub fn role(&self, name: &str) -> IamResult<&Role> {
        self.roles
            .get(name)
            .ok_or_else(|| IamError::no_such_entity("role", name))
    }

    /// Mutable access to the role named `name`.
    pub fn role_mut(&mut self, name: &str) -> IamResult<&mut Role> {
        self.roles
            .get_mut(name)
            .ok_or_else(|| IamError::no_such_entity("role", name))
    }

    /// The managed policy with `arn`.
    pub fn policy(&self, arn: &str) -> IamResult<&ManagedPolicy> {
        self.policies.get(arn).ok_or_else(|| no_such_policy(arn))
    }

    /// Mutable access to the managed policy with `arn`.
    pub fn policy_mut(&mut self, arn: &str) -> IamResult<&mut ManagedPolicy> {
        self.policies.get_mut(arn).ok_or_else(|| no_such_policy(arn))
    }

    /// The instance profile named `name`.
    pub fn instance_profile(&self, name: &str) -> IamResult<&InstanceProfile> {
        self.instance_profiles
            .get(name)
            .ok_or_else(|| IamError::no_such_entity("instance profile", name))
    }

    /// Mutable access to the instance profile named `name`.
    pub fn instance_profile_mut(&mut self, name: &str) -> IamResult<&mut InstanceProfile> {
        self.instance_profiles
            .get_mut(name)
            .ok_or_else(|| IamError::no_such_entity("instance profile", name))
    }

    /// An instance profile with its roles resolved.
    #[must_use]
    pub fn profile_detail(&self, profile: &InstanceProfile) -> InstanceProfileDetail {
        InstanceProfileDetail {
            profile: profile.clone(),
            roles: profile
                .role_names
                .iter()
                .filter_map(|name| self.roles.get(name).cloned())
                .collect(),
        }
    }

    /// Attached policies for a set of ARNs, in ARN order.
    #[must_use]
    pub fn attached<'a>(&self, arns: impl IntoIterator<Item = &'a String>) -> Vec<AttachedPolicy> {
        arns.into_iter()
            .filter_map(|arn| self.policies.get(arn))
            .map(|p| AttachedPolicy {
                policy_name: p.policy_name.clone(),
                policy_arn: p.arn.clone(),
            })
            .collect()
    }

    /// Access keys of `user_name`, in key ID order.
    pub fn keys_of<'a>(&'a self, user_name: &'a str) -> impl Iterator<Item = &'a AccessKey> + 'a {
        self.access_keys
            .values()
            .filter(move |k| k.user_name == user_name)
    }
}

fn no_such_policy(arn: &str) -> IamError {
    IamError::with_message(
        crate::error::IamErrorCode::NoSuchEntity,
        format!("Policy {arn} does not exist or is not attachable."),
    )
}

/// Marker pagers, one per listed item type.
#[derive(Debug, Default)]
pub struct Pagers {
    /// Users.
    pub users: MarkerPager<User>,
    /// Groups.
    pub groups: MarkerPager<Group>,
    /// Roles.
    pub roles: MarkerPager<Role>,
    /// Managed policies.
    pub policies: MarkerPager<ManagedPolicy>,
    /// Policy versions.
    pub versions: MarkerPager<PolicyVersion>,
    /// Attached policies.
    pub attached: MarkerPager<AttachedPolicy>,
    /// Inline policy names.
    pub names: MarkerPager<String>,
    /// Instance profiles.
    pub instance_profiles: MarkerPager<InstanceProfileDetail>,
    /// Access keys.
    pub access_keys: MarkerPager<AccessKeyMetadata>,
}

impl Pagers {
    /// Drop every outstanding marker.
    pub fn reset(&self) {
        self.users.reset();
        self.groups.reset();
        self.roles.reset();
        self.policies.reset();
        self.versions.reset();
        self.attached.reset();
        self.names.reset();
        self.instance_profiles.reset();
        self.access_keys.reset();
    }
}
