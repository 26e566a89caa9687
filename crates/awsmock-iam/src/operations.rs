//! IAM operation enum.

use std::fmt;

macro_rules! iam_operations {
    ($($(#[$meta:meta])* $name:ident,)+) => {
        /// All supported IAM actions.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum IamOperation {
            $($(#[$meta])* $name,)+
        }

        impl IamOperation {
            /// Every supported action.
            pub const ALL: &'static [Self] = &[$(Self::$name,)+];

            /// Returns the Query `Action` name.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$name => stringify!($name),)+
                }
            }

            /// Parse a Query `Action` name into an `IamOperation`.
            #[must_use]
            pub fn from_action(action: &str) -> Option<Self> {
                match action {
                    $(stringify!($name) => Some(Self::$name),)+
                    _ => None,
                }
            }
        }
    };
}

iam_operations! {
    // Users
    /// Create a user.
    CreateUser,
    /// Fetch a user.
    GetUser,
    /// Rename or re-path a user.
    UpdateUser,
    /// Delete a user.
    DeleteUser,
    /// List users.
    ListUsers,

    // Groups
    /// Create a group.
    CreateGroup,
    /// Fetch a group and its members.
    GetGroup,
    /// Rename or re-path a group.
    UpdateGroup,
    /// Delete a group.
    DeleteGroup,
    /// List groups.
    ListGroups,
    /// Add a user to a group.
    AddUserToGroup,
    /// Remove a user from a group.
    RemoveUserFromGroup,
    /// List the groups of a user.
    ListGroupsForUser,

    // Roles
    /// Create a role.
    CreateRole,
    /// Fetch a role.
    GetRole,
    /// Change a role's description or session duration.
    UpdateRole,
    /// Replace a role's trust policy.
    UpdateAssumeRolePolicy,
    /// Delete a role.
    DeleteRole,
    /// List roles.
    ListRoles,

    // Managed policies
    /// Create a managed policy.
    CreatePolicy,
    /// Fetch a managed policy.
    GetPolicy,
    /// Delete a managed policy.
    DeletePolicy,
    /// List managed policies.
    ListPolicies,
    /// Add a policy version.
    CreatePolicyVersion,
    /// Fetch a policy version.
    GetPolicyVersion,
    /// List policy versions.
    ListPolicyVersions,
    /// Delete a policy version.
    DeletePolicyVersion,
    /// Change the default policy version.
    SetDefaultPolicyVersion,

    // Attachments
    /// Attach a managed policy to a user.
    AttachUserPolicy,
    /// Detach a managed policy from a user.
    DetachUserPolicy,
    /// List managed policies attached to a user.
    ListAttachedUserPolicies,
    /// Attach a managed policy to a group.
    AttachGroupPolicy,
    /// Detach a managed policy from a group.
    DetachGroupPolicy,
    /// List managed policies attached to a group.
    ListAttachedGroupPolicies,
    /// Attach a managed policy to a role.
    AttachRolePolicy,
    /// Detach a managed policy from a role.
    DetachRolePolicy,
    /// List managed policies attached to a role.
    ListAttachedRolePolicies,

    // Inline policies
    /// Store an inline user policy.
    PutUserPolicy,
    /// Fetch an inline user policy.
    GetUserPolicy,
    /// Delete an inline user policy.
    DeleteUserPolicy,
    /// List inline user policies.
    ListUserPolicies,
    /// Store an inline group policy.
    PutGroupPolicy,
    /// Fetch an inline group policy.
    GetGroupPolicy,
    /// Delete an inline group policy.
    DeleteGroupPolicy,
    /// List inline group policies.
    ListGroupPolicies,
    /// Store an inline role policy.
    PutRolePolicy,
    /// Fetch an inline role policy.
    GetRolePolicy,
    /// Delete an inline role policy.
    DeleteRolePolicy,
    /// List inline role policies.
    ListRolePolicies,

    // Instance profiles
    /// Create an instance profile.
    CreateInstanceProfile,
    /// Fetch an instance profile.
    GetInstanceProfile,
    /// Delete an instance profile.
    DeleteInstanceProfile,
    /// Put a role into an instance profile.
    AddRoleToInstanceProfile,
    /// Take a role out of an instance profile.
    RemoveRoleFromInstanceProfile,
    /// List instance profiles.
    ListInstanceProfiles,
    /// List the instance profiles of a role.
    ListInstanceProfilesForRole,

    // Access keys
    /// Issue an access key.
    CreateAccessKey,
    /// Change an access key's status.
    UpdateAccessKey,
    /// Delete an access key.
    DeleteAccessKey,
    /// List a user's access keys.
    ListAccessKeys,

    // Login profiles
    /// Give a user a console password.
    CreateLoginProfile,
    /// Fetch a login profile.
    GetLoginProfile,
    /// Change a login profile.
    UpdateLoginProfile,
    /// Delete a login profile.
    DeleteLoginProfile,
}

impl fmt::Display for IamOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
