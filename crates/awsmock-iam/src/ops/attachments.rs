//! Managed policy attachment handlers for users, groups and roles.

use std::collections::BTreeSet;

use awsmock_core::Page;
use tracing::debug;

use crate::error::{IamError, IamErrorCode, IamResult};
use crate::provider::{MockIam, path_filter};
use crate::state::IamStore;
use crate::types::AttachedPolicy;

/// The kind of entity a policy is attached to or embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Principal {
    User,
    Group,
    Role,
}

impl Principal {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Group => "Group",
            Self::Role => "Role",
        }
    }

    pub(crate) fn attached<'a>(
        self,
        store: &'a IamStore,
        name: &str,
    ) -> IamResult<&'a BTreeSet<String>> {
        Ok(match self {
            Self::User => &store.user(name)?.attached_policies,
            Self::Group => &store.group(name)?.attached_policies,
            Self::Role => &store.role(name)?.attached_policies,
        })
    }

    pub(crate) fn attached_mut<'a>(
        self,
        store: &'a mut IamStore,
        name: &str,
    ) -> IamResult<&'a mut BTreeSet<String>> {
        Ok(match self {
            Self::User => &mut store.user_mut(name)?.attached_policies,
            Self::Group => &mut store.group_mut(name)?.attached_policies,
            Self::Role => &mut store.role_mut(name)?.attached_policies,
        })
    }
}

impl MockIam {
    fn attach(&self, principal: Principal, name: &str, policy_arn: &str) -> IamResult<()> {
        let mut store = self.store.write();
        store.policy(policy_arn)?;
        let newly_attached = principal
            .attached_mut(&mut store, name)?
            .insert(policy_arn.to_owned());
        if newly_attached {
            store.policy_mut(policy_arn)?.attachment_count += 1;
            debug!(principal = principal.as_str(), %name, policy = %policy_arn, "policy attached");
        }
        Ok(())
    }

    fn detach(&self, principal: Principal, name: &str, policy_arn: &str) -> IamResult<()> {
        let mut store = self.store.write();
        store.policy(policy_arn)?;
        if !principal.attached_mut(&mut store, name)?.remove(policy_arn) {
            return Err(IamError::with_message(
                IamErrorCode::NoSuchEntity,
                format!("Policy {policy_arn} was not found."),
            ));
        }
        let policy = store.policy_mut(policy_arn)?;
        policy.attachment_count = policy.attachment_count.saturating_sub(1);
        debug!(principal = principal.as_str(), %name, policy = %policy_arn, "policy detached");
        Ok(())
    }

    fn list_attached(
        &self,
        principal: Principal,
        name: &str,
        path_prefix: Option<&str>,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<AttachedPolicy>> {
        let filter = path_filter(path_prefix)?;
        let attached = {
            let store = self.store.read();
            let arns = principal
                .attached(&store, name)?
                .iter()
                .filter(|arn| store.policies.get(*arn).is_some_and(|p| filter(p.path.as_str())));
            store.attached(arns)
        };
        self.page(
            &self.pagers.attached,
            &format!("ListAttached{}Policies:{name}", principal.as_str()),
            attached,
            marker,
            max_items,
        )
    }

    /// Attach a managed policy to a user; re-attaching is a no-op.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown user or policy.
    pub fn attach_user_policy(&self, user_name: &str, policy_arn: &str) -> IamResult<()> {
        self.attach(Principal::User, user_name, policy_arn)
    }

    /// Detach a managed policy from a user.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown user or policy, or one not attached.
    pub fn detach_user_policy(&self, user_name: &str, policy_arn: &str) -> IamResult<()> {
        self.detach(Principal::User, user_name, policy_arn)
    }

    /// List managed policies attached to a user.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or pagination errors.
    pub fn list_attached_user_policies(
        &self,
        user_name: &str,
        path_prefix: Option<&str>,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<AttachedPolicy>> {
        self.list_attached(Principal::User, user_name, path_prefix, marker, max_items)
    }

    /// Attach a managed policy to a group; re-attaching is a no-op.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown group or policy.
    pub fn attach_group_policy(&self, group_name: &str, policy_arn: &str) -> IamResult<()> {
        self.attach(Principal::Group, group_name, policy_arn)
    }

    /// Detach a managed policy from a group.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown group or policy, or one not attached.
    pub fn detach_group_policy(&self, group_name: &str, policy_arn: &str) -> IamResult<()> {
        self.detach(Principal::Group, group_name, policy_arn)
    }

    /// List managed policies attached to a group.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or pagination errors.
    pub fn list_attached_group_policies(
        &self,
        group_name: &str,
        path_prefix: Option<&str>,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<AttachedPolicy>> {
        self.list_attached(Principal::Group, group_name, path_prefix, marker, max_items)
    }

    /// Attach a managed policy to a role; re-attaching is a no-op.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown role or policy.
    pub fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> IamResult<()> {
        self.attach(Principal::Role, role_name, policy_arn)
    }

    /// Detach a managed policy from a role.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown role or policy, or one not attached.
    pub fn detach_role_policy(&self, role_name: &str, policy_arn: &str) -> IamResult<()> {
        self.detach(Principal::Role, role_name, policy_arn)
    }

    /// List managed policies attached to a role.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or pagination errors.
    pub fn list_attached_role_policies(
        &self,
        role_name: &str,
        path_prefix: Option<&str>,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<AttachedPolicy>> {
        self.list_attached(Principal::Role, role_name, path_prefix, marker, max_items)
    }
}
