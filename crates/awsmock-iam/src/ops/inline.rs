//! Inline policy handlers for users, groups and roles.

use std::collections::BTreeMap;

use awsmock_core::Page;
use tracing::debug;

use super::attachments::Principal;
use crate::error::{IamError, IamErrorCode, IamResult};
use crate::provider::MockIam;
use crate::state::IamStore;
use crate::types::InlinePolicy;
use crate::validation::{MAX_LONG_NAME_LEN, validate_name, validate_policy_document};

impl Principal {
    fn inline<'a>(self, store: &'a IamStore, name: &str) -> IamResult<&'a BTreeMap<String, String>> {
        Ok(match self {
            Self::User => &store.user(name)?.inline_policies,
            Self::Group => &store.group(name)?.inline_policies,
            Self::Role => &store.role(name)?.inline_policies,
        })
    }

    fn inline_mut<'a>(
        self,
        store: &'a mut IamStore,
        name: &str,
    ) -> IamResult<&'a mut BTreeMap<String, String>> {
        Ok(match self {
            Self::User => &mut store.user_mut(name)?.inline_policies,
            Self::Group => &mut store.group_mut(name)?.inline_policies,
            Self::Role => &mut store.role_mut(name)?.inline_policies,
        })
    }
}

fn no_such_policy(principal: Principal, owner: &str, policy_name: &str) -> IamError {
    IamError::with_message(
        IamErrorCode::NoSuchEntity,
        format!(
            "The {} policy with name {policy_name} cannot be found for {owner}.",
            principal.as_str().to_lowercase()
        ),
    )
}

impl MockIam {
    fn put_inline(
        &self,
        principal: Principal,
        owner: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> IamResult<()> {
        validate_name("policyName", policy_name, MAX_LONG_NAME_LEN)?;
        validate_policy_document(policy_document)?;
        let mut store = self.store.write();
        principal
            .inline_mut(&mut store, owner)?
            .insert(policy_name.to_owned(), policy_document.to_owned());
        debug!(principal = principal.as_str(), %owner, policy = %policy_name, "inline policy stored");
        Ok(())
    }

    fn get_inline(&self, principal: Principal, owner: &str, policy_name: &str) -> IamResult<InlinePolicy> {
        let store = self.store.read();
        let document = principal
            .inline(&store, owner)?
            .get(policy_name)
            .ok_or_else(|| no_such_policy(principal, owner, policy_name))?;
        Ok(InlinePolicy {
            owner_name: owner.to_owned(),
            policy_name: policy_name.to_owned(),
            policy_document: document.clone(),
        })
    }

    fn delete_inline(&self, principal: Principal, owner: &str, policy_name: &str) -> IamResult<()> {
        let mut store = self.store.write();
        principal
            .inline_mut(&mut store, owner)?
            .remove(policy_name)
            .ok_or_else(|| no_such_policy(principal, owner, policy_name))?;
        debug!(principal = principal.as_str(), %owner, policy = %policy_name, "inline policy deleted");
        Ok(())
    }

    fn list_inline(
        &self,
        principal: Principal,
        owner: &str,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<String>> {
        let names = principal
            .inline(&self.store.read(), owner)?
            .keys()
            .cloned()
            .collect();
        self.page(
            &self.pagers.names,
            &format!("List{}Policies:{owner}", principal.as_str()),
            names,
            marker,
            max_items,
        )
    }

    /// Create or replace an inline policy of a user.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, `ValidationError`, or `MalformedPolicyDocument`.
    pub fn put_user_policy(&self, user_name: &str, policy_name: &str, policy_document: &str) -> IamResult<()> {
        self.put_inline(Principal::User, user_name, policy_name, policy_document)
    }

    /// Fetch an inline policy of a user.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown user or policy.
    pub fn get_user_policy(&self, user_name: &str, policy_name: &str) -> IamResult<InlinePolicy> {
        self.get_inline(Principal::User, user_name, policy_name)
    }

    /// Delete an inline policy of a user.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown user or policy.
    pub fn delete_user_policy(&self, user_name: &str, policy_name: &str) -> IamResult<()> {
        self.delete_inline(Principal::User, user_name, policy_name)
    }

    /// List inline policy names of a user.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or pagination errors.
    pub fn list_user_policies(
        &self,
        user_name: &str,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<String>> {
        self.list_inline(Principal::User, user_name, marker, max_items)
    }

    /// Create or replace an inline policy of a group.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, `ValidationError`, or `MalformedPolicyDocument`.
    pub fn put_group_policy(&self, group_name: &str, policy_name: &str, policy_document: &str) -> IamResult<()> {
        self.put_inline(Principal::Group, group_name, policy_name, policy_document)
    }

    /// Fetch an inline policy of a group.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown group or policy.
    pub fn get_group_policy(&self, group_name: &str, policy_name: &str) -> IamResult<InlinePolicy> {
        self.get_inline(Principal::Group, group_name, policy_name)
    }

    /// Delete an inline policy of a group.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown group or policy.
    pub fn delete_group_policy(&self, group_name: &str, policy_name: &str) -> IamResult<()> {
        self.delete_inline(Principal::Group, group_name, policy_name)
    }

    /// List inline policy names of a group.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or pagination errors.
    pub fn list_group_policies(
        &self,
        group_name: &str,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<String>> {
        self.list_inline(Principal::Group, group_name, marker, max_items)
    }

    /// Create or replace an inline policy of a role.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, `ValidationError`, or `MalformedPolicyDocument`.
    pub fn put_role_policy(&self, role_name: &str, policy_name: &str, policy_document: &str) -> IamResult<()> {
        self.put_inline(Principal::Role, role_name, policy_name, policy_document)
    }

    /// Fetch an inline policy of a role.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown role or policy.
    pub fn get_role_policy(&self, role_name: &str, policy_name: &str) -> IamResult<InlinePolicy> {
        self.get_inline(Principal::Role, role_name, policy_name)
    }

    /// Delete an inline policy of a role.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown role or policy.
    pub fn delete_role_policy(&self, role_name: &str, policy_name: &str) -> IamResult<()> {
        self.delete_inline(Principal::Role, role_name, policy_name)
    }

    /// List inline policy names of a role.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or pagination errors.
    pub fn list_role_policies(
        &self,
        role_name: &str,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<String>> {
        self.list_inline(Principal::Role, role_name, marker, max_items)
    }
}
