//! Role handlers.

use std::collections::{BTreeMap, BTreeSet};

use awsmock_core::Page;
use chrono::Utc;
use tracing::{debug, info};

use crate::error::{IamError, IamResult};
use crate::provider::{MockIam, path_filter};
use crate::types::{CreateRoleInput, Role};
use crate::validation::{
    MAX_SHORT_NAME_LEN, validate_description, validate_name, validate_path,
    validate_policy_document, validate_session_duration,
};

/// Session duration of roles created without one.
pub const DEFAULT_SESSION_DURATION: i32 = 3600;

impl MockIam {
    /// Create a role.
    ///
    /// # Errors
    ///
    /// `ValidationError`, `MalformedPolicyDocument` for a bad trust policy,
    /// or `EntityAlreadyExists`.
    pub fn create_role(&self, input: CreateRoleInput) -> IamResult<Role> {
        validate_name("roleName", &input.role_name, MAX_SHORT_NAME_LEN)?;
        let path = input.path.as_deref().unwrap_or("/");
        validate_path(path)?;
        validate_policy_document(&input.assume_role_policy_document)?;
        if let Some(description) = &input.description {
            validate_description(description)?;
        }
        let max_session_duration = input.max_session_duration.unwrap_or(DEFAULT_SESSION_DURATION);
        validate_session_duration(max_session_duration)?;

        let mut store = self.store.write();
        if store.roles.contains_key(&input.role_name) {
            return Err(IamError::already_exists("Role", &input.role_name));
        }
        let role = Role {
            arn: self.arn("role", path, &input.role_name),
            role_id: awsmock_core::ids::unique_id("AROA"),
            path: path.to_owned(),
            create_date: Utc::now(),
            assume_role_policy_document: input.assume_role_policy_document,
            description: input.description,
            max_session_duration,
            attached_policies: BTreeSet::new(),
            inline_policies: BTreeMap::new(),
            instance_profiles: BTreeSet::new(),
            role_name: input.role_name,
        };
        store.roles.insert(role.role_name.clone(), role.clone());
        info!(role = %role.role_name, "role created");
        Ok(role)
    }

    /// Fetch a role.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`.
    pub fn get_role(&self, role_name: &str) -> IamResult<Role> {
        self.store.read().role(role_name).cloned()
    }

    /// Change a role's description and/or maximum session duration.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` or `ValidationError`.
    pub fn update_role(
        &self,
        role_name: &str,
        description: Option<&str>,
        max_session_duration: Option<i32>,
    ) -> IamResult<()> {
        if let Some(d) = description {
            validate_description(d)?;
        }
        if let Some(seconds) = max_session_duration {
            validate_session_duration(seconds)?;
        }
        let mut store = self.store.write();
        let role = store.role_mut(role_name)?;
        if let Some(d) = description {
            role.description = Some(d.to_owned());
        }
        if let Some(seconds) = max_session_duration {
            role.max_session_duration = seconds;
        }
        debug!(role = %role_name, "role updated");
        Ok(())
    }

    /// Replace a role's trust policy.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` or `MalformedPolicyDocument`.
    pub fn update_assume_role_policy(&self, role_name: &str, policy_document: &str) -> IamResult<()> {
        validate_policy_document(policy_document)?;
        let mut store = self.store.write();
        policy_document.clone_into(&mut store.role_mut(role_name)?.assume_role_policy_document);
        debug!(role = %role_name, "trust policy replaced");
        Ok(())
    }

    /// Delete a role without policies or instance profiles.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` or `DeleteConflict`.
    pub fn delete_role(&self, role_name: &str) -> IamResult<()> {
        let mut store = self.store.write();
        let role = store.role(role_name)?;
        let conflict = if !role.instance_profiles.is_empty() {
            Some("from instance profiles")
        } else if !role.attached_policies.is_empty() {
            Some("attached policies")
        } else if !role.inline_policies.is_empty() {
            Some("inline policies")
        } else {
            None
        };
        if let Some(what) = conflict {
            return Err(IamError::delete_conflict(format!(
                "Cannot delete entity, must remove {what} first."
            )));
        }
        store.roles.remove(role_name);
        info!(role = %role_name, "role deleted");
        Ok(())
    }

    /// List roles in name order.
    ///
    /// # Errors
    ///
    /// `ValidationError` or `InvalidInput` from paging.
    pub fn list_roles(
        &self,
        path_prefix: Option<&str>,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<Role>> {
        let filter = path_filter(path_prefix)?;
        let roles = self
            .store
            .read()
            .roles
            .values()
            .filter(|r| filter(r.path.as_str()))
            .cloned()
            .collect();
        let scope = format!("ListRoles:{}", path_prefix.unwrap_or("/"));
        self.page(&self.pagers.roles, &scope, roles, marker, max_items)
    }
}
