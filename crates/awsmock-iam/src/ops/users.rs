//! User handlers.

use std::collections::{BTreeMap, BTreeSet};

use awsmock_core::Page;
use chrono::Utc;
use tracing::info;

use crate::error::{IamError, IamResult};
use crate::provider::{MockIam, path_filter};
use crate::types::User;
use crate::validation::{MAX_SHORT_NAME_LEN, validate_name, validate_path};

impl MockIam {
    /// Create a user.
    ///
    /// # Errors
    ///
    /// `ValidationError` for a bad name or path, `EntityAlreadyExists` when
    /// the name is taken.
    pub fn create_user(&self, user_name: &str, path: Option<&str>) -> IamResult<User> {
        validate_name("userName", user_name, MAX_SHORT_NAME_LEN)?;
        let path = path.unwrap_or("/");
        validate_path(path)?;

        let mut store = self.store.write();
        if store.users.contains_key(user_name) {
            return Err(IamError::already_exists("User", user_name));
        }
        let user = User {
            user_name: user_name.to_owned(),
            user_id: awsmock_core::ids::unique_id("AIDA"),
            arn: self.arn("user", path, user_name),
            path: path.to_owned(),
            create_date: Utc::now(),
            groups: BTreeSet::new(),
            attached_policies: BTreeSet::new(),
            inline_policies: BTreeMap::new(),
        };
        store.users.insert(user_name.to_owned(), user.clone());
        info!(user = %user_name, "user created");
        Ok(user)
    }

    /// Fetch a user.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` when the user does not exist.
    pub fn get_user(&self, user_name: &str) -> IamResult<User> {
        self.store.read().user(user_name).cloned()
    }

    /// Rename and/or re-path a user.
    ///
    /// Group memberships, access keys and the login profile follow the new
    /// name.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, `EntityAlreadyExists` for a taken new name, or
    /// `ValidationError`.
    pub fn update_user(
        &self,
        user_name: &str,
        new_user_name: Option<&str>,
        new_path: Option<&str>,
    ) -> IamResult<()> {
        if let Some(name) = new_user_name {
            validate_name("newUserName", name, MAX_SHORT_NAME_LEN)?;
        }
        if let Some(path) = new_path {
            validate_path(path)?;
        }

        let mut store = self.store.write();
        store.user(user_name)?;
        let target = new_user_name.unwrap_or(user_name);
        if target != user_name && store.users.contains_key(target) {
            return Err(IamError::already_exists("User", target));
        }

        let Some(mut user) = store.users.remove(user_name) else {
            return Err(IamError::no_such_entity("user", user_name));
        };
        if let Some(path) = new_path {
            path.clone_into(&mut user.path);
        }
        target.clone_into(&mut user.user_name);
        user.arn = self.arn("user", &user.path, target);

        if target != user_name {
            for group_name in &user.groups {
                if let Some(group) = store.groups.get_mut(group_name) {
                    group.members.remove(user_name);
                    group.members.insert(target.to_owned());
                }
            }
            for key in store.access_keys.values_mut() {
                if key.user_name == user_name {
                    target.clone_into(&mut key.user_name);
                }
            }
            if let Some(mut profile) = store.login_profiles.remove(user_name) {
                target.clone_into(&mut profile.user_name);
                store.login_profiles.insert(target.to_owned(), profile);
            }
        }
        store.users.insert(target.to_owned(), user);
        info!(user = %user_name, new_name = %target, "user updated");
        Ok(())
    }

    /// Delete a user that has no dependent entities left.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or `DeleteConflict` while the user still has access
    /// keys, a login profile, group memberships, or policies.
    pub fn delete_user(&self, user_name: &str) -> IamResult<()> {
        let mut store = self.store.write();
        let user = store.user(user_name)?;
        let conflict = if store.keys_of(user_name).next().is_some() {
            Some("access keys")
        } else if store.login_profiles.contains_key(user_name) {
            Some("a login profile")
        } else if !user.groups.is_empty() {
            Some("group memberships")
        } else if !user.attached_policies.is_empty() {
            Some("attached policies")
        } else if !user.inline_policies.is_empty() {
            Some("inline policies")
        } else {
            None
        };
        if let Some(what) = conflict {
            return Err(IamError::delete_conflict(format!(
                "Cannot delete entity, must remove {what} first."
            )));
        }
        store.users.remove(user_name);
        info!(user = %user_name, "user deleted");
        Ok(())
    }

    /// List users in name order.
    ///
    /// # Errors
    ///
    /// `ValidationError` for a bad path prefix or page size, `InvalidInput`
    /// for a stale marker.
    pub fn list_users(
        &self,
        path_prefix: Option<&str>,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<User>> {
        let filter = path_filter(path_prefix)?;
        let users = self
            .store
            .read()
            .users
            .values()
            .filter(|u| filter(u.path.as_str()))
            .cloned()
            .collect();
        let scope = format!("ListUsers:{}", path_prefix.unwrap_or("/"));
        self.page(&self.pagers.users, &scope, users, marker, max_items)
    }
}
