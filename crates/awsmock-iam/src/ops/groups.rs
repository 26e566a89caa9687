//! Group and membership handlers.

use std::collections::{BTreeMap, BTreeSet};

use awsmock_core::Page;
use chrono::Utc;
use tracing::{debug, info};

use crate::error::{IamError, IamErrorCode, IamResult};
use crate::provider::{MockIam, path_filter};
use crate::types::{Group, GroupDetail};
use crate::validation::{MAX_LONG_NAME_LEN, validate_name, validate_path};

impl MockIam {
    /// Create a group.
    ///
    /// # Errors
    ///
    /// `ValidationError` or `EntityAlreadyExists`.
    pub fn create_group(&self, group_name: &str, path: Option<&str>) -> IamResult<Group> {
        validate_name("groupName", group_name, MAX_LONG_NAME_LEN)?;
        let path = path.unwrap_or("/");
        validate_path(path)?;

        let mut store = self.store.write();
        if store.groups.contains_key(group_name) {
            return Err(IamError::already_exists("Group", group_name));
        }
        let group = Group {
            group_name: group_name.to_owned(),
            group_id: awsmock_core::ids::unique_id("AGPA"),
            arn: self.arn("group", path, group_name),
            path: path.to_owned(),
            create_date: Utc::now(),
            members: BTreeSet::new(),
            attached_policies: BTreeSet::new(),
            inline_policies: BTreeMap::new(),
        };
        store.groups.insert(group_name.to_owned(), group.clone());
        info!(group = %group_name, "group created");
        Ok(group)
    }

    /// Fetch a group with one page of its members.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or pagination errors.
    pub fn get_group(
        &self,
        group_name: &str,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<GroupDetail> {
        let (group, members) = {
            let store = self.store.read();
            let group = store.group(group_name)?.clone();
            let members = group
                .members
                .iter()
                .filter_map(|name| store.users.get(name).cloned())
                .collect();
            (group, members)
        };
        let users = self.page(
            &self.pagers.users,
            &format!("GetGroup:{group_name}"),
            members,
            marker,
            max_items,
        )?;
        Ok(GroupDetail { group, users })
    }

    /// Rename and/or re-path a group; members follow the new name.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, `EntityAlreadyExists`, or `ValidationError`.
    pub fn update_group(
        &self,
        group_name: &str,
        new_group_name: Option<&str>,
        new_path: Option<&str>,
    ) -> IamResult<()> {
        if let Some(name) = new_group_name {
            validate_name("newGroupName", name, MAX_LONG_NAME_LEN)?;
        }
        if let Some(path) = new_path {
            validate_path(path)?;
        }

        let mut store = self.store.write();
        store.group(group_name)?;
        let target = new_group_name.unwrap_or(group_name);
        if target != group_name && store.groups.contains_key(target) {
            return Err(IamError::already_exists("Group", target));
        }

        let Some(mut group) = store.groups.remove(group_name) else {
            return Err(IamError::no_such_entity("group", group_name));
        };
        if let Some(path) = new_path {
            path.clone_into(&mut group.path);
        }
        target.clone_into(&mut group.group_name);
        group.arn = self.arn("group", &group.path, target);

        if target != group_name {
            for user_name in &group.members {
                if let Some(user) = store.users.get_mut(user_name) {
                    user.groups.remove(group_name);
                    user.groups.insert(target.to_owned());
                }
            }
        }
        store.groups.insert(target.to_owned(), group);
        info!(group = %group_name, new_name = %target, "group updated");
        Ok(())
    }

    /// Delete an empty group without policies.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or `DeleteConflict` while members or policies remain.
    pub fn delete_group(&self, group_name: &str) -> IamResult<()> {
        let mut store = self.store.write();
        let group = store.group(group_name)?;
        let conflict = if !group.members.is_empty() {
            Some("users")
        } else if !group.attached_policies.is_empty() {
            Some("attached policies")
        } else if !group.inline_policies.is_empty() {
            Some("inline policies")
        } else {
            None
        };
        if let Some(what) = conflict {
            return Err(IamError::delete_conflict(format!(
                "Cannot delete entity, must remove {what} from group first."
            )));
        }
        store.groups.remove(group_name);
        info!(group = %group_name, "group deleted");
        Ok(())
    }

    /// List groups in name order.
    ///
    /// # Errors
    ///
    /// `ValidationError` or `InvalidInput` from paging.
    pub fn list_groups(
        &self,
        path_prefix: Option<&str>,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<Group>> {
        let filter = path_filter(path_prefix)?;
        let groups = self
            .store
            .read()
            .groups
            .values()
            .filter(|g| filter(g.path.as_str()))
            .cloned()
            .collect();
        let scope = format!("ListGroups:{}", path_prefix.unwrap_or("/"));
        self.page(&self.pagers.groups, &scope, groups, marker, max_items)
    }

    /// Add a user to a group; adding an existing member is a no-op.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` when the group or user does not exist.
    pub fn add_user_to_group(&self, group_name: &str, user_name: &str) -> IamResult<()> {
        let mut store = self.store.write();
        store.group(group_name)?;
        store.user_mut(user_name)?.groups.insert(group_name.to_owned());
        store.group_mut(group_name)?.members.insert(user_name.to_owned());
        debug!(group = %group_name, user = %user_name, "user added to group");
        Ok(())
    }

    /// Remove a user from a group.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` when either entity is missing or the user is not a
    /// member.
    pub fn remove_user_from_group(&self, group_name: &str, user_name: &str) -> IamResult<()> {
        let mut store = self.store.write();
        store.user(user_name)?;
        if !store.group_mut(group_name)?.members.remove(user_name) {
            return Err(IamError::with_message(
                IamErrorCode::NoSuchEntity,
                format!("User {user_name} is not a member of group {group_name}."),
            ));
        }
        store.user_mut(user_name)?.groups.remove(group_name);
        debug!(group = %group_name, user = %user_name, "user removed from group");
        Ok(())
    }

    /// List the groups a user belongs to.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or pagination errors.
    pub fn list_groups_for_user(
        &self,
        user_name: &str,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<Group>> {
        let groups = {
            let store = self.store.read();
            store
                .user(user_name)?
                .groups
                .iter()
                .filter_map(|name| store.groups.get(name).cloned())
                .collect()
        };
        self.page(
            &self.pagers.groups,
            &format!("ListGroupsForUser:{user_name}"),
            groups,
            marker,
            max_items,
        )
    }
}
