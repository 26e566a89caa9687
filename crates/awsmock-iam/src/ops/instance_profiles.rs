//! Instance profile handlers.

use awsmock_core::Page;
use chrono::Utc;
use tracing::{debug, info};

use crate::error::{IamError, IamErrorCode, IamResult};
use crate::provider::{MockIam, path_filter};
use crate::types::{InstanceProfile, InstanceProfileDetail};
use crate::validation::{MAX_SHORT_NAME_LEN, validate_name, validate_path};

/// Roles a single instance profile may hold.
pub const MAX_ROLES_PER_PROFILE: usize = 1;

impl MockIam {
    /// Create an empty instance profile.
    ///
    /// # Errors
    ///
    /// `ValidationError` or `EntityAlreadyExists`.
    pub fn create_instance_profile(
        &self,
        instance_profile_name: &str,
        path: Option<&str>,
    ) -> IamResult<InstanceProfileDetail> {
        validate_name("instanceProfileName", instance_profile_name, MAX_SHORT_NAME_LEN)?;
        let path = path.unwrap_or("/");
        validate_path(path)?;

        let mut store = self.store.write();
        if store.instance_profiles.contains_key(instance_profile_name) {
            return Err(IamError::already_exists("Instance Profile", instance_profile_name));
        }
        let profile = InstanceProfile {
            instance_profile_name: instance_profile_name.to_owned(),
            instance_profile_id: awsmock_core::ids::unique_id("AIPA"),
            arn: self.arn("instance-profile", path, instance_profile_name),
            path: path.to_owned(),
            create_date: Utc::now(),
            role_names: Vec::new(),
        };
        store
            .instance_profiles
            .insert(instance_profile_name.to_owned(), profile.clone());
        info!(instance_profile = %instance_profile_name, "instance profile created");
        Ok(InstanceProfileDetail {
            profile,
            roles: Vec::new(),
        })
    }

    /// Fetch an instance profile with its roles.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`.
    pub fn get_instance_profile(&self, instance_profile_name: &str) -> IamResult<InstanceProfileDetail> {
        let store = self.store.read();
        let profile = store.instance_profile(instance_profile_name)?;
        Ok(store.profile_detail(profile))
    }

    /// Delete an instance profile that holds no role.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` or `DeleteConflict`.
    pub fn delete_instance_profile(&self, instance_profile_name: &str) -> IamResult<()> {
        let mut store = self.store.write();
        if !store.instance_profile(instance_profile_name)?.role_names.is_empty() {
            return Err(IamError::delete_conflict(
                "Cannot delete entity, must remove roles from instance profile first.",
            ));
        }
        store.instance_profiles.remove(instance_profile_name);
        info!(instance_profile = %instance_profile_name, "instance profile deleted");
        Ok(())
    }

    /// Put a role into an instance profile.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or `LimitExceeded` when the profile already holds a
    /// role.
    pub fn add_role_to_instance_profile(&self, instance_profile_name: &str, role_name: &str) -> IamResult<()> {
        let mut store = self.store.write();
        store.role(role_name)?;
        let profile = store.instance_profile_mut(instance_profile_name)?;
        if profile.role_names.len() >= MAX_ROLES_PER_PROFILE {
            return Err(IamError::limit_exceeded(format!(
                "Cannot exceed quota for InstanceSessionsPerInstanceProfile: {MAX_ROLES_PER_PROFILE}"
            )));
        }
        profile.role_names.push(role_name.to_owned());
        store
            .role_mut(role_name)?
            .instance_profiles
            .insert(instance_profile_name.to_owned());
        debug!(instance_profile = %instance_profile_name, role = %role_name, "role added to instance profile");
        Ok(())
    }

    /// Take a role out of an instance profile.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` when either entity is missing or the role is not in
    /// the profile.
    pub fn remove_role_from_instance_profile(&self, instance_profile_name: &str, role_name: &str) -> IamResult<()> {
        let mut store = self.store.write();
        store.role(role_name)?;
        let profile = store.instance_profile_mut(instance_profile_name)?;
        let Some(index) = profile.role_names.iter().position(|r| r == role_name) else {
            return Err(IamError::with_message(
                IamErrorCode::NoSuchEntity,
                format!("Role {role_name} is not in instance profile {instance_profile_name}."),
            ));
        };
        profile.role_names.remove(index);
        store
            .role_mut(role_name)?
            .instance_profiles
            .remove(instance_profile_name);
        debug!(instance_profile = %instance_profile_name, role = %role_name, "role removed from instance profile");
        Ok(())
    }

    /// List instance profiles in name order.
    ///
    /// # Errors
    ///
    /// `ValidationError` or `InvalidInput` from paging.
    pub fn list_instance_profiles(
        &self,
        path_prefix: Option<&str>,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<InstanceProfileDetail>> {
        let filter = path_filter(path_prefix)?;
        let profiles = {
            let store = self.store.read();
            store
                .instance_profiles
                .values()
                .filter(|p| filter(p.path.as_str()))
                .map(|p| store.profile_detail(p))
                .collect()
        };
        let scope = format!("ListInstanceProfiles:{}", path_prefix.unwrap_or("/"));
        self.page(
            &self.pagers.instance_profiles,
            &scope,
            profiles,
            marker,
            max_items,
        )
    }

    /// List the instance profiles holding a role.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or pagination errors.
    pub fn list_instance_profiles_for_role(
        &self,
        role_name: &str,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<InstanceProfileDetail>> {
        let profiles = {
            let store = self.store.read();
            store
                .role(role_name)?
                .instance_profiles
                .iter()
                .filter_map(|name| store.instance_profiles.get(name))
                .map(|p| store.profile_detail(p))
                .collect()
        };
        self.page(
            &self.pagers.instance_profiles,
            &format!("ListInstanceProfilesForRole:{role_name}"),
            profiles,
            marker,
            max_items,
        )
    }
}
