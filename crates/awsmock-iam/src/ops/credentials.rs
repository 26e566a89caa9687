//! Access key and login profile handlers.

use awsmock_core::Page;
use chrono::Utc;
use tracing::{debug, info};

use crate::error::{IamError, IamErrorCode, IamResult};
use crate::provider::MockIam;
use crate::state::IamStore;
use crate::types::{AccessKey, AccessKeyMetadata, AccessKeyStatus, LoginProfile};

const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 1..=128;

fn no_such_key(access_key_id: &str) -> IamError {
    IamError::with_message(
        IamErrorCode::NoSuchEntity,
        format!("The Access Key with id {access_key_id} cannot be found."),
    )
}

fn no_such_login_profile(user_name: &str) -> IamError {
    IamError::with_message(
        IamErrorCode::NoSuchEntity,
        format!("Login Profile for User {user_name} cannot be found."),
    )
}

fn validate_password(password: &str) -> IamResult<()> {
    if PASSWORD_LEN.contains(&password.chars().count()) {
        Ok(())
    } else {
        Err(IamError::validation(
            "Password must be between 1 and 128 characters",
        ))
    }
}

/// Resolve a key, checking its owner when a user name is given.
fn owned_key<'a>(
    store: &'a mut IamStore,
    user_name: Option<&str>,
    access_key_id: &str,
) -> IamResult<&'a mut AccessKey> {
    if let Some(user) = user_name {
        store.user(user)?;
    }
    store
        .access_keys
        .get_mut(access_key_id)
        .filter(|k| user_name.is_none_or(|u| k.user_name == u))
        .ok_or_else(|| no_such_key(access_key_id))
}

impl MockIam {
    /// Issue a new access key for a user. The secret is only returned here.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or `LimitExceeded` once the user holds the maximum
    /// number of keys.
    pub fn create_access_key(&self, user_name: &str) -> IamResult<AccessKey> {
        let limit = self.config.max_access_keys;
        let mut store = self.store.write();
        store.user(user_name)?;
        if store.keys_of(user_name).count() >= limit {
            return Err(IamError::limit_exceeded(format!(
                "Cannot exceed quota for AccessKeysPerUser: {limit}"
            )));
        }
        let key = AccessKey {
            user_name: user_name.to_owned(),
            access_key_id: awsmock_core::ids::access_key_id(),
            secret_access_key: awsmock_core::ids::secret_access_key(),
            status: AccessKeyStatus::Active,
            create_date: Utc::now(),
        };
        store.access_keys.insert(key.access_key_id.clone(), key.clone());
        info!(user = %user_name, access_key_id = %key.access_key_id, "access key created");
        Ok(key)
    }

    /// Activate or deactivate an access key.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown user or key, or a key of another user.
    pub fn update_access_key(
        &self,
        user_name: Option<&str>,
        access_key_id: &str,
        status: AccessKeyStatus,
    ) -> IamResult<()> {
        let mut store = self.store.write();
        owned_key(&mut store, user_name, access_key_id)?.status = status;
        debug!(access_key_id = %access_key_id, status = status.as_str(), "access key updated");
        Ok(())
    }

    /// Delete an access key.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown user or key, or a key of another user.
    pub fn delete_access_key(&self, user_name: Option<&str>, access_key_id: &str) -> IamResult<()> {
        let mut store = self.store.write();
        owned_key(&mut store, user_name, access_key_id)?;
        store.access_keys.remove(access_key_id);
        info!(access_key_id = %access_key_id, "access key deleted");
        Ok(())
    }

    /// List a user's access keys without their secrets.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or pagination errors.
    pub fn list_access_keys(
        &self,
        user_name: &str,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<AccessKeyMetadata>> {
        let keys = {
            let store = self.store.read();
            store.user(user_name)?;
            store.keys_of(user_name).map(AccessKey::metadata).collect()
        };
        self.page(
            &self.pagers.access_keys,
            &format!("ListAccessKeys:{user_name}"),
            keys,
            marker,
            max_items,
        )
    }

    /// Give a user a console password.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, `EntityAlreadyExists`, or `ValidationError` for an
    /// empty or overlong password.
    pub fn create_login_profile(
        &self,
        user_name: &str,
        password: &str,
        password_reset_required: bool,
    ) -> IamResult<LoginProfile> {
        validate_password(password)?;
        let mut store = self.store.write();
        store.user(user_name)?;
        if store.login_profiles.contains_key(user_name) {
            return Err(IamError::with_message(
                IamErrorCode::EntityAlreadyExists,
                format!("Login Profile for user {user_name} already exists."),
            ));
        }
        let profile = LoginProfile {
            user_name: user_name.to_owned(),
            create_date: Utc::now(),
            password_reset_required,
        };
        store
            .login_profiles
            .insert(user_name.to_owned(), profile.clone());
        info!(user = %user_name, "login profile created");
        Ok(profile)
    }

    /// Fetch a user's login profile.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown user or a user without a profile.
    pub fn get_login_profile(&self, user_name: &str) -> IamResult<LoginProfile> {
        let store = self.store.read();
        store.user(user_name)?;
        store
            .login_profiles
            .get(user_name)
            .cloned()
            .ok_or_else(|| no_such_login_profile(user_name))
    }

    /// Change a user's password and/or reset flag.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` or `ValidationError`.
    pub fn update_login_profile(
        &self,
        user_name: &str,
        password: Option<&str>,
        password_reset_required: Option<bool>,
    ) -> IamResult<()> {
        if let Some(p) = password {
            validate_password(p)?;
        }
        let mut store = self.store.write();
        store.user(user_name)?;
        let profile = store
            .login_profiles
            .get_mut(user_name)
            .ok_or_else(|| no_such_login_profile(user_name))?;
        if let Some(required) = password_reset_required {
            profile.password_reset_required = required;
        }
        debug!(user = %user_name, "login profile updated");
        Ok(())
    }

    /// Remove a user's console password.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown user or a user without a profile.
    pub fn delete_login_profile(&self, user_name: &str) -> IamResult<()> {
        let mut store = self.store.write();
        store.user(user_name)?;
        store
            .login_profiles
            .remove(user_name)
            .ok_or_else(|| no_such_login_profile(user_name))?;
        info!(user = %user_name, "login profile deleted");
        Ok(())
    }
}
