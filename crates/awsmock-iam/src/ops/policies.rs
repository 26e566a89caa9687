//! Managed policy and policy version handlers.

use awsmock_core::Page;
use chrono::Utc;
use tracing::{debug, info};

use crate::error::{IamError, IamErrorCode, IamResult};
use crate::provider::{MockIam, path_filter};
use crate::types::{CreatePolicyInput, ListPoliciesInput, ManagedPolicy, PolicyScope, PolicyVersion};
use crate::validation::{
    MAX_LONG_NAME_LEN, validate_description, validate_name, validate_path,
    validate_policy_document,
};

fn ensure_local(policy: &ManagedPolicy) -> IamResult<()> {
    if policy.scope == PolicyScope::Aws {
        return Err(IamError::with_message(
            IamErrorCode::InvalidInput,
            format!("Policy {} is an AWS managed policy and cannot be modified.", policy.arn),
        ));
    }
    Ok(())
}

fn no_such_version(arn: &str, version_id: &str) -> IamError {
    IamError::with_message(
        IamErrorCode::NoSuchEntity,
        format!("Policy {arn} version {version_id} does not exist or is not attachable."),
    )
}

impl MockIam {
    /// Create a customer managed policy with default version `v1`.
    ///
    /// # Errors
    ///
    /// `ValidationError`, `MalformedPolicyDocument`, or
    /// `EntityAlreadyExists`.
    pub fn create_policy(&self, input: CreatePolicyInput) -> IamResult<ManagedPolicy> {
        validate_name("policyName", &input.policy_name, MAX_LONG_NAME_LEN)?;
        let path = input.path.as_deref().unwrap_or("/");
        validate_path(path)?;
        validate_policy_document(&input.policy_document)?;
        if let Some(description) = &input.description {
            validate_description(description)?;
        }

        let arn = self.arn("policy", path, &input.policy_name);
        let mut store = self.store.write();
        let name_taken = store.policies.values().any(|p| {
            p.scope == PolicyScope::Local && p.policy_name == input.policy_name
        });
        if name_taken {
            return Err(IamError::with_message(
                IamErrorCode::EntityAlreadyExists,
                format!("A policy called {} already exists. Duplicate names are not allowed.", input.policy_name),
            ));
        }
        let now = Utc::now();
        let policy = ManagedPolicy {
            policy_id: awsmock_core::ids::unique_id("ANPA"),
            arn: arn.clone(),
            path: path.to_owned(),
            description: input.description,
            create_date: now,
            update_date: now,
            default_version_id: "v1".to_owned(),
            attachment_count: 0,
            scope: PolicyScope::Local,
            versions: vec![PolicyVersion {
                version_id: "v1".to_owned(),
                document: input.policy_document,
                is_default_version: true,
                create_date: now,
            }],
            next_version: 2,
            policy_name: input.policy_name,
        };
        store.policies.insert(arn, policy.clone());
        info!(policy = %policy.arn, "policy created");
        Ok(policy)
    }

    /// Fetch a managed policy.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`.
    pub fn get_policy(&self, policy_arn: &str) -> IamResult<ManagedPolicy> {
        self.store.read().policy(policy_arn).cloned()
    }

    /// Delete a customer managed policy that is detached and has only its
    /// default version left.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, `InvalidInput` for AWS managed policies, or
    /// `DeleteConflict`.
    pub fn delete_policy(&self, policy_arn: &str) -> IamResult<()> {
        let mut store = self.store.write();
        let policy = store.policy(policy_arn)?;
        ensure_local(policy)?;
        if policy.attachment_count > 0 {
            return Err(IamError::delete_conflict(
                "Cannot delete a policy attached to entities.",
            ));
        }
        if policy.versions.len() > 1 {
            return Err(IamError::delete_conflict(
                "Cannot delete a policy with non-default versions; delete them first.",
            ));
        }
        store.policies.remove(policy_arn);
        info!(policy = %policy_arn, "policy deleted");
        Ok(())
    }

    /// List managed policies in name order.
    ///
    /// # Errors
    ///
    /// `ValidationError` or `InvalidInput` from paging.
    pub fn list_policies(&self, input: &ListPoliciesInput) -> IamResult<Page<ManagedPolicy>> {
        let filter = path_filter(input.path_prefix.as_deref())?;
        let mut policies: Vec<ManagedPolicy> = self
            .store
            .read()
            .policies
            .values()
            .filter(|p| input.scope == PolicyScope::All || p.scope == input.scope)
            .filter(|p| !input.only_attached || p.attachment_count > 0)
            .filter(|p| filter(p.path.as_str()))
            .cloned()
            .collect();
        policies.sort_by(|a, b| a.policy_name.cmp(&b.policy_name).then_with(|| a.arn.cmp(&b.arn)));
        let scope = format!(
            "ListPolicies:{}:{}:{}",
            input.scope,
            input.only_attached,
            input.path_prefix.as_deref().unwrap_or("/")
        );
        self.page(
            &self.pagers.policies,
            &scope,
            policies,
            input.marker.as_deref(),
            input.max_items,
        )
    }

    /// Add a version to a customer managed policy.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, `InvalidInput` for AWS managed policies,
    /// `MalformedPolicyDocument`, or `LimitExceeded` once the policy holds
    /// the maximum number of versions.
    pub fn create_policy_version(
        &self,
        policy_arn: &str,
        policy_document: &str,
        set_as_default: bool,
    ) -> IamResult<PolicyVersion> {
        validate_policy_document(policy_document)?;
        let limit = self.config.max_policy_versions;
        let mut store = self.store.write();
        let policy = store.policy_mut(policy_arn)?;
        ensure_local(policy)?;
        if policy.versions.len() >= limit {
            return Err(IamError::limit_exceeded(format!(
                "A managed policy can have up to {limit} versions. Before you create a new \
                 version, you must delete an existing version."
            )));
        }

        let now = Utc::now();
        let version_id = format!("v{}", policy.next_version);
        policy.next_version += 1;
        policy.versions.push(PolicyVersion {
            version_id: version_id.clone(),
            document: policy_document.to_owned(),
            is_default_version: false,
            create_date: now,
        });
        if set_as_default {
            policy.make_default(&version_id, now);
        }
        debug!(policy = %policy_arn, version = %version_id, set_as_default, "policy version created");
        policy
            .version(&version_id)
            .cloned()
            .ok_or_else(|| IamError::service_failure("policy version vanished"))
    }

    /// Fetch one policy version.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown policy or version.
    pub fn get_policy_version(&self, policy_arn: &str, version_id: &str) -> IamResult<PolicyVersion> {
        let store = self.store.read();
        store
            .policy(policy_arn)?
            .version(version_id)
            .cloned()
            .ok_or_else(|| no_such_version(policy_arn, version_id))
    }

    /// List the versions of a policy, newest first.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or pagination errors.
    pub fn list_policy_versions(
        &self,
        policy_arn: &str,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> IamResult<Page<PolicyVersion>> {
        let versions = self
            .store
            .read()
            .policy(policy_arn)?
            .versions
            .iter()
            .rev()
            .cloned()
            .collect();
        self.page(
            &self.pagers.versions,
            &format!("ListPolicyVersions:{policy_arn}"),
            versions,
            marker,
            max_items,
        )
    }

    /// Delete a non-default policy version.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity`, or `DeleteConflict` for the default version.
    pub fn delete_policy_version(&self, policy_arn: &str, version_id: &str) -> IamResult<()> {
        let mut store = self.store.write();
        let policy = store.policy_mut(policy_arn)?;
        ensure_local(policy)?;
        let Some(index) = policy.versions.iter().position(|v| v.version_id == version_id) else {
            return Err(no_such_version(policy_arn, version_id));
        };
        if policy.versions[index].is_default_version {
            return Err(IamError::delete_conflict(
                "Cannot delete the default version of a policy.",
            ));
        }
        policy.versions.remove(index);
        debug!(policy = %policy_arn, version = %version_id, "policy version deleted");
        Ok(())
    }

    /// Make an existing version the default one.
    ///
    /// # Errors
    ///
    /// `NoSuchEntity` for an unknown policy or version.
    pub fn set_default_policy_version(&self, policy_arn: &str, version_id: &str) -> IamResult<()> {
        let mut store = self.store.write();
        let policy = store.policy_mut(policy_arn)?;
        ensure_local(policy)?;
        if policy.version(version_id).is_none() {
            return Err(no_such_version(policy_arn, version_id));
        }
        policy.make_default(version_id, Utc::now());
        debug!(policy = %policy_arn, version = %version_id, "default policy version set");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IamConfig;

    const DOC: &str = r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":"s3:*","Resource":"*"}]}"#;

    fn iam() -> MockIam {
        MockIam::new(IamConfig::builder().seed_aws_managed_policies(false).build())
    }

    fn create(iam: &MockIam, name: &str) -> ManagedPolicy {
        iam.create_policy(CreatePolicyInput {
            policy_name: name.to_owned(),
            policy_document: DOC.to_owned(),
            ..CreatePolicyInput::default()
        })
        .unwrap_or_else(|e| panic!("create failed: {e}"))
    }

    #[test]
    fn test_should_create_policy_with_v1_default() {
        let iam = iam();
        let policy = create(&iam, "s3-all");
        assert_eq!(policy.arn, "arn:aws:iam::000000000000:policy/s3-all");
        assert_eq!(policy.default_version_id, "v1");
        assert_eq!(policy.default_document(), Some(DOC));
        assert_eq!(policy.scope, PolicyScope::Local);

        let err = iam.create_policy(CreatePolicyInput {
            policy_name: "s3-all".to_owned(),
            policy_document: DOC.to_owned(),
            ..CreatePolicyInput::default()
        });
        assert!(
            matches!(&err, Err(e) if e.code == IamErrorCode::EntityAlreadyExists),
            "expected EntityAlreadyExists, got {err:?}"
        );
    }

    #[test]
    fn test_should_reject_duplicate_policy_name_under_another_path() {
        let iam = iam();
        create(&iam, "p");
        let err = iam.create_policy(CreatePolicyInput {
            policy_name: "p".to_owned(),
            path: Some("/team/".to_owned()),
            policy_document: DOC.to_owned(),
            ..CreatePolicyInput::default()
        });
        assert!(
            matches!(&err, Err(e) if e.code == IamErrorCode::EntityAlreadyExists),
            "expected EntityAlreadyExists, got {err:?}"
        );
        let listed = iam
            .list_policies(&ListPoliciesInput::default())
            .unwrap_or_else(|e| panic!("list failed: {e}"));
        assert_eq!(listed.items.len(), 1);
    }

    #[test]
    fn test_should_cap_policy_versions() {
        let iam = iam();
        let policy = create(&iam, "p");
        for _ in 0..4 {
            iam.create_policy_version(&policy.arn, DOC, false)
                .unwrap_or_else(|e| panic!("version failed: {e}"));
        }
        let err = iam.create_policy_version(&policy.arn, DOC, false);
        assert!(
            matches!(&err, Err(e) if e.code == IamErrorCode::LimitExceeded),
            "expected LimitExceeded, got {err:?}"
        );

        let versions = iam
            .list_policy_versions(&policy.arn, None, None)
            .unwrap_or_else(|e| panic!("list failed: {e}"));
        let ids: Vec<_> = versions.items.iter().map(|v| v.version_id.as_str()).collect();
        assert_eq!(ids, vec!["v5", "v4", "v3", "v2", "v1"]);
    }

    #[test]
    fn test_should_switch_default_version() {
        let iam = iam();
        let policy = create(&iam, "p");
        let v2 = iam
            .create_policy_version(&policy.arn, DOC, true)
            .unwrap_or_else(|e| panic!("version failed: {e}"));
        assert!(v2.is_default_version);
        assert_eq!(v2.version_id, "v2");

        let err = iam.delete_policy_version(&policy.arn, "v2");
        assert!(
            matches!(&err, Err(e) if e.code == IamErrorCode::DeleteConflict),
            "expected DeleteConflict, got {err:?}"
        );

        iam.set_default_policy_version(&policy.arn, "v1")
            .unwrap_or_else(|e| panic!("set default failed: {e}"));
        iam.delete_policy_version(&policy.arn, "v2")
            .unwrap_or_else(|e| panic!("delete version failed: {e}"));
        let v1 = iam
            .get_policy_version(&policy.arn, "v1")
            .unwrap_or_else(|e| panic!("get version failed: {e}"));
        assert!(v1.is_default_version);
        assert!(iam.get_policy_version(&policy.arn, "v2").is_err());

        // Version IDs are never reused.
        let v3 = iam
            .create_policy_version(&policy.arn, DOC, false)
            .unwrap_or_else(|e| panic!("version failed: {e}"));
        assert_eq!(v3.version_id, "v3");
    }

    #[test]
    fn test_should_block_delete_with_extra_versions() {
        let iam = iam();
        let policy = create(&iam, "p");
        iam.create_policy_version(&policy.arn, DOC, false)
            .unwrap_or_else(|e| panic!("version failed: {e}"));
        let err = iam.delete_policy(&policy.arn);
        assert!(
            matches!(&err, Err(e) if e.code == IamErrorCode::DeleteConflict),
            "expected DeleteConflict, got {err:?}"
        );
        iam.delete_policy_version(&policy.arn, "v2")
            .unwrap_or_else(|e| panic!("delete version failed: {e}"));
        iam.delete_policy(&policy.arn)
            .unwrap_or_else(|e| panic!("delete failed: {e}"));
        assert!(iam.get_policy(&policy.arn).is_err());
    }

    #[test]
    fn test_should_filter_policies_by_scope() {
        let iam = MockIam::default();
        create(&iam, "mine");

        let local = iam
            .list_policies(&ListPoliciesInput {
                scope: PolicyScope::Local,
                ..ListPoliciesInput::default()
            })
            .unwrap_or_else(|e| panic!("list failed: {e}"));
        assert_eq!(local.items.len(), 1);
        assert_eq!(local.items[0].policy_name, "mine");

        let aws = iam
            .list_policies(&ListPoliciesInput {
                scope: PolicyScope::Aws,
                ..ListPoliciesInput::default()
            })
            .unwrap_or_else(|e| panic!("list failed: {e}"));
        assert!(!aws.items.is_empty());
        assert!(aws.items.iter().all(|p| p.scope == PolicyScope::Aws));

        let attached = iam
            .list_policies(&ListPoliciesInput {
                only_attached: true,
                ..ListPoliciesInput::default()
            })
            .unwrap_or_else(|e| panic!("list failed: {e}"));
        assert!(attached.items.is_empty());
    }

    #[test]
    fn test_should_refuse_to_modify_aws_policies() {
        let iam = MockIam::default();
        let arn = crate::managed::aws_policy_arn("/", "ReadOnlyAccess");
        assert!(iam.get_policy(&arn).is_ok());
        let err = iam.delete_policy(&arn);
        assert!(
            matches!(&err, Err(e) if e.code == IamErrorCode::InvalidInput),
            "expected InvalidInput, got {err:?}"
        );
        assert!(iam.create_policy_version(&arn, DOC, true).is_err());
    }
}
