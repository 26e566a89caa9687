//! IAM integration tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use awsmock_iam::managed::aws_policy_arn;
    use awsmock_iam::{
        CreatePolicyInput, CreateRoleInput, IamErrorCode, ListPoliciesInput, MockIam, PolicyScope,
    };

    use crate::iam;

    const DOC: &str = r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":"s3:*","Resource":"*"}]}"#;
    const TRUST: &str = r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Principal":{"Service":"ec2.amazonaws.com"},"Action":"sts:AssumeRole"}]}"#;

    fn attachment_count(iam: &MockIam, arn: &str) -> usize {
        iam.get_policy(arn).expect("get policy").attachment_count
    }

    #[test]
    fn test_should_reject_duplicate_user() {
        let iam = iam(false);
        iam.create_user("alice", None).expect("create");
        let err = iam.create_user("alice", Some("/other/"));
        assert!(
            matches!(&err, Err(e) if e.code == IamErrorCode::EntityAlreadyExists),
            "expected EntityAlreadyExists, got {err:?}"
        );
    }

    #[test]
    fn test_should_track_attachment_count_across_principals() {
        let iam = iam(false);
        iam.create_user("alice", None).expect("user");
        iam.create_group("devs", None).expect("group");
        iam.create_role(CreateRoleInput {
            role_name: "app".to_owned(),
            assume_role_policy_document: TRUST.to_owned(),
            ..CreateRoleInput::default()
        })
        .expect("role");
        let arn = iam
            .create_policy(CreatePolicyInput {
                policy_name: "s3-access".to_owned(),
                policy_document: DOC.to_owned(),
                ..CreatePolicyInput::default()
            })
            .expect("policy")
            .arn;

        iam.attach_user_policy("alice", &arn).expect("attach user");
        iam.attach_user_policy("alice", &arn).expect("attach again");
        iam.attach_group_policy("devs", &arn).expect("attach group");
        iam.attach_role_policy("app", &arn).expect("attach role");
        assert_eq!(attachment_count(&iam, &arn), 3);

        let attached_only = iam
            .list_policies(&ListPoliciesInput {
                scope: PolicyScope::Local,
                only_attached: true,
                ..ListPoliciesInput::default()
            })
            .expect("list");
        assert_eq!(attached_only.items.len(), 1);

        let err = iam.delete_policy(&arn);
        assert!(
            matches!(&err, Err(e) if e.code == IamErrorCode::DeleteConflict),
            "expected DeleteConflict, got {err:?}"
        );

        iam.detach_group_policy("devs", &arn).expect("detach group");
        let err = iam.detach_group_policy("devs", &arn);
        assert!(
            matches!(&err, Err(e) if e.code == IamErrorCode::NoSuchEntity),
            "expected NoSuchEntity, got {err:?}"
        );
        iam.detach_user_policy("alice", &arn).expect("detach user");
        iam.detach_role_policy("app", &arn).expect("detach role");
        assert_eq!(attachment_count(&iam, &arn), 0);

        iam.delete_policy(&arn).expect("delete policy");
        assert!(iam.get_policy(&arn).is_err());
    }

    #[test]
    fn test_should_block_group_delete_while_members_exist() {
        let iam = iam(false);
        iam.create_group("ops", None).expect("group");
        iam.create_user("bob", None).expect("user");
        iam.add_user_to_group("ops", "bob").expect("add");

        let err = iam.delete_group("ops");
        assert!(
            matches!(&err, Err(e) if e.code == IamErrorCode::DeleteConflict),
            "expected DeleteConflict, got {err:?}"
        );
        let err = iam.delete_user("bob");
        assert!(
            matches!(&err, Err(e) if e.code == IamErrorCode::DeleteConflict),
            "expected DeleteConflict, got {err:?}"
        );

        iam.remove_user_from_group("ops", "bob").expect("remove");
        iam.delete_group("ops").expect("delete group");
        iam.delete_user("bob").expect("delete user");
    }

    #[test]
    fn test_should_page_users_into_disjoint_pages_with_single_use_markers() {
        let iam = iam(false);
        let names: Vec<String> = (0..11).map(|i| format!("user-{i:02}")).collect();
        for name in names.iter().rev() {
            iam.create_user(name, None).expect("create");
        }

        let mut seen = Vec::new();
        let mut used = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let page = iam
                .list_users(None, marker.as_deref(), Some(4))
                .expect("list users");
            assert!(page.items.len() <= 4);
            seen.extend(page.items.into_iter().map(|u| u.user_name));
            if let Some(m) = marker.take() {
                used.push(m);
            }
            match page.marker {
                Some(next) => {
                    assert!(page.is_truncated);
                    marker = Some(next);
                }
                None => break,
            }
        }

        assert_eq!(seen, names);
        assert_eq!(seen.iter().collect::<BTreeSet<_>>().len(), names.len());
        assert_eq!(used.len(), 2);
        for m in &used {
            let err = iam.list_users(None, Some(m), Some(4));
            assert!(
                matches!(&err, Err(e) if e.code == IamErrorCode::InvalidInput),
                "expected InvalidInput for a reused marker, got {err:?}"
            );
        }
    }

    #[test]
    fn test_should_propagate_user_rename_into_groups_and_keys() {
        let iam = iam(false);
        iam.create_user("carol", None).expect("user");
        iam.create_group("qa", None).expect("group");
        iam.add_user_to_group("qa", "carol").expect("add");
        let key = iam.create_access_key("carol").expect("key");

        iam.update_user("carol", Some("caroline"), Some("/qa/"))
            .expect("rename");
        let user = iam.get_user("caroline").expect("renamed user");
        assert_eq!(user.arn, "arn:aws:iam::000000000000:user/qa/caroline");
        assert!(iam.get_user("carol").is_err());

        let members = iam.get_group("qa", None, None).expect("group");
        let member_names: Vec<&str> = members.users.items.iter().map(|u| u.user_name.as_str()).collect();
        assert_eq!(member_names, vec!["caroline"]);

        let keys = iam.list_access_keys("caroline", None, None).expect("keys");
        assert_eq!(keys.items.len(), 1);
        assert_eq!(keys.items[0].access_key_id, key.access_key_id);
    }

    #[test]
    fn test_should_keep_aws_managed_policies_immutable_and_reseed_on_reset() {
        let iam = iam(true);
        let arn = aws_policy_arn("/", "AdministratorAccess");
        let policy = iam.get_policy(&arn).expect("seeded policy");
        assert_eq!(policy.scope, PolicyScope::Aws);

        for err in [
            iam.delete_policy(&arn).err(),
            iam.create_policy_version(&arn, DOC, true).err(),
        ] {
            assert!(
                matches!(&err, Some(e) if e.code == IamErrorCode::InvalidInput),
                "expected InvalidInput, got {err:?}"
            );
        }

        iam.create_role(CreateRoleInput {
            role_name: "admin".to_owned(),
            assume_role_policy_document: TRUST.to_owned(),
            ..CreateRoleInput::default()
        })
        .expect("role");
        iam.attach_role_policy("admin", &arn).expect("attach");
        assert_eq!(attachment_count(&iam, &arn), 1);

        iam.reset();
        assert!(iam.get_role("admin").is_err());
        assert_eq!(attachment_count(&iam, &arn), 0);
    }

    #[test]
    fn test_should_cap_policy_versions_and_keep_default() {
        let iam = iam(false);
        let arn = iam
            .create_policy(CreatePolicyInput {
                policy_name: "versioned".to_owned(),
                policy_document: DOC.to_owned(),
                ..CreatePolicyInput::default()
            })
            .expect("policy")
            .arn;
        for _ in 0..4 {
            iam.create_policy_version(&arn, DOC, false).expect("version");
        }
        let err = iam.create_policy_version(&arn, DOC, false);
        assert!(
            matches!(&err, Err(e) if e.code == IamErrorCode::LimitExceeded),
            "expected LimitExceeded, got {err:?}"
        );

        iam.delete_policy_version(&arn, "v3").expect("delete v3");
        let v6 = iam.create_policy_version(&arn, DOC, true).expect("v6");
        assert_eq!(v6.version_id, "v6");
        assert_eq!(iam.get_policy(&arn).expect("policy").default_version_id, "v6");

        let err = iam.delete_policy_version(&arn, "v6");
        assert!(
            matches!(&err, Err(e) if e.code == IamErrorCode::DeleteConflict),
            "expected DeleteConflict, got {err:?}"
        );
    }
}
