//! IAM Query protocol integration tests.

#[cfg(test)]
mod tests {
    use awsmock_iam::QueryResponse;

    use crate::iam;

    const DOC: &str = r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":"iam:Get*","Resource":"*"}]}"#;

    fn element<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
        let open = format!("<{tag}>");
        let close = format!("</{tag}>");
        let start = text.find(&open)? + open.len();
        let len = text[start..].find(&close)?;
        Some(&text[start..start + len])
    }

    fn assert_error(resp: &QueryResponse, status: http::StatusCode, code: &str) {
        assert_eq!(resp.status, status, "unexpected status for {}", resp.text());
        let text = resp.text();
        assert!(text.contains("<ErrorResponse"), "not an error document: {text}");
        assert_eq!(element(&text, "Code"), Some(code));
        assert_eq!(element(&text, "Type"), Some("Sender"));
        assert!(element(&text, "RequestId").is_some_and(|id| !id.is_empty()));
    }

    #[test]
    fn test_should_drive_a_policy_lifecycle_over_query() {
        let iam = iam(false);
        assert!(iam.handle_query_string("Action=CreateUser&UserName=dev&Path=%2Fteam%2F").is_success());

        let resp = iam.handle_query([
            ("Action", "CreatePolicy"),
            ("PolicyName", "read-iam"),
            ("PolicyDocument", DOC),
        ]);
        assert!(resp.is_success(), "create policy failed: {}", resp.text());
        let text = resp.text();
        assert!(text.contains("<CreatePolicyResponse xmlns=\"https://iam.amazonaws.com/doc/2010-05-08/\">"));
        let arn = element(&text, "Arn")
            .unwrap_or_else(|| panic!("no policy ARN in {text}"))
            .to_owned();
        assert_eq!(arn, "arn:aws:iam::000000000000:policy/read-iam");
        assert_eq!(element(&text, "DefaultVersionId"), Some("v1"));

        let resp = iam.handle_query([("Action", "AttachUserPolicy"), ("UserName", "dev"), ("PolicyArn", arn.as_str())]);
        assert!(resp.is_success());
        assert!(resp.text().contains("<AttachUserPolicyResponse"));
        assert!(!resp.text().contains("<AttachUserPolicyResult>"));

        let resp = iam.handle_query([("Action", "ListAttachedUserPolicies"), ("UserName", "dev")]);
        let text = resp.text();
        assert!(text.contains("<AttachedPolicies><member><PolicyName>read-iam</PolicyName>"));
        assert_eq!(element(&text, "IsTruncated"), Some("false"));

        let resp = iam.handle_query([("Action", "GetPolicy"), ("PolicyArn", arn.as_str())]);
        assert_eq!(element(&resp.text(), "AttachmentCount"), Some("1"));

        let resp = iam.handle_query([("Action", "DeletePolicy"), ("PolicyArn", arn.as_str())]);
        assert_error(&resp, http::StatusCode::CONFLICT, "DeleteConflict");

        let resp = iam.handle_query([("Action", "DetachUserPolicy"), ("UserName", "dev"), ("PolicyArn", arn.as_str())]);
        assert!(resp.is_success());
        let resp = iam.handle_query([("Action", "DeletePolicy"), ("PolicyArn", arn.as_str())]);
        assert!(resp.is_success());
        let resp = iam.handle_query([("Action", "GetPolicy"), ("PolicyArn", arn.as_str())]);
        assert_error(&resp, http::StatusCode::NOT_FOUND, "NoSuchEntity");
    }

    #[test]
    fn test_should_follow_markers_until_the_last_page() {
        let iam = iam(false);
        for i in 0..7 {
            let name = format!("member-{i}");
            assert!(iam.handle_query([("Action", "CreateUser"), ("UserName", name.as_str())]).is_success());
        }

        let mut names = Vec::new();
        let mut query = "Action=ListUsers&MaxItems=3".to_owned();
        let mut pages = 0;
        loop {
            let resp = iam.handle_query_string(&query);
            assert!(resp.is_success(), "list failed: {}", resp.text());
            let text = resp.text();
            pages += 1;
            names.extend(
                text.split("<UserName>")
                    .skip(1)
                    .filter_map(|s| s.split("</UserName>").next())
                    .map(str::to_owned),
            );
            match element(&text, "Marker") {
                Some(marker) => {
                    assert_eq!(element(&text, "IsTruncated"), Some("true"));
                    query = format!("Action=ListUsers&MaxItems=3&Marker={marker}");
                }
                None => {
                    assert_eq!(element(&text, "IsTruncated"), Some("false"));
                    break;
                }
            }
        }

        assert_eq!(pages, 3);
        let expected: Vec<String> = (0..7).map(|i| format!("member-{i}")).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_should_answer_bad_requests_with_error_documents() {
        let iam = iam(false);

        assert_error(
            &iam.handle_query_string("UserName=nobody"),
            http::StatusCode::BAD_REQUEST,
            "MissingParameter",
        );
        assert_error(
            &iam.handle_query_string("Action=CreateBucket"),
            http::StatusCode::BAD_REQUEST,
            "InvalidAction",
        );
        assert_error(
            &iam.handle_query_string("Action=GetUser&UserName=nobody"),
            http::StatusCode::NOT_FOUND,
            "NoSuchEntity",
        );
        assert_error(
            &iam.handle_query_string("Action=ListUsers&Marker=not-a-marker"),
            http::StatusCode::BAD_REQUEST,
            "InvalidInput",
        );

        assert!(iam.handle_query_string("Action=CreateGroup&GroupName=ops").is_success());
        assert_error(
            &iam.handle_query_string("Action=CreateGroup&GroupName=ops"),
            http::StatusCode::CONFLICT,
            "EntityAlreadyExists",
        );
    }

    #[test]
    fn test_should_wire_roles_into_instance_profiles() {
        let iam = iam(false);
        let trust = r#"{"Version":"2012-10-17","Statement":[]}"#;
        let resp = iam.handle_query([
            ("Action", "CreateRole"),
            ("RoleName", "web"),
            ("AssumeRolePolicyDocument", trust),
        ]);
        assert!(resp.is_success(), "create role failed: {}", resp.text());
        assert!(iam.handle_query_string("Action=CreateInstanceProfile&InstanceProfileName=web-profile").is_success());
        assert!(
            iam.handle_query_string("Action=AddRoleToInstanceProfile&InstanceProfileName=web-profile&RoleName=web")
                .is_success()
        );

        let resp = iam.handle_query_string("Action=ListInstanceProfilesForRole&RoleName=web");
        let text = resp.text();
        assert_eq!(element(&text, "InstanceProfileName"), Some("web-profile"));
        assert!(text.contains("<Roles><member>"));
        assert_eq!(element(&text, "RoleName"), Some("web"));

        assert_error(
            &iam.handle_query_string("Action=DeleteRole&RoleName=web"),
            http::StatusCode::CONFLICT,
            "DeleteConflict",
        );
    }
}
