//! IAM Query-protocol front end.
//!
//! Requests are flat `Action=...&Name=Value` parameter sets, as sent in a
//! form-encoded POST body. Every response is an XML document; failures are
//! rendered as `<ErrorResponse>` with the status code of the error.

pub mod xml;

use std::collections::HashMap;
use std::io;

use tracing::{debug, warn};

use crate::error::{IamError, IamErrorCode, IamResult};
use crate::operations::IamOperation;
use crate::provider::MockIam;
use crate::types::{AccessKeyStatus, CreatePolicyInput, CreateRoleInput, ListPoliciesInput, PolicyScope};

use self::xml::{XmlOut, write_element, write_members, write_page_tail, write_string_members, write_text};

/// Content type of every Query response.
pub const CONTENT_TYPE: &str = "text/xml";

/// A rendered Query response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    /// HTTP status.
    pub status: http::StatusCode,
    /// XML body.
    pub body: Vec<u8>,
}

impl QueryResponse {
    /// The body as text.
    #[must_use]
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Whether the request succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Decoded request parameters. The last occurrence of a name wins.
#[derive(Debug)]
struct QueryParams {
    values: HashMap<String, String>,
}

impl QueryParams {
    fn required(&self, name: &str) -> IamResult<&str> {
        self.optional(name).ok_or_else(|| {
            IamError::validation(format!(
                "1 validation error detected: Value null at '{name}' failed to satisfy constraint: Member must not be null"
            ))
        })
    }

    fn optional(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    fn bool(&self, name: &str) -> IamResult<Option<bool>> {
        self.optional(name)
            .map(|v| match v {
                "true" | "True" => Ok(true),
                "false" | "False" => Ok(false),
                other => Err(IamError::validation(format!(
                    "Invalid value {other} for {name}: expected true or false"
                ))),
            })
            .transpose()
    }

    fn number<T: std::str::FromStr>(&self, name: &str) -> IamResult<Option<T>> {
        self.optional(name)
            .map(|v| {
                v.parse::<T>().map_err(|_| {
                    IamError::validation(format!("Invalid value {v} for {name}: expected a number"))
                })
            })
            .transpose()
    }

    fn max_items(&self) -> IamResult<Option<usize>> {
        self.number("MaxItems")
    }

    fn marker(&self) -> Option<&str> {
        self.optional("Marker")
    }
}

fn render_failure(err: &io::Error) -> IamError {
    IamError::service_failure(format!("failed to render response: {err}"))
}

fn respond<F>(op: IamOperation, request_id: &str, result: F) -> IamResult<Vec<u8>>
where
    F: FnOnce(&mut XmlOut<'_>) -> io::Result<()>,
{
    xml::result_document(op.as_str(), request_id, result).map_err(|e| render_failure(&e))
}

fn respond_empty(op: IamOperation, request_id: &str) -> IamResult<Vec<u8>> {
    xml::empty_document(op.as_str(), request_id).map_err(|e| render_failure(&e))
}

impl MockIam {
    /// Handle a Query request given its decoded parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use awsmock_iam::MockIam;
    ///
    /// let iam = MockIam::default();
    /// let resp = iam.handle_query([("Action", "CreateUser"), ("UserName", "alice")]);
    /// assert!(resp.is_success());
    /// assert!(resp.text().contains("<UserName>alice</UserName>"));
    /// ```
    pub fn handle_query<I, K, V>(&self, params: I) -> QueryResponse
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let params = QueryParams {
            values: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        };
        let request_id = awsmock_core::ids::request_id();

        let result = match params.optional("Action") {
            None => Err(IamError::missing_parameter("Action")),
            Some(action) => match IamOperation::from_action(action) {
                Some(op) => {
                    debug!(action = %op, request_id = %request_id, "dispatching IAM request");
                    self.dispatch(op, &params, &request_id)
                }
                None => {
                    warn!(action = %action, "unsupported IAM action");
                    Err(IamError::with_message(
                        IamErrorCode::InvalidAction,
                        format!("Could not find operation {action} for version 2010-05-08"),
                    ))
                }
            },
        };

        match result {
            Ok(body) => QueryResponse {
                status: http::StatusCode::OK,
                body,
            },
            Err(err) => {
                debug!(code = %err.code, message = %err.message, "IAM request failed");
                QueryResponse {
                    status: err.status_code(),
                    body: xml::error_document(&err, &request_id),
                }
            }
        }
    }

    /// Handle a form-encoded Query request body.
    pub fn handle_query_string(&self, body: &str) -> QueryResponse {
        self.handle_query(form_urlencoded::parse(body.as_bytes()).into_owned())
    }

    #[allow(clippy::too_many_lines)]
    fn dispatch(&self, op: IamOperation, p: &QueryParams, rid: &str) -> IamResult<Vec<u8>> {
        match op {
            // Users
            IamOperation::CreateUser => {
                let user = self.create_user(p.required("UserName")?, p.optional("Path"))?;
                respond(op, rid, |w| write_element(w, "User", |w| xml::write_user(w, &user)))
            }
            IamOperation::GetUser => {
                let user = self.get_user(p.required("UserName")?)?;
                respond(op, rid, |w| write_element(w, "User", |w| xml::write_user(w, &user)))
            }
            IamOperation::UpdateUser => {
                self.update_user(
                    p.required("UserName")?,
                    p.optional("NewUserName"),
                    p.optional("NewPath"),
                )?;
                respond_empty(op, rid)
            }
            IamOperation::DeleteUser => {
                self.delete_user(p.required("UserName")?)?;
                respond_empty(op, rid)
            }
            IamOperation::ListUsers => {
                let page = self.list_users(p.optional("PathPrefix"), p.marker(), p.max_items()?)?;
                respond(op, rid, |w| {
                    write_members(w, "Users", &page.items, xml::write_user)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }

            // Groups
            IamOperation::CreateGroup => {
                let group = self.create_group(p.required("GroupName")?, p.optional("Path"))?;
                respond(op, rid, |w| write_element(w, "Group", |w| xml::write_group(w, &group)))
            }
            IamOperation::GetGroup => {
                let detail = self.get_group(p.required("GroupName")?, p.marker(), p.max_items()?)?;
                respond(op, rid, |w| {
                    write_element(w, "Group", |w| xml::write_group(w, &detail.group))?;
                    write_members(w, "Users", &detail.users.items, xml::write_user)?;
                    write_page_tail(w, detail.users.is_truncated, detail.users.marker.as_deref())
                })
            }
            IamOperation::UpdateGroup => {
                self.update_group(
                    p.required("GroupName")?,
                    p.optional("NewGroupName"),
                    p.optional("NewPath"),
                )?;
                respond_empty(op, rid)
            }
            IamOperation::DeleteGroup => {
                self.delete_group(p.required("GroupName")?)?;
                respond_empty(op, rid)
            }
            IamOperation::ListGroups => {
                let page = self.list_groups(p.optional("PathPrefix"), p.marker(), p.max_items()?)?;
                respond(op, rid, |w| {
                    write_members(w, "Groups", &page.items, xml::write_group)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }
            IamOperation::AddUserToGroup => {
                self.add_user_to_group(p.required("GroupName")?, p.required("UserName")?)?;
                respond_empty(op, rid)
            }
            IamOperation::RemoveUserFromGroup => {
                self.remove_user_from_group(p.required("GroupName")?, p.required("UserName")?)?;
                respond_empty(op, rid)
            }
            IamOperation::ListGroupsForUser => {
                let page = self.list_groups_for_user(p.required("UserName")?, p.marker(), p.max_items()?)?;
                respond(op, rid, |w| {
                    write_members(w, "Groups", &page.items, xml::write_group)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }

            // Roles
            IamOperation::CreateRole => {
                let role = self.create_role(CreateRoleInput {
                    role_name: p.required("RoleName")?.to_owned(),
                    path: p.optional("Path").map(str::to_owned),
                    assume_role_policy_document: p.required("AssumeRolePolicyDocument")?.to_owned(),
                    description: p.optional("Description").map(str::to_owned),
                    max_session_duration: p.number("MaxSessionDuration")?,
                })?;
                respond(op, rid, |w| write_element(w, "Role", |w| xml::write_role(w, &role)))
            }
            IamOperation::GetRole => {
                let role = self.get_role(p.required("RoleName")?)?;
                respond(op, rid, |w| write_element(w, "Role", |w| xml::write_role(w, &role)))
            }
            IamOperation::UpdateRole => {
                self.update_role(
                    p.required("RoleName")?,
                    p.optional("Description"),
                    p.number("MaxSessionDuration")?,
                )?;
                respond(op, rid, |_| Ok(()))
            }
            IamOperation::UpdateAssumeRolePolicy => {
                self.update_assume_role_policy(p.required("RoleName")?, p.required("PolicyDocument")?)?;
                respond_empty(op, rid)
            }
            IamOperation::DeleteRole => {
                self.delete_role(p.required("RoleName")?)?;
                respond_empty(op, rid)
            }
            IamOperation::ListRoles => {
                let page = self.list_roles(p.optional("PathPrefix"), p.marker(), p.max_items()?)?;
                respond(op, rid, |w| {
                    write_members(w, "Roles", &page.items, xml::write_role)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }

            // Managed policies
            IamOperation::CreatePolicy => {
                let policy = self.create_policy(CreatePolicyInput {
                    policy_name: p.required("PolicyName")?.to_owned(),
                    path: p.optional("Path").map(str::to_owned),
                    policy_document: p.required("PolicyDocument")?.to_owned(),
                    description: p.optional("Description").map(str::to_owned),
                })?;
                respond(op, rid, |w| write_element(w, "Policy", |w| xml::write_policy(w, &policy)))
            }
            IamOperation::GetPolicy => {
                let policy = self.get_policy(p.required("PolicyArn")?)?;
                respond(op, rid, |w| write_element(w, "Policy", |w| xml::write_policy(w, &policy)))
            }
            IamOperation::DeletePolicy => {
                self.delete_policy(p.required("PolicyArn")?)?;
                respond_empty(op, rid)
            }
            IamOperation::ListPolicies => {
                let input = ListPoliciesInput {
                    scope: p.optional("Scope").map_or(Ok(PolicyScope::All), str::parse::<PolicyScope>)?,
                    only_attached: p.bool("OnlyAttached")?.unwrap_or(false),
                    path_prefix: p.optional("PathPrefix").map(str::to_owned),
                    marker: p.marker().map(str::to_owned),
                    max_items: p.max_items()?,
                };
                let page = self.list_policies(&input)?;
                respond(op, rid, |w| {
                    write_members(w, "Policies", &page.items, xml::write_policy)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }
            IamOperation::CreatePolicyVersion => {
                let version = self.create_policy_version(
                    p.required("PolicyArn")?,
                    p.required("PolicyDocument")?,
                    p.bool("SetAsDefault")?.unwrap_or(false),
                )?;
                respond(op, rid, |w| {
                    write_element(w, "PolicyVersion", |w| xml::write_policy_version(w, &version))
                })
            }
            IamOperation::GetPolicyVersion => {
                let version = self.get_policy_version(p.required("PolicyArn")?, p.required("VersionId")?)?;
                respond(op, rid, |w| {
                    write_element(w, "PolicyVersion", |w| xml::write_policy_version(w, &version))
                })
            }
            IamOperation::ListPolicyVersions => {
                let page = self.list_policy_versions(p.required("PolicyArn")?, p.marker(), p.max_items()?)?;
                respond(op, rid, |w| {
                    write_members(w, "Versions", &page.items, xml::write_policy_version)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }
            IamOperation::DeletePolicyVersion => {
                self.delete_policy_version(p.required("PolicyArn")?, p.required("VersionId")?)?;
                respond_empty(op, rid)
            }
            IamOperation::SetDefaultPolicyVersion => {
                self.set_default_policy_version(p.required("PolicyArn")?, p.required("VersionId")?)?;
                respond_empty(op, rid)
            }

            // Attachments
            IamOperation::AttachUserPolicy => {
                self.attach_user_policy(p.required("UserName")?, p.required("PolicyArn")?)?;
                respond_empty(op, rid)
            }
            IamOperation::DetachUserPolicy => {
                self.detach_user_policy(p.required("UserName")?, p.required("PolicyArn")?)?;
                respond_empty(op, rid)
            }
            IamOperation::ListAttachedUserPolicies => {
                let page = self.list_attached_user_policies(
                    p.required("UserName")?,
                    p.optional("PathPrefix"),
                    p.marker(),
                    p.max_items()?,
                )?;
                respond(op, rid, |w| {
                    write_members(w, "AttachedPolicies", &page.items, xml::write_attached_policy)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }
            IamOperation::AttachGroupPolicy => {
                self.attach_group_policy(p.required("GroupName")?, p.required("PolicyArn")?)?;
                respond_empty(op, rid)
            }
            IamOperation::DetachGroupPolicy => {
                self.detach_group_policy(p.required("GroupName")?, p.required("PolicyArn")?)?;
                respond_empty(op, rid)
            }
            IamOperation::ListAttachedGroupPolicies => {
                let page = self.list_attached_group_policies(
                    p.required("GroupName")?,
                    p.optional("PathPrefix"),
                    p.marker(),
                    p.max_items()?,
                )?;
                respond(op, rid, |w| {
                    write_members(w, "AttachedPolicies", &page.items, xml::write_attached_policy)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }
            IamOperation::AttachRolePolicy => {
                self.attach_role_policy(p.required("RoleName")?, p.required("PolicyArn")?)?;
                respond_empty(op, rid)
            }
            IamOperation::DetachRolePolicy => {
                self.detach_role_policy(p.required("RoleName")?, p.required("PolicyArn")?)?;
                respond_empty(op, rid)
            }
            IamOperation::ListAttachedRolePolicies => {
                let page = self.list_attached_role_policies(
                    p.required("RoleName")?,
                    p.optional("PathPrefix"),
                    p.marker(),
                    p.max_items()?,
                )?;
                respond(op, rid, |w| {
                    write_members(w, "AttachedPolicies", &page.items, xml::write_attached_policy)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }

            // Inline policies
            IamOperation::PutUserPolicy => {
                self.put_user_policy(
                    p.required("UserName")?,
                    p.required("PolicyName")?,
                    p.required("PolicyDocument")?,
                )?;
                respond_empty(op, rid)
            }
            IamOperation::GetUserPolicy => {
                let policy = self.get_user_policy(p.required("UserName")?, p.required("PolicyName")?)?;
                respond(op, rid, |w| xml::write_inline_policy(w, "UserName", &policy))
            }
            IamOperation::DeleteUserPolicy => {
                self.delete_user_policy(p.required("UserName")?, p.required("PolicyName")?)?;
                respond_empty(op, rid)
            }
            IamOperation::ListUserPolicies => {
                let page = self.list_user_policies(p.required("UserName")?, p.marker(), p.max_items()?)?;
                respond(op, rid, |w| {
                    write_string_members(w, "PolicyNames", &page.items)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }
            IamOperation::PutGroupPolicy => {
                self.put_group_policy(
                    p.required("GroupName")?,
                    p.required("PolicyName")?,
                    p.required("PolicyDocument")?,
                )?;
                respond_empty(op, rid)
            }
            IamOperation::GetGroupPolicy => {
                let policy = self.get_group_policy(p.required("GroupName")?, p.required("PolicyName")?)?;
                respond(op, rid, |w| xml::write_inline_policy(w, "GroupName", &policy))
            }
            IamOperation::DeleteGroupPolicy => {
                self.delete_group_policy(p.required("GroupName")?, p.required("PolicyName")?)?;
                respond_empty(op, rid)
            }
            IamOperation::ListGroupPolicies => {
                let page = self.list_group_policies(p.required("GroupName")?, p.marker(), p.max_items()?)?;
                respond(op, rid, |w| {
                    write_string_members(w, "PolicyNames", &page.items)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }
            IamOperation::PutRolePolicy => {
                self.put_role_policy(
                    p.required("RoleName")?,
                    p.required("PolicyName")?,
                    p.required("PolicyDocument")?,
                )?;
                respond_empty(op, rid)
            }
            IamOperation::GetRolePolicy => {
                let policy = self.get_role_policy(p.required("RoleName")?, p.required("PolicyName")?)?;
                respond(op, rid, |w| xml::write_inline_policy(w, "RoleName", &policy))
            }
            IamOperation::DeleteRolePolicy => {
                self.delete_role_policy(p.required("RoleName")?, p.required("PolicyName")?)?;
                respond_empty(op, rid)
            }
            IamOperation::ListRolePolicies => {
                let page = self.list_role_policies(p.required("RoleName")?, p.marker(), p.max_items()?)?;
                respond(op, rid, |w| {
                    write_string_members(w, "PolicyNames", &page.items)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }

            // Instance profiles
            IamOperation::CreateInstanceProfile => {
                let detail =
                    self.create_instance_profile(p.required("InstanceProfileName")?, p.optional("Path"))?;
                respond(op, rid, |w| {
                    write_element(w, "InstanceProfile", |w| xml::write_instance_profile(w, &detail))
                })
            }
            IamOperation::GetInstanceProfile => {
                let detail = self.get_instance_profile(p.required("InstanceProfileName")?)?;
                respond(op, rid, |w| {
                    write_element(w, "InstanceProfile", |w| xml::write_instance_profile(w, &detail))
                })
            }
            IamOperation::DeleteInstanceProfile => {
                self.delete_instance_profile(p.required("InstanceProfileName")?)?;
                respond_empty(op, rid)
            }
            IamOperation::AddRoleToInstanceProfile => {
                self.add_role_to_instance_profile(p.required("InstanceProfileName")?, p.required("RoleName")?)?;
                respond_empty(op, rid)
            }
            IamOperation::RemoveRoleFromInstanceProfile => {
                self.remove_role_from_instance_profile(
                    p.required("InstanceProfileName")?,
                    p.required("RoleName")?,
                )?;
                respond_empty(op, rid)
            }
            IamOperation::ListInstanceProfiles => {
                let page = self.list_instance_profiles(p.optional("PathPrefix"), p.marker(), p.max_items()?)?;
                respond(op, rid, |w| {
                    write_members(w, "InstanceProfiles", &page.items, xml::write_instance_profile)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }
            IamOperation::ListInstanceProfilesForRole => {
                let page =
                    self.list_instance_profiles_for_role(p.required("RoleName")?, p.marker(), p.max_items()?)?;
                respond(op, rid, |w| {
                    write_members(w, "InstanceProfiles", &page.items, xml::write_instance_profile)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }

            // Access keys
            IamOperation::CreateAccessKey => {
                let key = self.create_access_key(p.required("UserName")?)?;
                respond(op, rid, |w| {
                    write_element(w, "AccessKey", |w| xml::write_access_key(w, &key))
                })
            }
            IamOperation::UpdateAccessKey => {
                let status: AccessKeyStatus = p.required("Status")?.parse()?;
                self.update_access_key(p.optional("UserName"), p.required("AccessKeyId")?, status)?;
                respond_empty(op, rid)
            }
            IamOperation::DeleteAccessKey => {
                self.delete_access_key(p.optional("UserName"), p.required("AccessKeyId")?)?;
                respond_empty(op, rid)
            }
            IamOperation::ListAccessKeys => {
                let user_name = p.required("UserName")?;
                let page = self.list_access_keys(user_name, p.marker(), p.max_items()?)?;
                respond(op, rid, |w| {
                    write_text(w, "UserName", user_name)?;
                    write_members(w, "AccessKeyMetadata", &page.items, xml::write_access_key_metadata)?;
                    write_page_tail(w, page.is_truncated, page.marker.as_deref())
                })
            }

            // Login profiles
            IamOperation::CreateLoginProfile => {
                let profile = self.create_login_profile(
                    p.required("UserName")?,
                    p.required("Password")?,
                    p.bool("PasswordResetRequired")?.unwrap_or(false),
                )?;
                respond(op, rid, |w| {
                    write_element(w, "LoginProfile", |w| xml::write_login_profile(w, &profile))
                })
            }
            IamOperation::GetLoginProfile => {
                let profile = self.get_login_profile(p.required("UserName")?)?;
                respond(op, rid, |w| {
                    write_element(w, "LoginProfile", |w| xml::write_login_profile(w, &profile))
                })
            }
            IamOperation::UpdateLoginProfile => {
                self.update_login_profile(
                    p.required("UserName")?,
                    p.optional("Password"),
                    p.bool("PasswordResetRequired")?,
                )?;
                respond_empty(op, rid)
            }
            IamOperation::DeleteLoginProfile => {
                self.delete_login_profile(p.required("UserName")?)?;
                respond_empty(op, rid)
            }
        }
    }
}
