//! IAM XML rendering.
//!
//! Success documents wrap the action result:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <GetUserResponse xmlns="https://iam.amazonaws.com/doc/2010-05-08/">
//!   <GetUserResult>...</GetUserResult>
//!   <ResponseMetadata><RequestId>...</RequestId></ResponseMetadata>
//! </GetUserResponse>
//! ```
//!
//! Lists are rendered as `<member>` children, and timestamps as ISO 8601 in
//! UTC with second precision.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::error::IamError;
use crate::types::{
    AccessKey, AccessKeyMetadata, AttachedPolicy, Group, InlinePolicy, InstanceProfileDetail,
    LoginProfile, ManagedPolicy, PolicyVersion, Role, User,
};

/// The IAM XML namespace.
pub const IAM_NAMESPACE: &str = "https://iam.amazonaws.com/doc/2010-05-08/";

/// Writer over an in-memory document.
pub type XmlOut<'a> = Writer<&'a mut Vec<u8>>;

/// Render `<{action}Response>` with a `<{action}Result>` produced by `result`.
pub fn result_document<F>(action: &str, request_id: &str, result: F) -> io::Result<Vec<u8>>
where
    F: FnOnce(&mut XmlOut<'_>) -> io::Result<()>,
{
    document(action, request_id, Some(result))
}

/// Render `<{action}Response>` for an action without a result.
pub fn empty_document(action: &str, request_id: &str) -> io::Result<Vec<u8>> {
    document::<fn(&mut XmlOut<'_>) -> io::Result<()>>(action, request_id, None)
}

fn document<F>(action: &str, request_id: &str, result: Option<F>) -> io::Result<Vec<u8>>
where
    F: FnOnce(&mut XmlOut<'_>) -> io::Result<()>,
{
    let mut buf = Vec::with_capacity(512);
    let mut writer = Writer::new(&mut buf);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let response = format!("{action}Response");
    let result_tag = format!("{action}Result");
    writer
        .create_element(response.as_str())
        .with_attribute(("xmlns", IAM_NAMESPACE))
        .write_inner_content(|w| {
            if let Some(f) = result {
                w.create_element(result_tag.as_str()).write_inner_content(f)?;
            }
            w.create_element("ResponseMetadata")
                .write_inner_content(|w| write_text(w, "RequestId", request_id))?;
            Ok(())
        })?;

    Ok(buf)
}

/// Render an `<ErrorResponse>` document.
///
/// ```xml
/// <ErrorResponse xmlns="https://iam.amazonaws.com/doc/2010-05-08/">
///   <Error>
///     <Type>Sender</Type>
///     <Code>NoSuchEntity</Code>
///     <Message>The user with name alice cannot be found.</Message>
///   </Error>
///   <RequestId>...</RequestId>
/// </ErrorResponse>
/// ```
#[must_use]
pub fn error_document(error: &IamError, request_id: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);
    if let Err(e) = write_error(&mut buf, error, request_id) {
        tracing::error!(error = %e, "failed to serialize IAM error XML");
        buf.clear();
    }
    buf
}

fn write_error(buf: &mut Vec<u8>, error: &IamError, request_id: &str) -> io::Result<()> {
    let mut writer = Writer::new(buf);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer
        .create_element("ErrorResponse")
        .with_attribute(("xmlns", IAM_NAMESPACE))
        .write_inner_content(|w| {
            w.create_element("Error").write_inner_content(|w| {
                write_text(w, "Type", error.code.fault())?;
                write_text(w, "Code", error.code.as_str())?;
                write_text(w, "Message", &error.message)
            })?;
            write_text(w, "RequestId", request_id)
        })?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Primitive helpers
// ---------------------------------------------------------------------------

/// Write a simple `<tag>text</tag>` element.
pub fn write_text<W: Write>(w: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    w.create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

fn write_optional_text<W: Write>(w: &mut Writer<W>, tag: &str, value: Option<&str>) -> io::Result<()> {
    if let Some(v) = value {
        write_text(w, tag, v)?;
    }
    Ok(())
}

/// Write `<tag>true|false</tag>`.
pub fn write_bool<W: Write>(w: &mut Writer<W>, tag: &str, value: bool) -> io::Result<()> {
    write_text(w, tag, if value { "true" } else { "false" })
}

fn write_date<W: Write>(w: &mut Writer<W>, tag: &str, date: &DateTime<Utc>) -> io::Result<()> {
    write_text(w, tag, &date.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Write `<tag>` wrapping the content produced by `f`.
pub fn write_element<W, F>(w: &mut Writer<W>, tag: &str, f: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce(&mut Writer<W>) -> io::Result<()>,
{
    w.create_element(tag).write_inner_content(f)?;
    Ok(())
}

/// Write `<tag><member>..</member>...</tag>`, one member per item.
pub fn write_members<W, T, F>(w: &mut Writer<W>, tag: &str, items: &[T], f: F) -> io::Result<()>
where
    W: Write,
    F: Fn(&mut Writer<W>, &T) -> io::Result<()>,
{
    w.create_element(tag).write_inner_content(|w| {
        for item in items {
            w.create_element("member")
                .write_inner_content(|w| f(w, item))?;
        }
        Ok(())
    })?;
    Ok(())
}

/// Write `<tag><member>name</member>...</tag>` for plain strings.
pub fn write_string_members<W: Write>(w: &mut Writer<W>, tag: &str, items: &[String]) -> io::Result<()> {
    w.create_element(tag).write_inner_content(|w| {
        for item in items {
            write_text(w, "member", item)?;
        }
        Ok(())
    })?;
    Ok(())
}

/// Write the `IsTruncated` / `Marker` pair closing every list result.
pub fn write_page_tail<W: Write>(w: &mut Writer<W>, is_truncated: bool, marker: Option<&str>) -> io::Result<()> {
    write_bool(w, "IsTruncated", is_truncated)?;
    write_optional_text(w, "Marker", marker)
}

// ---------------------------------------------------------------------------
// Entity writers
// ---------------------------------------------------------------------------

/// User fields.
pub fn write_user<W: Write>(w: &mut Writer<W>, user: &User) -> io::Result<()> {
    write_text(w, "Path", &user.path)?;
    write_text(w, "UserName", &user.user_name)?;
    write_text(w, "UserId", &user.user_id)?;
    write_text(w, "Arn", &user.arn)?;
    write_date(w, "CreateDate", &user.create_date)
}

/// Group fields.
pub fn write_group<W: Write>(w: &mut Writer<W>, group: &Group) -> io::Result<()> {
    write_text(w, "Path", &group.path)?;
    write_text(w, "GroupName", &group.group_name)?;
    write_text(w, "GroupId", &group.group_id)?;
    write_text(w, "Arn", &group.arn)?;
    write_date(w, "CreateDate", &group.create_date)
}

/// Role fields.
pub fn write_role<W: Write>(w: &mut Writer<W>, role: &Role) -> io::Result<()> {
    write_text(w, "Path", &role.path)?;
    write_text(w, "RoleName", &role.role_name)?;
    write_text(w, "RoleId", &role.role_id)?;
    write_text(w, "Arn", &role.arn)?;
    write_date(w, "CreateDate", &role.create_date)?;
    write_text(w, "AssumeRolePolicyDocument", &role.assume_role_policy_document)?;
    write_optional_text(w, "Description", role.description.as_deref())?;
    write_text(w, "MaxSessionDuration", &role.max_session_duration.to_string())
}

/// Managed policy fields.
pub fn write_policy<W: Write>(w: &mut Writer<W>, policy: &ManagedPolicy) -> io::Result<()> {
    write_text(w, "PolicyName", &policy.policy_name)?;
    write_text(w, "PolicyId", &policy.policy_id)?;
    write_text(w, "Arn", &policy.arn)?;
    write_text(w, "Path", &policy.path)?;
    write_text(w, "DefaultVersionId", &policy.default_version_id)?;
    write_text(w, "AttachmentCount", &policy.attachment_count.to_string())?;
    write_bool(w, "IsAttachable", true)?;
    write_optional_text(w, "Description", policy.description.as_deref())?;
    write_date(w, "CreateDate", &policy.create_date)?;
    write_date(w, "UpdateDate", &policy.update_date)
}

/// Policy version fields.
pub fn write_policy_version<W: Write>(w: &mut Writer<W>, version: &PolicyVersion) -> io::Result<()> {
    write_text(w, "Document", &version.document)?;
    write_text(w, "VersionId", &version.version_id)?;
    write_bool(w, "IsDefaultVersion", version.is_default_version)?;
    write_date(w, "CreateDate", &version.create_date)
}

/// Attached policy fields.
pub fn write_attached_policy<W: Write>(w: &mut Writer<W>, policy: &AttachedPolicy) -> io::Result<()> {
    write_text(w, "PolicyName", &policy.policy_name)?;
    write_text(w, "PolicyArn", &policy.policy_arn)
}

/// Inline policy fields; `owner_tag` is `UserName`, `GroupName` or `RoleName`.
pub fn write_inline_policy<W: Write>(w: &mut Writer<W>, owner_tag: &str, policy: &InlinePolicy) -> io::Result<()> {
    write_text(w, owner_tag, &policy.owner_name)?;
    write_text(w, "PolicyName", &policy.policy_name)?;
    write_text(w, "PolicyDocument", &policy.policy_document)
}

/// Instance profile fields, including its roles.
pub fn write_instance_profile<W: Write>(w: &mut Writer<W>, detail: &InstanceProfileDetail) -> io::Result<()> {
    let profile = &detail.profile;
    write_text(w, "Path", &profile.path)?;
    write_text(w, "InstanceProfileName", &profile.instance_profile_name)?;
    write_text(w, "InstanceProfileId", &profile.instance_profile_id)?;
    write_text(w, "Arn", &profile.arn)?;
    write_date(w, "CreateDate", &profile.create_date)?;
    write_members(w, "Roles", &detail.roles, write_role)
}

/// Access key fields, including the secret.
pub fn write_access_key<W: Write>(w: &mut Writer<W>, key: &AccessKey) -> io::Result<()> {
    write_text(w, "UserName", &key.user_name)?;
    write_text(w, "AccessKeyId", &key.access_key_id)?;
    write_text(w, "Status", key.status.as_str())?;
    write_text(w, "SecretAccessKey", &key.secret_access_key)?;
    write_date(w, "CreateDate", &key.create_date)
}

/// Access key fields without the secret.
pub fn write_access_key_metadata<W: Write>(w: &mut Writer<W>, key: &AccessKeyMetadata) -> io::Result<()> {
    write_text(w, "UserName", &key.user_name)?;
    write_text(w, "AccessKeyId", &key.access_key_id)?;
    write_text(w, "Status", key.status.as_str())?;
    write_date(w, "CreateDate", &key.create_date)
}

/// Login profile fields.
pub fn write_login_profile<W: Write>(w: &mut Writer<W>, profile: &LoginProfile) -> io::Result<()> {
    write_text(w, "UserName", &profile.user_name)?;
    write_date(w, "CreateDate", &profile.create_date)?;
    write_bool(w, "PasswordResetRequired", profile.password_reset_required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IamErrorCode;

    fn text(bytes: &[u8]) -> &str {
        std::str::from_utf8(bytes).unwrap_or_else(|e| panic!("invalid UTF-8: {e}"))
    }

    #[test]
    fn test_should_render_result_document() {
        let xml = result_document("ListUserPolicies", "req-1", |w| {
            write_string_members(w, "PolicyNames", &["a".to_owned(), "b".to_owned()])?;
            write_page_tail(w, false, None)
        })
        .unwrap_or_else(|e| panic!("render failed: {e}"));
        let xml = text(&xml);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(
            "<ListUserPoliciesResponse xmlns=\"https://iam.amazonaws.com/doc/2010-05-08/\">"
        ));
        assert!(xml.contains(
            "<ListUserPoliciesResult><PolicyNames><member>a</member><member>b</member></PolicyNames>"
        ));
        assert!(xml.contains("<IsTruncated>false</IsTruncated></ListUserPoliciesResult>"));
        assert!(!xml.contains("<Marker>"));
        assert!(xml.contains("<ResponseMetadata><RequestId>req-1</RequestId></ResponseMetadata>"));
    }

    #[test]
    fn test_should_omit_result_for_empty_document() {
        let xml = empty_document("DeleteUser", "req-2").unwrap_or_else(|e| panic!("render failed: {e}"));
        let xml = text(&xml);
        assert!(xml.contains("<DeleteUserResponse"));
        assert!(!xml.contains("DeleteUserResult"));
        assert!(xml.contains("<RequestId>req-2</RequestId>"));
    }

    #[test]
    fn test_should_render_error_document() {
        let err = IamError::with_message(IamErrorCode::NoSuchEntity, "missing <user> & co");
        let xml = error_document(&err, "req-3");
        let xml = text(&xml);
        assert!(xml.contains("<ErrorResponse xmlns=\"https://iam.amazonaws.com/doc/2010-05-08/\">"));
        assert!(xml.contains("<Error><Type>Sender</Type><Code>NoSuchEntity</Code>"));
        assert!(xml.contains("<Message>missing &lt;user&gt; &amp; co</Message></Error>"));
        assert!(xml.contains("<RequestId>req-3</RequestId></ErrorResponse>"));
    }
}
