//! Parameter validation for IAM requests.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{IamError, IamErrorCode, IamResult};

/// Longest user, role or instance profile name.
pub const MAX_SHORT_NAME_LEN: usize = 64;

/// Longest group or policy name.
pub const MAX_LONG_NAME_LEN: usize = 128;

/// Longest entity path.
pub const MAX_PATH_LEN: usize = 512;

/// Longest role or policy description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Accepted role session durations, in seconds.
pub const SESSION_DURATION_RANGE: std::ops::RangeInclusive<i32> = 3600..=43200;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w+=,.@-]+$").expect("name pattern is a valid regex"));

/// Validate an entity name of at most `max_len` characters.
///
/// # Examples
///
/// ```
/// use awsmock_iam::validation::{MAX_SHORT_NAME_LEN, validate_name};
///
/// assert!(validate_name("userName", "alice@example.com", MAX_SHORT_NAME_LEN).is_ok());
/// assert!(validate_name("userName", "alice smith", MAX_SHORT_NAME_LEN).is_err());
/// ```
pub fn validate_name(field: &str, name: &str, max_len: usize) -> IamResult<()> {
    let len = name.chars().count();
    if len == 0 || len > max_len {
        return Err(IamError::validation(format!(
            "1 validation error detected: Value at '{field}' failed to satisfy constraint: \
             Member must have length between 1 and {max_len}"
        )));
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(IamError::validation(format!(
            "1 validation error detected: Value '{name}' at '{field}' failed to satisfy \
             constraint: Member must satisfy regular expression pattern: [\\w+=,.@-]+"
        )));
    }
    Ok(())
}

fn printable(s: &str) -> bool {
    s.chars().all(|c| ('\u{21}'..='\u{7e}').contains(&c))
}

/// Validate an entity path: `/` or `/segment/.../`.
pub fn validate_path(path: &str) -> IamResult<()> {
    let ok = path.len() <= MAX_PATH_LEN
        && path.starts_with('/')
        && path.ends_with('/')
        && printable(path);
    if ok {
        Ok(())
    } else {
        Err(IamError::validation(format!(
            "The specified value for path is invalid: {path}. It must begin and end with / \
             and contain only printable ASCII characters."
        )))
    }
}

/// Validate a path prefix used to filter listings.
pub fn validate_path_prefix(prefix: &str) -> IamResult<()> {
    if prefix.len() <= MAX_PATH_LEN && prefix.starts_with('/') && printable(prefix) {
        Ok(())
    } else {
        Err(IamError::validation(format!(
            "The specified value for pathPrefix is invalid: {prefix}"
        )))
    }
}

/// Validate a policy document: a non-empty JSON object.
pub fn validate_policy_document(document: &str) -> IamResult<()> {
    let malformed = |reason: &str| {
        IamError::with_message(IamErrorCode::MalformedPolicyDocument, reason.to_owned())
    };
    match serde_json::from_str::<serde_json::Value>(document) {
        Ok(serde_json::Value::Object(map)) if !map.is_empty() => Ok(()),
        Ok(serde_json::Value::Object(_)) => Err(malformed("Policy document must not be empty")),
        Ok(_) => Err(malformed("Policy document must be a JSON object")),
        Err(e) => Err(malformed(&format!("Syntax errors in policy: {e}"))),
    }
}

/// Validate a role or policy description.
pub fn validate_description(description: &str) -> IamResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(IamError::validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a role's maximum session duration.
pub fn validate_session_duration(seconds: i32) -> IamResult<()> {
    if SESSION_DURATION_RANGE.contains(&seconds) {
        Ok(())
    } else {
        Err(IamError::validation(format!(
            "The requested MaxSessionDuration {seconds} must be between 3600 and 43200 seconds"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_accept_valid_names() {
        let longest = "x".repeat(64);
        for name in ["alice", "svc+role=a,b.c@d-e", "a_b", longest.as_str()] {
            assert!(
                validate_name("userName", name, MAX_SHORT_NAME_LEN).is_ok(),
                "{name} should be valid"
            );
        }
        assert!(validate_name("groupName", &"g".repeat(128), MAX_LONG_NAME_LEN).is_ok());
    }

    #[test]
    fn test_should_reject_invalid_names() {
        let too_long = "x".repeat(65);
        for name in ["", "has space", "slash/name", "colon:name", too_long.as_str()] {
            let err = validate_name("userName", name, MAX_SHORT_NAME_LEN);
            assert!(
                matches!(&err, Err(e) if e.code == IamErrorCode::ValidationError),
                "{name:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_should_validate_paths() {
        assert!(validate_path("/").is_ok());
        assert!(validate_path("/division/team/").is_ok());
        let too_long = format!("/{}/", "a".repeat(511));
        for bad in ["", "no-slash", "/missing-end", "/with space/", too_long.as_str()] {
            assert!(validate_path(bad).is_err(), "{bad:?} should be rejected");
        }
        assert!(validate_path_prefix("/division").is_ok());
        assert!(validate_path_prefix("division").is_err());
    }

    #[test]
    fn test_should_validate_policy_documents() {
        assert!(validate_policy_document(r#"{"Version":"2012-10-17","Statement":[]}"#).is_ok());
        for bad in ["", "not json", "[]", "{}", "\"text\""] {
            let err = validate_policy_document(bad);
            assert!(
                matches!(&err, Err(e) if e.code == IamErrorCode::MalformedPolicyDocument),
                "{bad:?} should be malformed, got {err:?}"
            );
        }
    }

    #[test]
    fn test_should_bound_session_duration() {
        assert!(validate_session_duration(3600).is_ok());
        assert!(validate_session_duration(43200).is_ok());
        assert!(validate_session_duration(3599).is_err());
        assert!(validate_session_duration(43201).is_err());
    }
}
