//! Validation for S3 requests.
//!
//! Bucket names, object keys, tag sets, user metadata, `Content-MD5` and
//! storage classes are checked here before any state is touched.

use std::collections::{HashMap, HashSet};
use std::hash::BuildHasher;
use std::net::Ipv4Addr;

use base64::Engine;
use md5::{Digest, Md5};

use crate::error::{S3ServiceError, S3ServiceResult};

/// Maximum number of tags on a single object or bucket.
pub const MAX_TAGS: usize = 50;

const MAX_TAG_KEY_LEN: usize = 128;
const MAX_TAG_VALUE_LEN: usize = 256;

/// Maximum total size (in bytes) of all user-defined metadata keys and values.
pub const MAX_METADATA_SIZE: usize = 2048;

const MAX_KEY_BYTES: usize = 1024;

const BUCKET_NAME_LEN: std::ops::RangeInclusive<usize> = 3..=63;
const RELAXED_BUCKET_NAME_LEN: std::ops::RangeInclusive<usize> = 1..=255;

/// Storage classes accepted on `PUT`, copy and multipart initiation.
pub const STORAGE_CLASSES: &[&str] = &[
    "STANDARD",
    "REDUCED_REDUNDANCY",
    "STANDARD_IA",
    "ONEZONE_IA",
    "INTELLIGENT_TIERING",
    "GLACIER",
    "DEEP_ARCHIVE",
    "GLACIER_IR",
];

fn invalid_bucket(name: &str, reason: impl Into<String>) -> S3ServiceError {
    S3ServiceError::InvalidBucketName {
        name: name.to_owned(),
        reason: reason.into(),
    }
}

/// Validate a bucket name against the DNS-compliant naming rules.
///
/// - 3-63 characters of lowercase letters, digits, hyphens and dots
/// - starts and ends with a letter or digit
/// - no `..`, not an IPv4 address
/// - no `xn--` / `sthree-` prefix and no `-s3alias` / `--ol-s3` suffix
///
/// # Examples
///
/// ```
/// use awsmock_s3::validation::validate_bucket_name;
///
/// assert!(validate_bucket_name("my-valid-bucket").is_ok());
/// assert!(validate_bucket_name("AB").is_err());
/// ```
pub fn validate_bucket_name(name: &str) -> S3ServiceResult<()> {
    if !BUCKET_NAME_LEN.contains(&name.len()) {
        return Err(invalid_bucket(
            name,
            "Bucket name must be between 3 and 63 characters long",
        ));
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return Err(invalid_bucket(
            name,
            "Bucket name must only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    let edge_ok = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    let bytes = name.as_bytes();
    if !edge_ok(bytes[0]) || !edge_ok(bytes[bytes.len() - 1]) {
        return Err(invalid_bucket(
            name,
            "Bucket name must start and end with a letter or number",
        ));
    }

    if name.contains("..") {
        return Err(invalid_bucket(name, "Bucket name must not contain consecutive dots"));
    }

    if name.parse::<Ipv4Addr>().is_ok() {
        return Err(invalid_bucket(
            name,
            "Bucket name must not be formatted as an IP address",
        ));
    }

    for prefix in ["xn--", "sthree-"] {
        if name.starts_with(prefix) {
            return Err(invalid_bucket(
                name,
                format!("Bucket name must not start with '{prefix}'"),
            ));
        }
    }
    for suffix in ["-s3alias", "--ol-s3"] {
        if name.ends_with(suffix) {
            return Err(invalid_bucket(
                name,
                format!("Bucket name must not end with '{suffix}'"),
            ));
        }
    }

    Ok(())
}

/// Validate a bucket name under the legacy (pre-2018 us-east-1) rules:
/// 1-255 characters of letters, digits, `.`, `_` and `-`.
pub fn validate_bucket_name_relaxed(name: &str) -> S3ServiceResult<()> {
    if !RELAXED_BUCKET_NAME_LEN.contains(&name.len()) {
        return Err(invalid_bucket(
            name,
            "Bucket name must be between 1 and 255 characters long",
        ));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
    {
        return Err(invalid_bucket(
            name,
            "Bucket name must only contain letters, numbers, periods, underscores, and hyphens",
        ));
    }
    Ok(())
}

/// Validate an S3 object key: non-empty and at most 1024 bytes.
///
/// # Examples
///
/// ```
/// use awsmock_s3::validation::validate_object_key;
///
/// assert!(validate_object_key("photos/2024/image.jpg").is_ok());
/// assert!(validate_object_key("").is_err());
/// ```
pub fn validate_object_key(key: &str) -> S3ServiceResult<()> {
    if key.is_empty() {
        return Err(S3ServiceError::invalid_argument("Object key must not be empty"));
    }
    if key.len() > MAX_KEY_BYTES {
        return Err(S3ServiceError::KeyTooLong);
    }
    Ok(())
}

/// Validate a tag set: at most 50 tags, keys 1-128 characters, values up
/// to 256 characters, no duplicate keys.
///
/// # Examples
///
/// ```
/// use awsmock_s3::validation::validate_tags;
///
/// let tags = vec![
///     ("env".to_owned(), "prod".to_owned()),
///     ("team".to_owned(), "backend".to_owned()),
/// ];
/// assert!(validate_tags(&tags).is_ok());
/// ```
pub fn validate_tags(tags: &[(String, String)]) -> S3ServiceResult<()> {
    let invalid = |message: String| S3ServiceError::InvalidTag { message };

    if tags.len() > MAX_TAGS {
        return Err(invalid(format!(
            "Object tags cannot be greater than {MAX_TAGS}, got {}",
            tags.len()
        )));
    }

    let mut seen = HashSet::with_capacity(tags.len());
    for (key, value) in tags {
        let key_len = key.chars().count();
        if key_len == 0 || key_len > MAX_TAG_KEY_LEN {
            return Err(invalid(format!(
                "The TagKey you have provided is invalid: length {key_len}"
            )));
        }
        if value.chars().count() > MAX_TAG_VALUE_LEN {
            return Err(invalid(format!(
                "The TagValue you have provided is too long: {} characters",
                value.chars().count()
            )));
        }
        if !seen.insert(key.as_str()) {
            return Err(invalid(format!("Cannot provide multiple Tags with the same key: {key}")));
        }
    }

    Ok(())
}

/// Validate user-defined metadata: keys plus values at most 2 KiB.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use awsmock_s3::validation::validate_metadata;
///
/// let mut meta = HashMap::new();
/// meta.insert("color".to_owned(), "blue".to_owned());
/// assert!(validate_metadata(&meta).is_ok());
/// ```
pub fn validate_metadata<S: BuildHasher>(
    metadata: &HashMap<String, String, S>,
) -> S3ServiceResult<()> {
    let size: usize = metadata.iter().map(|(k, v)| k.len() + v.len()).sum();
    if size > MAX_METADATA_SIZE {
        return Err(S3ServiceError::MetadataTooLarge { size });
    }
    Ok(())
}

/// Validate the `Content-MD5` header against the body. An absent header is
/// always accepted.
///
/// # Examples
///
/// ```
/// use awsmock_s3::validation::validate_content_md5;
///
/// assert!(validate_content_md5(None, b"hello").is_ok());
/// assert!(validate_content_md5(Some("XUFAKrxLKna5cZ2REBfFkg=="), b"hello").is_ok());
/// ```
pub fn validate_content_md5(content_md5: Option<&str>, body: &[u8]) -> S3ServiceResult<()> {
    let Some(expected_b64) = content_md5 else {
        return Ok(());
    };

    let expected = base64::engine::general_purpose::STANDARD
        .decode(expected_b64)
        .map_err(|_| S3ServiceError::InvalidDigest)?;
    if expected.len() != 16 {
        return Err(S3ServiceError::InvalidDigest);
    }

    if Md5::digest(body).as_slice() != expected.as_slice() {
        return Err(S3ServiceError::BadDigest);
    }
    Ok(())
}

/// Validate a storage class, returning the default `STANDARD` when absent.
pub fn validate_storage_class(storage_class: Option<&str>) -> S3ServiceResult<String> {
    match storage_class {
        None => Ok("STANDARD".to_owned()),
        Some(sc) if STORAGE_CLASSES.contains(&sc) => Ok(sc.to_owned()),
        Some(sc) => Err(S3ServiceError::InvalidStorageClass {
            storage_class: sc.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_accept_valid_bucket_names() {
        let long_name = "a".repeat(63);
        for name in ["my-bucket", "abc", "bucket.with.dots", "123bucket", long_name.as_str()] {
            assert!(validate_bucket_name(name).is_ok(), "expected valid: {name}");
        }
    }

    #[test]
    fn test_should_reject_invalid_bucket_names() {
        let too_long = "a".repeat(64);
        for name in [
            "ab",
            too_long.as_str(),
            "MyBucket",
            "-bucket",
            "bucket-",
            "my..bucket",
            "192.168.1.1",
            "xn--example",
            "sthree-bucket",
            "mybucket-s3alias",
            "under_score",
        ] {
            let err = validate_bucket_name(name);
            assert!(
                matches!(err, Err(S3ServiceError::InvalidBucketName { .. })),
                "expected InvalidBucketName for {name}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_should_accept_legacy_names_when_relaxed() {
        assert!(validate_bucket_name_relaxed("Legacy_Bucket").is_ok());
        assert!(validate_bucket_name_relaxed("a").is_ok());
        assert!(validate_bucket_name_relaxed("has space").is_err());
        assert!(validate_bucket_name_relaxed("").is_err());
    }

    #[test]
    fn test_should_validate_object_keys() {
        assert!(validate_object_key("a").is_ok());
        assert!(validate_object_key(&"k".repeat(1024)).is_ok());
        assert!(matches!(
            validate_object_key(&"k".repeat(1025)),
            Err(S3ServiceError::KeyTooLong)
        ));
        assert!(matches!(
            validate_object_key(""),
            Err(S3ServiceError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_should_enforce_tag_limits() {
        let fifty: Vec<_> = (0..50).map(|i| (format!("k{i}"), "v".to_owned())).collect();
        assert!(validate_tags(&fifty).is_ok());

        let fifty_one: Vec<_> = (0..51).map(|i| (format!("k{i}"), "v".to_owned())).collect();
        assert!(matches!(
            validate_tags(&fifty_one),
            Err(S3ServiceError::InvalidTag { .. })
        ));

        let long_key = vec![("k".repeat(129), String::new())];
        assert!(validate_tags(&long_key).is_err());

        let long_value = vec![("k".to_owned(), "v".repeat(257))];
        assert!(validate_tags(&long_value).is_err());

        let empty_key = vec![(String::new(), "v".to_owned())];
        assert!(validate_tags(&empty_key).is_err());
    }

    #[test]
    fn test_should_reject_duplicate_tag_keys() {
        let tags = vec![
            ("env".to_owned(), "a".to_owned()),
            ("env".to_owned(), "b".to_owned()),
        ];
        let err = validate_tags(&tags);
        assert!(
            matches!(&err, Err(S3ServiceError::InvalidTag { message }) if message.contains("same key")),
            "expected duplicate-key InvalidTag, got {err:?}"
        );
    }

    #[test]
    fn test_should_reject_oversized_metadata() {
        let mut meta = HashMap::new();
        meta.insert("big".to_owned(), "x".repeat(2046));
        assert!(matches!(
            validate_metadata(&meta),
            Err(S3ServiceError::MetadataTooLarge { size: 2049 })
        ));
    }

    #[test]
    fn test_should_check_content_md5() {
        assert!(matches!(
            validate_content_md5(Some("not base64!"), b"hello"),
            Err(S3ServiceError::InvalidDigest)
        ));
        // md5("") in base64
        assert!(matches!(
            validate_content_md5(Some("1B2M2Y8AsgTpgAmY7PhCfg=="), b"hello"),
            Err(S3ServiceError::BadDigest)
        ));
        assert!(validate_content_md5(Some("1B2M2Y8AsgTpgAmY7PhCfg=="), b"").is_ok());
    }

    #[test]
    fn test_should_validate_storage_class() {
        assert_eq!(
            validate_storage_class(None).unwrap_or_else(|e| panic!("{e}")),
            "STANDARD"
        );
        assert!(validate_storage_class(Some("GLACIER_IR")).is_ok());
        assert!(matches!(
            validate_storage_class(Some("COLD")),
            Err(S3ServiceError::InvalidStorageClass { .. })
        ));
    }
}
