//! Shared utilities for the S3 mock.
//!
//! ID generation, ETag computation, range-header parsing, conditional
//! request matching and copy-source parsing.

use awsmock_core::ids::random_bytes;
use base64::Engine;
use md5::{Digest, Md5};

use crate::error::{S3ServiceError, S3ServiceResult};

/// Version ID of objects stored while versioning is off or suspended.
pub const NULL_VERSION_ID: &str = "null";

// ---------------------------------------------------------------------------
// ID generation
// ---------------------------------------------------------------------------

/// Generate a random version ID for versioned objects and delete markers.
///
/// # Examples
///
/// ```
/// use awsmock_s3::utils::generate_version_id;
///
/// let id = generate_version_id();
/// assert_eq!(id.len(), 32);
/// assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
/// ```
#[must_use]
pub fn generate_version_id() -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes(24))
}

/// Generate a random upload ID for multipart uploads (64 hex characters).
///
/// # Examples
///
/// ```
/// use awsmock_s3::utils::generate_upload_id;
///
/// let id = generate_upload_id();
/// assert_eq!(id.len(), 64);
/// assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn generate_upload_id() -> String {
    hex::encode(random_bytes(32))
}

/// Deterministic 64-hex-character canonical user ID for an account.
#[must_use]
pub fn canonical_user_id(account: &str) -> String {
    let head = compute_md5(format!("canonical:{account}").as_bytes());
    let tail = compute_md5(account.as_bytes());
    format!("{head}{tail}")
}

// ---------------------------------------------------------------------------
// ETags
// ---------------------------------------------------------------------------

/// Hex-encoded MD5 digest of `data`.
#[must_use]
pub fn compute_md5(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

/// Quoted hex MD5 of `data`, as used for S3 ETags.
///
/// ```
/// use awsmock_s3::utils::compute_etag;
///
/// assert_eq!(compute_etag(b""), "\"d41d8cd98f00b204e9800998ecf8427e\"");
/// ```
#[must_use]
pub fn compute_etag(data: &[u8]) -> String {
    format!("\"{}\"", compute_md5(data))
}

/// Composite ETag of a completed multipart upload:
/// `"md5(concat(binary part md5s))-N"`.
#[must_use]
pub fn compute_multipart_etag(part_etags: &[impl AsRef<str>]) -> String {
    let mut combined = Vec::with_capacity(part_etags.len() * 16);
    for etag in part_etags {
        if let Ok(bytes) = hex::decode(normalize_etag(etag.as_ref())) {
            combined.extend_from_slice(&bytes);
        }
    }
    format!("\"{}-{}\"", compute_md5(&combined), part_etags.len())
}

/// Strip surrounding double quotes from an ETag.
#[must_use]
pub fn normalize_etag(etag: &str) -> &str {
    etag.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(etag)
}

// ---------------------------------------------------------------------------
// Range header parsing
// ---------------------------------------------------------------------------

/// Parse an HTTP `Range` header value into an inclusive byte range.
///
/// Supports `bytes=N-M`, `bytes=N-` and `bytes=-N`. An end beyond the content
/// is clamped.
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidRange`] if the header is malformed or
/// the range cannot be satisfied.
///
/// # Examples
///
/// ```
/// use awsmock_s3::utils::parse_range_header;
///
/// assert_eq!(parse_range_header("bytes=0-499", 1000).unwrap(), (0, 499));
/// assert_eq!(parse_range_header("bytes=-100", 1000).unwrap(), (900, 999));
/// ```
pub fn parse_range_header(range: &str, content_length: u64) -> S3ServiceResult<(u64, u64)> {
    let spec = range
        .strip_prefix("bytes=")
        .ok_or(S3ServiceError::InvalidRange)?;
    let (first, last) = spec.split_once('-').ok_or(S3ServiceError::InvalidRange)?;
    let num = |s: &str| s.trim().parse::<u64>().map_err(|_| S3ServiceError::InvalidRange);

    if content_length == 0 {
        return Err(S3ServiceError::InvalidRange);
    }
    let max = content_length - 1;

    match (first.is_empty(), last.is_empty()) {
        (true, true) => Err(S3ServiceError::InvalidRange),
        (true, false) => {
            let n = num(last)?;
            if n == 0 {
                return Err(S3ServiceError::InvalidRange);
            }
            Ok((content_length.saturating_sub(n), max))
        }
        (false, true) => {
            let start = num(first)?;
            if start > max {
                return Err(S3ServiceError::InvalidRange);
            }
            Ok((start, max))
        }
        (false, false) => {
            let (start, end) = (num(first)?, num(last)?);
            if start > end || start > max {
                return Err(S3ServiceError::InvalidRange);
            }
            Ok((start, end.min(max)))
        }
    }
}

// ---------------------------------------------------------------------------
// Conditional request helpers
// ---------------------------------------------------------------------------

/// Whether `etag` satisfies an `If-Match` condition (`*` matches anything).
///
/// ```
/// use awsmock_s3::utils::is_valid_if_match;
///
/// assert!(is_valid_if_match("\"abc\"", "*"));
/// assert!(is_valid_if_match("\"abc\"", "abc"));
/// assert!(!is_valid_if_match("\"abc\"", "\"xyz\""));
/// ```
#[must_use]
pub fn is_valid_if_match(etag: &str, if_match: &str) -> bool {
    if_match.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || normalize_etag(candidate) == normalize_etag(etag)
    })
}

/// Whether the object should be returned under an `If-None-Match`
/// condition; `false` means `304 Not Modified`.
#[must_use]
pub fn is_valid_if_none_match(etag: &str, if_none_match: &str) -> bool {
    !is_valid_if_match(etag, if_none_match)
}

// ---------------------------------------------------------------------------
// Copy source parsing
// ---------------------------------------------------------------------------

/// Source of a copy: bucket, key and optional version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySource {
    /// Source bucket.
    pub bucket: String,
    /// Source key, percent-decoded.
    pub key: String,
    /// Source version, if pinned.
    pub version_id: Option<String>,
}

/// Parse an `x-amz-copy-source` value: `[/]bucket/key[?versionId=...]`.
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidArgument`] if bucket or key is missing
/// or the key does not decode as UTF-8.
///
/// # Examples
///
/// ```
/// use awsmock_s3::utils::parse_copy_source;
///
/// let src = parse_copy_source("/my-bucket/dir/a%20b.txt?versionId=v1").unwrap();
/// assert_eq!(src.bucket, "my-bucket");
/// assert_eq!(src.key, "dir/a b.txt");
/// assert_eq!(src.version_id.as_deref(), Some("v1"));
/// ```
pub fn parse_copy_source(source: &str) -> S3ServiceResult<CopySource> {
    let source = source.strip_prefix('/').unwrap_or(source);

    let (path, version_id) = match source.split_once('?') {
        Some((p, query)) => (
            p,
            query
                .split('&')
                .find_map(|param| param.strip_prefix("versionId="))
                .map(String::from),
        ),
        None => (source, None),
    };

    let (bucket, key) = path
        .split_once('/')
        .filter(|(b, k)| !b.is_empty() && !k.is_empty())
        .ok_or_else(|| {
            S3ServiceError::invalid_argument("Copy Source must mention the source bucket and key: sourcebucket/sourcekey")
        })?;

    let key = percent_encoding::percent_decode_str(key)
        .decode_utf8()
        .map_err(|_| S3ServiceError::invalid_argument("Copy Source key is not valid UTF-8"))?
        .into_owned();

    Ok(CopySource {
        bucket: bucket.to_owned(),
        key,
        version_id,
    })
}
