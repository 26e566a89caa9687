//! Operation input types.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::MetadataDirective;
use crate::acl::AclInput;
use crate::state::ObjectMetadata;

/// S3 CreateBucketInput.
#[derive(Debug, Clone, Default)]
pub struct CreateBucketInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// Body: `CreateBucketConfiguration.LocationConstraint`.
    pub location_constraint: Option<String>,
    /// HTTP header: `x-amz-acl`, or a full policy.
    pub acl: Option<AclInput>,
}

/// S3 PutObjectInput.
#[derive(Debug, Clone, Default)]
pub struct PutObjectInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// Request body.
    pub body: Bytes,
    /// HTTP header: `Content-MD5`.
    pub content_md5: Option<String>,
    /// Content headers and `x-amz-meta-*` metadata.
    pub metadata: ObjectMetadata,
    /// HTTP header: `x-amz-storage-class`.
    pub storage_class: Option<String>,
    /// HTTP header: `x-amz-acl`, or a full policy.
    pub acl: Option<AclInput>,
    /// HTTP header: `x-amz-tagging`, decoded.
    pub tagging: Vec<(String, String)>,
}

/// S3 GetObjectInput.
#[derive(Debug, Clone, Default)]
pub struct GetObjectInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `versionId`.
    pub version_id: Option<String>,
    /// HTTP header: `Range`.
    pub range: Option<String>,
    /// HTTP header: `If-Match`.
    pub if_match: Option<String>,
    /// HTTP header: `If-None-Match`.
    pub if_none_match: Option<String>,
    /// HTTP header: `If-Modified-Since`.
    pub if_modified_since: Option<DateTime<Utc>>,
    /// HTTP header: `If-Unmodified-Since`.
    pub if_unmodified_since: Option<DateTime<Utc>>,
}

/// S3 HeadObjectInput; the same request shape as `GetObject`.
pub type HeadObjectInput = GetObjectInput;

/// S3 CopyObjectInput.
#[derive(Debug, Clone, Default)]
pub struct CopyObjectInput {
    /// Destination bucket.
    pub bucket: String,
    /// Destination key.
    pub key: String,
    /// HTTP header: `x-amz-copy-source`.
    pub copy_source: String,
    /// HTTP header: `x-amz-metadata-directive`.
    pub metadata_directive: MetadataDirective,
    /// Replacement content headers and metadata (used with `REPLACE`).
    pub metadata: ObjectMetadata,
    /// HTTP header: `x-amz-storage-class`.
    pub storage_class: Option<String>,
    /// HTTP header: `x-amz-acl`, or a full policy.
    pub acl: Option<AclInput>,
    /// HTTP header: `x-amz-copy-source-if-match`.
    pub copy_source_if_match: Option<String>,
    /// HTTP header: `x-amz-copy-source-if-none-match`.
    pub copy_source_if_none_match: Option<String>,
}

/// One key (and optional version) of a multi-object delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectIdentifier {
    /// Object key.
    pub key: String,
    /// Version to delete.
    pub version_id: Option<String>,
}

/// S3 DeleteObjectsInput.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectsInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// Body: `Delete.Object`.
    pub objects: Vec<ObjectIdentifier>,
    /// Body: `Delete.Quiet`.
    pub quiet: bool,
}

/// S3 ListObjectsInput.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP query: `prefix`.
    pub prefix: Option<String>,
    /// HTTP query: `delimiter`.
    pub delimiter: Option<String>,
    /// HTTP query: `marker`.
    pub marker: Option<String>,
    /// HTTP query: `max-keys`.
    pub max_keys: Option<usize>,
}

/// S3 ListObjectVersionsInput.
#[derive(Debug, Clone, Default)]
pub struct ListObjectVersionsInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP query: `prefix`.
    pub prefix: Option<String>,
    /// HTTP query: `delimiter`.
    pub delimiter: Option<String>,
    /// HTTP query: `key-marker`.
    pub key_marker: Option<String>,
    /// HTTP query: `version-id-marker`.
    pub version_id_marker: Option<String>,
    /// HTTP query: `max-keys`.
    pub max_keys: Option<usize>,
}

/// S3 ListMultipartUploadsInput.
#[derive(Debug, Clone, Default)]
pub struct ListMultipartUploadsInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP query: `prefix`.
    pub prefix: Option<String>,
    /// HTTP query: `key-marker`.
    pub key_marker: Option<String>,
    /// HTTP query: `upload-id-marker`.
    pub upload_id_marker: Option<String>,
    /// HTTP query: `max-uploads`.
    pub max_uploads: Option<usize>,
}

/// S3 ListPartsInput.
#[derive(Debug, Clone, Default)]
pub struct ListPartsInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `uploadId`.
    pub upload_id: String,
    /// HTTP query: `part-number-marker`.
    pub part_number_marker: Option<u32>,
    /// HTTP query: `max-parts`.
    pub max_parts: Option<usize>,
}

/// S3 CreateMultipartUploadInput.
#[derive(Debug, Clone, Default)]
pub struct InitiateMultipartUploadInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// Content headers and metadata for the final object.
    pub metadata: ObjectMetadata,
    /// HTTP header: `x-amz-storage-class`.
    pub storage_class: Option<String>,
    /// HTTP header: `x-amz-acl`, or a full policy.
    pub acl: Option<AclInput>,
    /// HTTP header: `x-amz-tagging`, decoded.
    pub tagging: Vec<(String, String)>,
}

/// S3 UploadPartInput.
#[derive(Debug, Clone, Default)]
pub struct UploadPartInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `uploadId`.
    pub upload_id: String,
    /// HTTP query: `partNumber`.
    pub part_number: u32,
    /// Request body.
    pub body: Bytes,
    /// HTTP header: `Content-MD5`.
    pub content_md5: Option<String>,
}

/// S3 UploadPartCopyInput.
#[derive(Debug, Clone, Default)]
pub struct UploadPartCopyInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `uploadId`.
    pub upload_id: String,
    /// HTTP query: `partNumber`.
    pub part_number: u32,
    /// HTTP header: `x-amz-copy-source`.
    pub copy_source: String,
    /// HTTP header: `x-amz-copy-source-range`.
    pub copy_source_range: Option<String>,
}

/// A part listed in `CompleteMultipartUpload`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedPart {
    /// Part number.
    pub part_number: u32,
    /// ETag returned by `UploadPart` (quotes optional).
    pub etag: String,
}

/// S3 CompleteMultipartUploadInput.
#[derive(Debug, Clone, Default)]
pub struct CompleteMultipartUploadInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `uploadId`.
    pub upload_id: String,
    /// Body: `CompleteMultipartUpload.Part`.
    pub parts: Vec<CompletedPart>,
}
