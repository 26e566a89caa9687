//! Operation output types.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::acl::Owner;
use crate::error::S3ErrorCode;
use crate::state::ObjectMetadata;

/// S3 PutObjectOutput.
#[derive(Debug, Clone, Default)]
pub struct PutObjectOutput {
    /// HTTP header: `ETag`.
    pub etag: String,
    /// HTTP header: `x-amz-version-id`, omitted for `null` versions.
    pub version_id: Option<String>,
}

/// S3 HeadObjectOutput.
#[derive(Debug, Clone, Default)]
pub struct HeadObjectOutput {
    /// HTTP header: `Content-Length` (of the returned range, if any).
    pub content_length: u64,
    /// HTTP header: `Content-Range`.
    pub content_range: Option<String>,
    /// HTTP header: `ETag`.
    pub etag: String,
    /// HTTP header: `Last-Modified`.
    pub last_modified: DateTime<Utc>,
    /// HTTP header: `x-amz-version-id`, omitted for `null` versions.
    pub version_id: Option<String>,
    /// Content headers and `x-amz-meta-*` metadata.
    pub metadata: ObjectMetadata,
    /// HTTP header: `x-amz-storage-class`.
    pub storage_class: String,
    /// HTTP header: `x-amz-mp-parts-count`.
    pub parts_count: Option<u32>,
    /// HTTP header: `x-amz-tagging-count`.
    pub tag_count: usize,
}

/// S3 GetObjectOutput: the head fields plus the body.
#[derive(Debug, Clone, Default)]
pub struct GetObjectOutput {
    /// Response headers.
    pub head: HeadObjectOutput,
    /// Response body (the requested range, if any).
    pub body: Bytes,
}

/// S3 CopyObjectOutput.
#[derive(Debug, Clone, Default)]
pub struct CopyObjectOutput {
    /// Body: `CopyObjectResult.ETag`.
    pub etag: String,
    /// Body: `CopyObjectResult.LastModified`.
    pub last_modified: DateTime<Utc>,
    /// HTTP header: `x-amz-version-id` of the new object.
    pub version_id: Option<String>,
    /// HTTP header: `x-amz-copy-source-version-id`.
    pub copy_source_version_id: Option<String>,
}

/// S3 DeleteObjectOutput.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteObjectOutput {
    /// HTTP header: `x-amz-version-id`.
    pub version_id: Option<String>,
    /// HTTP header: `x-amz-delete-marker`.
    pub delete_marker: bool,
}

/// A successfully deleted key of a multi-object delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletedObject {
    /// Object key.
    pub key: String,
    /// The version that was requested for deletion.
    pub version_id: Option<String>,
    /// Whether a delete marker was created or removed.
    pub delete_marker: bool,
    /// Version ID of the delete marker involved.
    pub delete_marker_version_id: Option<String>,
}

/// A failed key of a multi-object delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteError {
    /// Object key.
    pub key: String,
    /// Version that was requested.
    pub version_id: Option<String>,
    /// Error code.
    pub code: S3ErrorCode,
    /// Error message.
    pub message: String,
}

/// S3 DeleteObjectsOutput.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectsOutput {
    /// Successful deletions (empty in quiet mode).
    pub deleted: Vec<DeletedObject>,
    /// Per-key failures.
    pub errors: Vec<DeleteError>,
}

/// A bucket entry of `ListBuckets`.
#[derive(Debug, Clone, Default)]
pub struct BucketSummary {
    /// Bucket name.
    pub name: String,
    /// Creation time.
    pub creation_date: DateTime<Utc>,
}

/// S3 ListBucketsOutput.
#[derive(Debug, Clone, Default)]
pub struct ListBucketsOutput {
    /// Owner of the listed buckets.
    pub owner: Owner,
    /// Buckets sorted by name.
    pub buckets: Vec<BucketSummary>,
}

/// An object entry of `ListObjects`.
#[derive(Debug, Clone, Default)]
pub struct ObjectSummary {
    /// Object key.
    pub key: String,
    /// Last-modified time.
    pub last_modified: DateTime<Utc>,
    /// ETag.
    pub etag: String,
    /// Size in bytes.
    pub size: u64,
    /// Storage class.
    pub storage_class: String,
    /// Object owner.
    pub owner: Owner,
}

/// S3 ListObjectsOutput.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsOutput {
    /// Bucket name.
    pub name: String,
    /// Prefix echoed back.
    pub prefix: String,
    /// Delimiter echoed back.
    pub delimiter: Option<String>,
    /// Marker echoed back.
    pub marker: String,
    /// Effective page size.
    pub max_keys: usize,
    /// Whether more results are available.
    pub is_truncated: bool,
    /// Marker for the next page.
    pub next_marker: Option<String>,
    /// Objects on this page.
    pub contents: Vec<ObjectSummary>,
    /// Common prefixes on this page.
    pub common_prefixes: Vec<String>,
}

/// An object version entry of `ListObjectVersions`.
#[derive(Debug, Clone, Default)]
pub struct ObjectVersionSummary {
    /// Object key.
    pub key: String,
    /// Version ID (`null` for unversioned entries).
    pub version_id: String,
    /// Whether this is the newest entry of its key.
    pub is_latest: bool,
    /// Last-modified time.
    pub last_modified: DateTime<Utc>,
    /// ETag.
    pub etag: String,
    /// Size in bytes.
    pub size: u64,
    /// Storage class.
    pub storage_class: String,
    /// Object owner.
    pub owner: Owner,
}

/// A delete marker entry of `ListObjectVersions`.
#[derive(Debug, Clone, Default)]
pub struct DeleteMarkerSummary {
    /// Object key.
    pub key: String,
    /// Version ID of the marker.
    pub version_id: String,
    /// Whether this is the newest entry of its key.
    pub is_latest: bool,
    /// Creation time of the marker.
    pub last_modified: DateTime<Utc>,
    /// Marker owner.
    pub owner: Owner,
}

/// S3 ListObjectVersionsOutput.
#[derive(Debug, Clone, Default)]
pub struct ListObjectVersionsOutput {
    /// Bucket name.
    pub name: String,
    /// Prefix echoed back.
    pub prefix: String,
    /// Key marker echoed back.
    pub key_marker: String,
    /// Version-id marker echoed back.
    pub version_id_marker: String,
    /// Effective page size.
    pub max_keys: usize,
    /// Whether more results are available.
    pub is_truncated: bool,
    /// Key marker for the next page.
    pub next_key_marker: Option<String>,
    /// Version-id marker for the next page.
    pub next_version_id_marker: Option<String>,
    /// Object versions on this page.
    pub versions: Vec<ObjectVersionSummary>,
    /// Delete markers on this page.
    pub delete_markers: Vec<DeleteMarkerSummary>,
    /// Common prefixes on this page.
    pub common_prefixes: Vec<String>,
}

/// An upload entry of `ListMultipartUploads`.
#[derive(Debug, Clone, Default)]
pub struct MultipartUploadSummary {
    /// Object key.
    pub key: String,
    /// Upload ID.
    pub upload_id: String,
    /// Initiation time.
    pub initiated: DateTime<Utc>,
    /// Initiator.
    pub owner: Owner,
    /// Storage class of the final object.
    pub storage_class: String,
}

/// S3 ListMultipartUploadsOutput.
#[derive(Debug, Clone, Default)]
pub struct ListMultipartUploadsOutput {
    /// Bucket name.
    pub bucket: String,
    /// Prefix echoed back.
    pub prefix: String,
    /// Key marker echoed back.
    pub key_marker: String,
    /// Upload-id marker echoed back.
    pub upload_id_marker: String,
    /// Effective page size.
    pub max_uploads: usize,
    /// Whether more results are available.
    pub is_truncated: bool,
    /// Key marker for the next page.
    pub next_key_marker: Option<String>,
    /// Upload-id marker for the next page.
    pub next_upload_id_marker: Option<String>,
    /// Uploads sorted by key, then initiation time.
    pub uploads: Vec<MultipartUploadSummary>,
}

/// A part entry of `ListParts`.
#[derive(Debug, Clone, Default)]
pub struct PartSummary {
    /// Part number.
    pub part_number: u32,
    /// Part ETag.
    pub etag: String,
    /// Part size in bytes.
    pub size: u64,
    /// Upload time.
    pub last_modified: DateTime<Utc>,
}

/// S3 ListPartsOutput.
#[derive(Debug, Clone, Default)]
pub struct ListPartsOutput {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Upload ID.
    pub upload_id: String,
    /// Part-number marker echoed back.
    pub part_number_marker: u32,
    /// Part-number marker for the next page.
    pub next_part_number_marker: Option<u32>,
    /// Effective page size.
    pub max_parts: usize,
    /// Whether more results are available.
    pub is_truncated: bool,
    /// Parts sorted by number.
    pub parts: Vec<PartSummary>,
    /// Initiator.
    pub owner: Owner,
    /// Storage class of the final object.
    pub storage_class: String,
}

/// S3 CreateMultipartUploadOutput.
#[derive(Debug, Clone, Default)]
pub struct InitiateMultipartUploadOutput {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// New upload ID.
    pub upload_id: String,
}

/// S3 UploadPartOutput.
#[derive(Debug, Clone, Default)]
pub struct UploadPartOutput {
    /// HTTP header: `ETag`.
    pub etag: String,
}

/// S3 UploadPartCopyOutput.
#[derive(Debug, Clone, Default)]
pub struct UploadPartCopyOutput {
    /// Body: `CopyPartResult.ETag`.
    pub etag: String,
    /// Body: `CopyPartResult.LastModified`.
    pub last_modified: DateTime<Utc>,
    /// HTTP header: `x-amz-copy-source-version-id`.
    pub copy_source_version_id: Option<String>,
}

/// S3 CompleteMultipartUploadOutput.
#[derive(Debug, Clone, Default)]
pub struct CompleteMultipartUploadOutput {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Composite ETag (`"md5-N"`).
    pub etag: String,
    /// HTTP header: `x-amz-version-id`, omitted for `null` versions.
    pub version_id: Option<String>,
}

/// S3 GetObjectTaggingOutput.
#[derive(Debug, Clone, Default)]
pub struct GetObjectTaggingOutput {
    /// HTTP header: `x-amz-version-id`.
    pub version_id: Option<String>,
    /// Body: `Tagging.TagSet`.
    pub tags: Vec<(String, String)>,
}
