//! Multipart upload state.
//!
//! Each [`MultipartUpload`] captures the options given at initiation time
//! and accumulates [`UploadPart`] entries as they are uploaded. The options
//! are applied to the final object on completion.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::object::ObjectMetadata;
use crate::acl::{AccessControlPolicy, Owner};

/// An in-progress multipart upload.
#[derive(Debug, Clone)]
pub struct MultipartUpload {
    /// Unique identifier for this upload.
    pub upload_id: String,
    /// The object key that this upload will create.
    pub key: String,
    /// When the upload was initiated.
    pub initiated: DateTime<Utc>,
    /// The owner who initiated the upload.
    pub owner: Owner,
    /// Content headers and user metadata for the final object.
    pub metadata: ObjectMetadata,
    /// ACL for the final object.
    pub acl: AccessControlPolicy,
    /// Tags for the final object.
    pub tags: Vec<(String, String)>,
    /// Storage class for the final object.
    pub storage_class: String,
    /// Parts uploaded so far, keyed by part number.
    pub parts: BTreeMap<u32, UploadPart>,
}

impl MultipartUpload {
    /// Insert or replace a part.
    pub fn put_part(&mut self, part: UploadPart) {
        self.parts.insert(part.part_number, part);
    }

    /// Get a part by its number.
    #[must_use]
    pub fn get_part(&self, part_number: u32) -> Option<&UploadPart> {
        self.parts.get(&part_number)
    }

    /// Total size of all uploaded parts.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.parts.values().map(UploadPart::size).sum()
    }
}

/// A single part within a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadPart {
    /// The part number (1-based, up to 10 000).
    pub part_number: u32,
    /// Quoted hex MD5 of the part body.
    pub etag: String,
    /// Part data.
    pub body: Bytes,
    /// When this part was uploaded.
    pub last_modified: DateTime<Utc>,
}

impl UploadPart {
    /// Part size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.body.len() as u64
    }
}
