//! S3 object types and metadata.
//!
//! A key's history is a list of [`ObjectVersion`]s, each either a stored
//! [`S3Object`] or an [`S3DeleteMarker`].

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::acl::{AccessControlPolicy, Owner};
use crate::utils::NULL_VERSION_ID;

// ---------------------------------------------------------------------------
// ObjectMetadata
// ---------------------------------------------------------------------------

/// Content headers and user metadata stored with an object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// The MIME type of the object.
    pub content_type: Option<String>,
    /// Content encoding (e.g. `gzip`).
    pub content_encoding: Option<String>,
    /// Content disposition (e.g. `attachment; filename="file.txt"`).
    pub content_disposition: Option<String>,
    /// Content language (e.g. `en-US`).
    pub content_language: Option<String>,
    /// Cache control directives (e.g. `max-age=3600`).
    pub cache_control: Option<String>,
    /// Expiration date/time string.
    pub expires: Option<String>,
    /// User-defined metadata (`x-amz-meta-*`), keys lowercased.
    pub user_metadata: HashMap<String, String>,
}

impl ObjectMetadata {
    /// Normalize user metadata keys the way S3 does (lowercase).
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.user_metadata = self
            .user_metadata
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        self
    }
}

// ---------------------------------------------------------------------------
// S3Object
// ---------------------------------------------------------------------------

/// A stored object version (not a delete marker).
#[derive(Debug, Clone)]
pub struct S3Object {
    /// The object key.
    pub key: String,
    /// The version ID (`"null"` for objects stored without versioning).
    pub version_id: String,
    /// Object data.
    pub body: Bytes,
    /// The entity tag (quoted hex MD5, or the multipart composite).
    pub etag: String,
    /// The time this version was last modified.
    pub last_modified: DateTime<Utc>,
    /// The storage class (default `STANDARD`).
    pub storage_class: String,
    /// Content headers and user metadata.
    pub metadata: ObjectMetadata,
    /// The owner of this object.
    pub owner: Owner,
    /// Object ACL.
    pub acl: AccessControlPolicy,
    /// Object tags.
    pub tags: Vec<(String, String)>,
    /// Number of parts when created by a multipart upload.
    pub parts_count: Option<u32>,
}

impl S3Object {
    /// Object size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.body.len() as u64
    }
}

// ---------------------------------------------------------------------------
// S3DeleteMarker
// ---------------------------------------------------------------------------

/// A delete marker in a versioned (or suspended) bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3DeleteMarker {
    /// The object key.
    pub key: String,
    /// The version ID of this delete marker.
    pub version_id: String,
    /// The time this delete marker was created.
    pub last_modified: DateTime<Utc>,
    /// The owner of this delete marker.
    pub owner: Owner,
}

// ---------------------------------------------------------------------------
// ObjectVersion
// ---------------------------------------------------------------------------

/// One entry of a key's history.
#[derive(Debug, Clone)]
pub enum ObjectVersion {
    /// A real object version (boxed to reduce enum size).
    Object(Box<S3Object>),
    /// A delete-marker version.
    DeleteMarker(S3DeleteMarker),
}

impl ObjectVersion {
    /// Returns the object key.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Object(obj) => &obj.key,
            Self::DeleteMarker(dm) => &dm.key,
        }
    }

    /// Returns the version ID.
    #[must_use]
    pub fn version_id(&self) -> &str {
        match self {
            Self::Object(obj) => &obj.version_id,
            Self::DeleteMarker(dm) => &dm.version_id,
        }
    }

    /// Whether this entry carries the `null` version ID.
    #[must_use]
    pub fn is_null_version(&self) -> bool {
        self.version_id() == NULL_VERSION_ID
    }

    /// Returns the last-modified timestamp.
    #[must_use]
    pub fn last_modified(&self) -> DateTime<Utc> {
        match self {
            Self::Object(obj) => obj.last_modified,
            Self::DeleteMarker(dm) => dm.last_modified,
        }
    }

    /// Returns `true` if this version is a delete marker.
    #[must_use]
    pub fn is_delete_marker(&self) -> bool {
        matches!(self, Self::DeleteMarker(_))
    }

    /// Returns the owner of this version.
    #[must_use]
    pub fn owner(&self) -> &Owner {
        match self {
            Self::Object(obj) => &obj.owner,
            Self::DeleteMarker(dm) => &dm.owner,
        }
    }

    /// Returns the inner object, if this is an object version.
    #[must_use]
    pub fn as_object(&self) -> Option<&S3Object> {
        match self {
            Self::Object(obj) => Some(obj),
            Self::DeleteMarker(_) => None,
        }
    }

    /// Returns the inner object mutably, if this is an object version.
    pub fn as_object_mut(&mut self) -> Option<&mut S3Object> {
        match self {
            Self::Object(obj) => Some(obj),
            Self::DeleteMarker(_) => None,
        }
    }
}
