//! S3 bucket data structure.
//!
//! An [`S3Bucket`] holds all per-bucket state: objects, multipart uploads,
//! versioning status, and the optional configurations (policy, tags, ACL,
//! notification, CORS, lifecycle, website, logging, request payment).
//!
//! Interior mutability is achieved through `parking_lot::RwLock` for
//! single-valued configuration fields and for the object store, and
//! `DashMap` for the multipart upload table.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::keystore::ObjectStore;
use super::multipart::MultipartUpload;
use crate::acl::{AccessControlPolicy, Owner};

/// Bucket versioning status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersioningStatus {
    /// Versioning has never been configured on this bucket.
    #[default]
    Disabled,
    /// Versioning is currently enabled.
    Enabled,
    /// Versioning was configured but is now suspended.
    Suspended,
}

impl VersioningStatus {
    /// The wire name, `None` for a bucket that was never versioned.
    #[must_use]
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            Self::Disabled => None,
            Self::Enabled => Some("Enabled"),
            Self::Suspended => Some("Suspended"),
        }
    }
}

/// Who pays for requests against a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestPayer {
    /// The bucket owner pays (default).
    #[default]
    BucketOwner,
    /// The requester pays.
    Requester,
}

impl RequestPayer {
    /// The wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BucketOwner => "BucketOwner",
            Self::Requester => "Requester",
        }
    }
}

// ---------------------------------------------------------------------------
// S3Bucket
// ---------------------------------------------------------------------------

/// An S3 bucket with all its state and configuration.
pub struct S3Bucket {
    /// Bucket name.
    pub name: String,
    /// AWS region where this bucket was created.
    pub region: String,
    /// When the bucket was created.
    pub creation_date: DateTime<Utc>,
    /// The bucket owner.
    pub owner: Owner,

    /// Object key storage.
    pub objects: RwLock<ObjectStore>,
    /// In-progress multipart uploads, keyed by upload ID.
    pub multipart_uploads: DashMap<String, MultipartUpload>,
    /// Bucket versioning status.
    pub versioning: RwLock<VersioningStatus>,

    /// Bucket policy (JSON text).
    pub policy: RwLock<Option<String>>,
    /// Bucket tags; `None` until a tag set is put.
    pub tags: RwLock<Option<Vec<(String, String)>>>,
    /// Bucket ACL.
    pub acl: RwLock<AccessControlPolicy>,
    /// Request payment configuration.
    pub request_payment: RwLock<RequestPayer>,
    /// Notification configuration (opaque JSON).
    pub notification: RwLock<Option<serde_json::Value>>,
    /// CORS configuration (opaque JSON).
    pub cors: RwLock<Option<serde_json::Value>>,
    /// Lifecycle configuration (opaque JSON).
    pub lifecycle: RwLock<Option<serde_json::Value>>,
    /// Static website hosting configuration (opaque JSON).
    pub website: RwLock<Option<serde_json::Value>>,
    /// Logging configuration (opaque JSON).
    pub logging: RwLock<Option<serde_json::Value>>,
}

impl std::fmt::Debug for S3Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Bucket")
            .field("name", &self.name)
            .field("region", &self.region)
            .field("creation_date", &self.creation_date)
            .field("owner", &self.owner)
            .field("versioning", &*self.versioning.read())
            .finish_non_exhaustive()
    }
}

impl S3Bucket {
    /// Create a new bucket with the given ACL; every other configuration is
    /// unset.
    #[must_use]
    pub fn new(name: String, region: String, owner: Owner, acl: AccessControlPolicy) -> Self {
        Self {
            name,
            region,
            creation_date: Utc::now(),
            owner,
            objects: RwLock::new(ObjectStore::default()),
            multipart_uploads: DashMap::new(),
            versioning: RwLock::new(VersioningStatus::default()),
            policy: RwLock::new(None),
            tags: RwLock::new(None),
            acl: RwLock::new(acl),
            request_payment: RwLock::new(RequestPayer::default()),
            notification: RwLock::new(None),
            cors: RwLock::new(None),
            lifecycle: RwLock::new(None),
            website: RwLock::new(None),
            logging: RwLock::new(None),
        }
    }

    /// Whether the bucket holds no versions, markers or multipart uploads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty() && self.multipart_uploads.is_empty()
    }

    /// Current versioning status.
    #[must_use]
    pub fn versioning_status(&self) -> VersioningStatus {
        *self.versioning.read()
    }

    /// Set the versioning status. A configured bucket never goes back to
    /// `Disabled`, so that value is ignored.
    pub fn set_versioning(&self, status: VersioningStatus) {
        if status == VersioningStatus::Disabled {
            return;
        }
        let mut current = self.versioning.write();
        if *current != status {
            debug!(bucket = %self.name, from = ?*current, to = ?status, "changing versioning");
            *current = status;
        }
    }
}
