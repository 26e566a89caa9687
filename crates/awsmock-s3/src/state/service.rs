//! Top-level S3 service state.
//!
//! [`S3ServiceState`] manages the buckets of one account/region scope.
//! Bucket names are globally unique, so every scope created by the same
//! registry shares one name-to-owner index.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};

use super::bucket::S3Bucket;
use crate::acl::{AccessControlPolicy, Owner};
use crate::error::{S3ServiceError, S3ServiceResult};

/// Bucket name to owner canonical ID, shared across scopes.
pub type GlobalBucketIndex = Arc<DashMap<String, String>>;

/// S3 state for one scope: its buckets plus the shared name index.
pub struct S3ServiceState {
    buckets: DashMap<String, Arc<S3Bucket>>,
    global_bucket_owner: GlobalBucketIndex,
}

impl std::fmt::Debug for S3ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ServiceState")
            .field("bucket_count", &self.buckets.len())
            .finish_non_exhaustive()
    }
}

impl Default for S3ServiceState {
    fn default() -> Self {
        Self::new(GlobalBucketIndex::default())
    }
}

impl S3ServiceState {
    /// Create an empty state that registers names in `global_bucket_owner`.
    #[must_use]
    pub fn new(global_bucket_owner: GlobalBucketIndex) -> Self {
        Self {
            buckets: DashMap::new(),
            global_bucket_owner,
        }
    }

    /// Create a new bucket.
    ///
    /// # Errors
    ///
    /// - [`S3ServiceError::BucketAlreadyOwnedByYou`] if `owner` already owns
    ///   a bucket with this name, in any region.
    /// - [`S3ServiceError::BucketAlreadyExists`] if another owner has it.
    pub fn create_bucket(
        &self,
        name: &str,
        region: &str,
        owner: Owner,
        acl: AccessControlPolicy,
    ) -> S3ServiceResult<Arc<S3Bucket>> {
        match self.global_bucket_owner.entry(name.to_owned()) {
            Entry::Occupied(existing) if *existing.get() == owner.id => {
                return Err(S3ServiceError::BucketAlreadyOwnedByYou {
                    bucket: name.to_owned(),
                });
            }
            Entry::Occupied(_) => {
                return Err(S3ServiceError::BucketAlreadyExists {
                    bucket: name.to_owned(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(owner.id.clone());
            }
        }

        let bucket = Arc::new(S3Bucket::new(
            name.to_owned(),
            region.to_owned(),
            owner,
            acl,
        ));
        self.buckets.insert(name.to_owned(), Arc::clone(&bucket));
        info!(bucket = %name, region, "bucket created");
        Ok(bucket)
    }

    /// Delete an empty bucket.
    ///
    /// # Errors
    ///
    /// - [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    /// - [`S3ServiceError::BucketNotEmpty`] if it still holds versions,
    ///   delete markers or multipart uploads.
    pub fn delete_bucket(&self, name: &str) -> S3ServiceResult<()> {
        let bucket = self.get_bucket(name)?;
        // Held until the bucket is unregistered.
        let objects = bucket.objects.write();
        if !objects.is_empty() || !bucket.multipart_uploads.is_empty() {
            return Err(S3ServiceError::BucketNotEmpty {
                bucket: name.to_owned(),
            });
        }

        self.buckets.remove(name);
        self.global_bucket_owner
            .remove_if(name, |_, owner| *owner == bucket.owner.id);
        drop(objects);
        info!(bucket = %name, "bucket deleted");
        Ok(())
    }

    /// Get a bucket by name.
    ///
    /// # Errors
    ///
    /// Returns [`S3ServiceError::NoSuchBucket`] if the bucket does not exist
    /// in this scope.
    pub fn get_bucket(&self, name: &str) -> S3ServiceResult<Arc<S3Bucket>> {
        self.buckets
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| S3ServiceError::NoSuchBucket {
                bucket: name.to_owned(),
            })
    }

    /// All buckets of this scope, sorted by name.
    #[must_use]
    pub fn list_buckets(&self) -> Vec<Arc<S3Bucket>> {
        let mut buckets: Vec<_> = self
            .buckets
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        buckets.sort_by(|a, b| a.name.cmp(&b.name));
        buckets
    }

    /// Check whether a bucket exists in this scope.
    #[must_use]
    pub fn bucket_exists(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    /// Drop every bucket of this scope and release their names.
    pub fn reset(&self) {
        debug!(buckets = self.buckets.len(), "resetting S3 service state");
        for entry in &self.buckets {
            let owner_id = &entry.value().owner.id;
            self.global_bucket_owner
                .remove_if(entry.key(), |_, owner| owner == owner_id);
        }
        self.buckets.clear();
    }
}
