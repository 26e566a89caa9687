//! Bucket CRUD operation handlers.
//!
//! Implements `create_bucket`, `delete_bucket`, `head_bucket`,
//! `get_bucket_location` and `list_buckets`.

use tracing::debug;

use crate::acl::AccessControlPolicy;
use crate::error::S3ServiceResult;
use crate::model::{BucketSummary, CreateBucketInput, ListBucketsOutput};
use crate::provider::MockS3;
use crate::validation::{validate_bucket_name, validate_bucket_name_relaxed};

impl MockS3 {
    /// Create a bucket and return its location (`/name`).
    ///
    /// # Errors
    ///
    /// `InvalidBucketName`, `BucketAlreadyOwnedByYou`, `BucketAlreadyExists`,
    /// or an ACL error.
    pub fn create_bucket(&self, input: CreateBucketInput) -> S3ServiceResult<String> {
        let name = input.bucket;
        if self.config.strict_bucket_names {
            validate_bucket_name(&name)?;
        } else {
            validate_bucket_name_relaxed(&name)?;
        }

        let acl = match &input.acl {
            Some(acl) => acl.resolve(&self.owner, &self.owner)?,
            None => AccessControlPolicy::private(&self.owner),
        };

        let region = input
            .location_constraint
            .filter(|lc| !lc.is_empty())
            .unwrap_or_else(|| self.region.clone());

        self.state
            .create_bucket(&name, &region, self.owner.clone(), acl)?;
        debug!(bucket = %name, "create_bucket completed");
        Ok(format!("/{name}"))
    }

    /// Delete an empty bucket.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `BucketNotEmpty`.
    pub fn delete_bucket(&self, bucket: &str) -> S3ServiceResult<()> {
        self.state.delete_bucket(bucket)?;
        debug!(bucket, "delete_bucket completed");
        Ok(())
    }

    /// Check that a bucket exists, returning its region.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn head_bucket(&self, bucket: &str) -> S3ServiceResult<String> {
        Ok(self.state.get_bucket(bucket)?.region.clone())
    }

    /// Location constraint of a bucket; `None` for `us-east-1`.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn get_bucket_location(&self, bucket: &str) -> S3ServiceResult<Option<String>> {
        let region = self.head_bucket(bucket)?;
        Ok((region != "us-east-1").then_some(region))
    }

    /// All buckets of this scope, sorted by name.
    #[must_use]
    pub fn list_buckets(&self) -> ListBucketsOutput {
        let buckets = self
            .state
            .list_buckets()
            .iter()
            .map(|b| BucketSummary {
                name: b.name.clone(),
                creation_date: b.creation_date,
            })
            .collect();
        ListBucketsOutput {
            owner: self.owner.clone(),
            buckets,
        }
    }
}
