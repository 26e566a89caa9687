//! Object ACL and tagging handlers.

use super::object::{find_object, find_object_mut, reported_version};
use crate::acl::{AccessControlPolicy, AclInput};
use crate::error::S3ServiceResult;
use crate::model::GetObjectTaggingOutput;
use crate::provider::MockS3;
use crate::validation::validate_tags;

impl MockS3 {
    /// Replace the ACL of an object version (the current one by default).
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, `NoSuchKey`, `NoSuchVersion`, `MethodNotAllowed`, or
    /// ACL errors.
    pub fn put_object_acl(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
        acl: &AclInput,
    ) -> S3ServiceResult<()> {
        let b = self.state.get_bucket(bucket)?;
        let mut store = b.objects.write();
        let object = find_object_mut(&mut store, key, version_id)?;
        object.acl = acl.resolve(&object.owner, &b.owner)?;
        Ok(())
    }

    /// The ACL of an object version.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, `NoSuchKey`, `NoSuchVersion`, or `MethodNotAllowed`.
    pub fn get_object_acl(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> S3ServiceResult<AccessControlPolicy> {
        let b = self.state.get_bucket(bucket)?;
        let store = b.objects.read();
        Ok(find_object(&store, key, version_id)?.acl.clone())
    }

    /// Replace the tag set of an object version, returning its version ID.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, `NoSuchKey`, `NoSuchVersion`, `MethodNotAllowed`, or
    /// `InvalidTag`.
    pub fn put_object_tagging(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
        tags: Vec<(String, String)>,
    ) -> S3ServiceResult<Option<String>> {
        validate_tags(&tags)?;
        let b = self.state.get_bucket(bucket)?;
        let mut store = b.objects.write();
        let object = find_object_mut(&mut store, key, version_id)?;
        object.tags = tags;
        Ok(reported_version(&object.version_id))
    }

    /// The tag set of an object version.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, `NoSuchKey`, `NoSuchVersion`, or `MethodNotAllowed`.
    pub fn get_object_tagging(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> S3ServiceResult<GetObjectTaggingOutput> {
        let b = self.state.get_bucket(bucket)?;
        let store = b.objects.read();
        let object = find_object(&store, key, version_id)?;
        Ok(GetObjectTaggingOutput {
            version_id: reported_version(&object.version_id),
            tags: object.tags.clone(),
        })
    }

    /// Remove every tag of an object version, returning its version ID.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, `NoSuchKey`, `NoSuchVersion`, or `MethodNotAllowed`.
    pub fn delete_object_tagging(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> S3ServiceResult<Option<String>> {
        let b = self.state.get_bucket(bucket)?;
        let mut store = b.objects.write();
        let object = find_object_mut(&mut store, key, version_id)?;
        object.tags.clear();
        Ok(reported_version(&object.version_id))
    }
}
