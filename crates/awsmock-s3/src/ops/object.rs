//! Object CRUD operation handlers.
//!
//! Implements `put_object`, `get_object`, `head_object`, `delete_object`,
//! `delete_multiple_objects`, and `copy_object`.

use chrono::Utc;
use tracing::debug;

use crate::acl::{AccessControlPolicy, AclInput, Owner};
use crate::error::{S3ServiceError, S3ServiceResult};
use crate::model::{
    CopyObjectInput, CopyObjectOutput, DeleteError, DeleteObjectOutput, DeleteObjectsInput,
    DeleteObjectsOutput, DeletedObject, GetObjectInput, GetObjectOutput, HeadObjectInput,
    HeadObjectOutput, MetadataDirective, PutObjectInput, PutObjectOutput,
};
use crate::provider::MockS3;
use crate::state::{ObjectStore, ObjectVersion, S3Object};
use crate::utils::{
    NULL_VERSION_ID, compute_etag, is_valid_if_match, is_valid_if_none_match, parse_copy_source,
    parse_range_header,
};
use crate::validation::{
    validate_content_md5, validate_metadata, validate_object_key, validate_storage_class,
    validate_tags,
};

/// Most keys accepted by one `DeleteObjects` request.
pub const MAX_DELETE_OBJECTS: usize = 1000;

/// Version ID as reported to callers: `null` versions are not reported.
pub(super) fn reported_version(version_id: &str) -> Option<String> {
    (version_id != NULL_VERSION_ID).then(|| version_id.to_owned())
}

/// Resolve an optional request ACL, defaulting to `private`.
pub(super) fn resolve_acl(
    acl: Option<&AclInput>,
    owner: &Owner,
    bucket_owner: &Owner,
) -> S3ServiceResult<AccessControlPolicy> {
    match acl {
        Some(acl) => acl.resolve(owner, bucket_owner),
        None => Ok(AccessControlPolicy::private(owner)),
    }
}

/// Locate the object a read refers to: a pinned version or the current one.
pub(super) fn find_object<'a>(
    store: &'a ObjectStore,
    key: &str,
    version_id: Option<&str>,
) -> S3ServiceResult<&'a S3Object> {
    match version_id {
        Some(vid) => match store.version(key, vid) {
            None => Err(S3ServiceError::NoSuchVersion {
                key: key.to_owned(),
                version_id: vid.to_owned(),
            }),
            Some(ObjectVersion::DeleteMarker(_)) => Err(S3ServiceError::MethodNotAllowed),
            Some(ObjectVersion::Object(object)) => Ok(object),
        },
        None => store.current(key).ok_or_else(|| S3ServiceError::NoSuchKey {
            key: key.to_owned(),
        }),
    }
}

/// Mutable counterpart of [`find_object`].
pub(super) fn find_object_mut<'a>(
    store: &'a mut ObjectStore,
    key: &str,
    version_id: Option<&str>,
) -> S3ServiceResult<&'a mut S3Object> {
    match version_id {
        Some(vid) => match store.version_mut(key, vid) {
            None => Err(S3ServiceError::NoSuchVersion {
                key: key.to_owned(),
                version_id: vid.to_owned(),
            }),
            Some(ObjectVersion::DeleteMarker(_)) => Err(S3ServiceError::MethodNotAllowed),
            Some(ObjectVersion::Object(object)) => Ok(object),
        },
        None => store.current_mut(key).ok_or_else(|| S3ServiceError::NoSuchKey {
            key: key.to_owned(),
        }),
    }
}

/// Evaluate conditional headers. Timestamps compare at second precision.
///
/// `If-Match` takes precedence over `If-Unmodified-Since`, and
/// `If-None-Match` over `If-Modified-Since`.
fn check_conditions(object: &S3Object, input: &GetObjectInput) -> S3ServiceResult<()> {
    let modified = object.last_modified.timestamp();

    if let Some(if_match) = &input.if_match {
        if !is_valid_if_match(&object.etag, if_match) {
            return Err(S3ServiceError::PreconditionFailed);
        }
    } else if let Some(since) = input.if_unmodified_since {
        if modified > since.timestamp() {
            return Err(S3ServiceError::PreconditionFailed);
        }
    }

    if let Some(if_none_match) = &input.if_none_match {
        if !is_valid_if_none_match(&object.etag, if_none_match) {
            return Err(S3ServiceError::NotModified);
        }
    } else if let Some(since) = input.if_modified_since {
        if modified <= since.timestamp() {
            return Err(S3ServiceError::NotModified);
        }
    }

    Ok(())
}

fn head_of(object: &S3Object, content_length: u64, content_range: Option<String>) -> HeadObjectOutput {
    HeadObjectOutput {
        content_length,
        content_range,
        etag: object.etag.clone(),
        last_modified: object.last_modified,
        version_id: reported_version(&object.version_id),
        metadata: object.metadata.clone(),
        storage_class: object.storage_class.clone(),
        parts_count: object.parts_count,
        tag_count: object.tags.len(),
    }
}

fn to_index(offset: u64) -> S3ServiceResult<usize> {
    usize::try_from(offset).map_err(|_| S3ServiceError::InvalidRange)
}

impl MockS3 {
    /// Store an object.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, key/digest/metadata/storage-class/tag validation
    /// errors, or ACL errors.
    pub fn put_object(&self, input: PutObjectInput) -> S3ServiceResult<PutObjectOutput> {
        let bucket = self.state.get_bucket(&input.bucket)?;
        validate_object_key(&input.key)?;
        if self.config.validate_content_md5 {
            validate_content_md5(input.content_md5.as_deref(), &input.body)?;
        }
        let metadata = input.metadata.normalized();
        validate_metadata(&metadata.user_metadata)?;
        validate_tags(&input.tagging)?;
        let storage_class = validate_storage_class(input.storage_class.as_deref())?;
        let acl = resolve_acl(input.acl.as_ref(), &self.owner, &bucket.owner)?;

        let etag = compute_etag(&input.body);
        let object = S3Object {
            key: input.key,
            version_id: String::new(),
            body: input.body,
            etag: etag.clone(),
            last_modified: Utc::now(),
            storage_class,
            metadata,
            owner: self.owner.clone(),
            acl,
            tags: input.tagging,
            parts_count: None,
        };

        let mut store = bucket.objects.write();
        let version_id = store.put(object, bucket.versioning_status());
        debug!(bucket = %bucket.name, %etag, "put_object completed");

        Ok(PutObjectOutput {
            etag,
            version_id: reported_version(&version_id),
        })
    }

    /// Retrieve an object (or a byte range of it).
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, `NoSuchKey`, `NoSuchVersion`, `MethodNotAllowed` for a
    /// delete-marker version, `InvalidRange`, `PreconditionFailed`, or
    /// `NotModified`.
    pub fn get_object(&self, input: GetObjectInput) -> S3ServiceResult<GetObjectOutput> {
        let bucket = self.state.get_bucket(&input.bucket)?;
        let object = {
            let store = bucket.objects.read();
            find_object(&store, &input.key, input.version_id.as_deref())?.clone()
        };
        check_conditions(&object, &input)?;

        let size = object.size();
        let (body, content_range) = match &input.range {
            Some(range) => {
                let (start, end) = parse_range_header(range, size)?;
                let body = object.body.slice(to_index(start)?..=to_index(end)?);
                (body, Some(format!("bytes {start}-{end}/{size}")))
            }
            None => (object.body.clone(), None),
        };

        Ok(GetObjectOutput {
            head: head_of(&object, body.len() as u64, content_range),
            body,
        })
    }

    /// Object headers without the body.
    ///
    /// # Errors
    ///
    /// Same as [`MockS3::get_object`].
    pub fn head_object(&self, input: HeadObjectInput) -> S3ServiceResult<HeadObjectOutput> {
        self.get_object(input).map(|output| output.head)
    }

    /// Delete an object, or one specific version of it.
    ///
    /// Without a version this follows the bucket's versioning status.
    /// Deleting a version that does not exist succeeds without effect.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn delete_object(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> S3ServiceResult<DeleteObjectOutput> {
        let b = self.state.get_bucket(bucket)?;
        let mut store = b.objects.write();

        let output = match version_id {
            Some(vid) => {
                let removed = store.delete_version(key, vid);
                DeleteObjectOutput {
                    version_id: Some(vid.to_owned()),
                    delete_marker: removed.is_some_and(|v| v.is_delete_marker()),
                }
            }
            None => {
                let outcome = store.delete(key, b.versioning_status(), &self.owner);
                DeleteObjectOutput {
                    version_id: outcome.version_id,
                    delete_marker: outcome.delete_marker,
                }
            }
        };
        debug!(bucket, key, ?output, "delete_object completed");
        Ok(output)
    }

    /// Delete up to 1000 keys, reporting each result separately.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, or `MalformedXML` for an empty or oversized request.
    pub fn delete_multiple_objects(
        &self,
        input: DeleteObjectsInput,
    ) -> S3ServiceResult<DeleteObjectsOutput> {
        self.state.get_bucket(&input.bucket)?;
        if input.objects.is_empty() || input.objects.len() > MAX_DELETE_OBJECTS {
            return Err(S3ServiceError::malformed_xml(format!(
                "A delete request must name between 1 and {MAX_DELETE_OBJECTS} objects"
            )));
        }

        let mut output = DeleteObjectsOutput::default();
        for object in input.objects {
            let result = validate_object_key(&object.key).and_then(|()| {
                self.delete_object(&input.bucket, &object.key, object.version_id.as_deref())
            });
            match result {
                Ok(deleted) if !input.quiet => output.deleted.push(DeletedObject {
                    delete_marker_version_id: if deleted.delete_marker {
                        deleted.version_id.clone()
                    } else {
                        None
                    },
                    key: object.key,
                    version_id: object.version_id,
                    delete_marker: deleted.delete_marker,
                }),
                Ok(_) => {}
                Err(e) => output.errors.push(DeleteError {
                    code: e.code(),
                    message: e.to_string(),
                    key: object.key,
                    version_id: object.version_id,
                }),
            }
        }
        Ok(output)
    }

    /// Copy an object, possibly onto itself with new metadata.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, `NoSuchKey`, `NoSuchVersion`, `InvalidRequest` for a
    /// delete-marker source or a no-op self copy, `PreconditionFailed`, or
    /// validation errors on the destination.
    pub fn copy_object(&self, input: CopyObjectInput) -> S3ServiceResult<CopyObjectOutput> {
        let source = parse_copy_source(&input.copy_source)?;
        let dest = self.state.get_bucket(&input.bucket)?;
        validate_object_key(&input.key)?;
        let src_bucket = self.state.get_bucket(&source.bucket)?;

        let src = {
            let store = src_bucket.objects.read();
            match find_object(&store, &source.key, source.version_id.as_deref()) {
                Err(S3ServiceError::MethodNotAllowed) => {
                    return Err(S3ServiceError::invalid_request(
                        "The source of a copy request may not specifically refer to a delete marker by version id.",
                    ));
                }
                other => other?.clone(),
            }
        };

        let self_copy = source.bucket == input.bucket
            && source.key == input.key
            && source.version_id.is_none();
        if self_copy && input.metadata_directive == MetadataDirective::Copy {
            return Err(S3ServiceError::invalid_request(
                "This copy request is illegal because it is trying to copy an object to itself without changing the object's metadata, storage class, website redirect location or encryption attributes.",
            ));
        }
        if let Some(if_match) = &input.copy_source_if_match {
            if !is_valid_if_match(&src.etag, if_match) {
                return Err(S3ServiceError::PreconditionFailed);
            }
        }
        if let Some(if_none_match) = &input.copy_source_if_none_match {
            if !is_valid_if_none_match(&src.etag, if_none_match) {
                return Err(S3ServiceError::PreconditionFailed);
            }
        }

        let metadata = match input.metadata_directive {
            MetadataDirective::Copy => src.metadata.clone(),
            MetadataDirective::Replace => {
                let metadata = input.metadata.normalized();
                validate_metadata(&metadata.user_metadata)?;
                metadata
            }
        };
        let storage_class = validate_storage_class(input.storage_class.as_deref())?;
        let acl = resolve_acl(input.acl.as_ref(), &self.owner, &dest.owner)?;

        let etag = compute_etag(&src.body);
        let last_modified = Utc::now();
        let object = S3Object {
            key: input.key,
            version_id: String::new(),
            body: src.body.clone(),
            etag: etag.clone(),
            last_modified,
            storage_class,
            metadata,
            owner: self.owner.clone(),
            acl,
            tags: src.tags.clone(),
            parts_count: None,
        };

        let mut store = dest.objects.write();
        let version_id = store.put(object, dest.versioning_status());
        debug!(from = %input.copy_source, to = %dest.name, "copy_object completed");

        Ok(CopyObjectOutput {
            etag,
            last_modified,
            version_id: reported_version(&version_id),
            copy_source_version_id: reported_version(&src.version_id),
        })
    }
}
