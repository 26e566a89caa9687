//! Multipart upload operation handlers.
//!
//! Implements `initiate_multipart_upload`, `upload_part`,
//! `upload_part_copy`, `complete_multipart_upload`, and
//! `abort_multipart_upload`.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info};

use super::object::{find_object, reported_version, resolve_acl};
use crate::error::{S3ServiceError, S3ServiceResult};
use crate::model::{
    CompleteMultipartUploadInput, CompleteMultipartUploadOutput, InitiateMultipartUploadInput,
    InitiateMultipartUploadOutput, UploadPartCopyInput, UploadPartCopyOutput, UploadPartInput,
    UploadPartOutput,
};
use crate::provider::MockS3;
use crate::state::{MultipartUpload, S3Bucket, S3Object, UploadPart};
use crate::utils::{
    compute_etag, compute_multipart_etag, generate_upload_id, normalize_etag, parse_copy_source,
    parse_range_header,
};
use crate::validation::{
    validate_content_md5, validate_metadata, validate_object_key, validate_storage_class,
    validate_tags,
};

/// Highest part number S3 accepts.
pub const MAX_PART_NUMBER: u32 = 10_000;

fn validate_part_number(part_number: u32) -> S3ServiceResult<()> {
    if (1..=MAX_PART_NUMBER).contains(&part_number) {
        Ok(())
    } else {
        Err(S3ServiceError::invalid_argument(format!(
            "Part number must be an integer between 1 and {MAX_PART_NUMBER}, inclusive"
        )))
    }
}

/// Store a part on the upload identified by `upload_id` for `key`.
fn store_part(bucket: &S3Bucket, key: &str, upload_id: &str, part: UploadPart) -> S3ServiceResult<()> {
    let mut upload = bucket
        .multipart_uploads
        .get_mut(upload_id)
        .filter(|u| u.key == key)
        .ok_or_else(|| S3ServiceError::NoSuchUpload {
            upload_id: upload_id.to_owned(),
        })?;
    debug!(upload_id, part_number = part.part_number, size = part.size(), "storing part");
    upload.put_part(part);
    Ok(())
}

impl MockS3 {
    /// Start a multipart upload, recording the options of the final object.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or validation errors on the options.
    pub fn initiate_multipart_upload(
        &self,
        input: InitiateMultipartUploadInput,
    ) -> S3ServiceResult<InitiateMultipartUploadOutput> {
        let b = self.state.get_bucket(&input.bucket)?;
        validate_object_key(&input.key)?;
        let metadata = input.metadata.normalized();
        validate_metadata(&metadata.user_metadata)?;
        validate_tags(&input.tagging)?;
        let storage_class = validate_storage_class(input.storage_class.as_deref())?;
        let acl = resolve_acl(input.acl.as_ref(), &self.owner, &b.owner)?;

        let upload_id = generate_upload_id();
        b.multipart_uploads.insert(
            upload_id.clone(),
            MultipartUpload {
                upload_id: upload_id.clone(),
                key: input.key.clone(),
                initiated: Utc::now(),
                owner: self.owner.clone(),
                metadata,
                acl,
                tags: input.tagging,
                storage_class,
                parts: BTreeMap::new(),
            },
        );
        info!(bucket = %input.bucket, key = %input.key, %upload_id, "multipart upload initiated");

        Ok(InitiateMultipartUploadOutput {
            bucket: input.bucket,
            key: input.key,
            upload_id,
        })
    }

    /// Upload (or replace) one part.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, `InvalidArgument` for a part number outside
    /// 1..=10000, digest errors, or `NoSuchUpload`.
    pub fn upload_part(&self, input: UploadPartInput) -> S3ServiceResult<UploadPartOutput> {
        let b = self.state.get_bucket(&input.bucket)?;
        validate_part_number(input.part_number)?;
        if self.config.validate_content_md5 {
            validate_content_md5(input.content_md5.as_deref(), &input.body)?;
        }

        let etag = compute_etag(&input.body);
        store_part(
            &b,
            &input.key,
            &input.upload_id,
            UploadPart {
                part_number: input.part_number,
                etag: etag.clone(),
                body: input.body,
                last_modified: Utc::now(),
            },
        )?;
        Ok(UploadPartOutput { etag })
    }

    /// Upload a part whose body is taken from an existing object, optionally
    /// a byte range of it.
    ///
    /// # Errors
    ///
    /// Those of [`MockS3::upload_part`], plus source lookup errors and
    /// `InvalidRange`.
    pub fn upload_part_copy(&self, input: UploadPartCopyInput) -> S3ServiceResult<UploadPartCopyOutput> {
        let b = self.state.get_bucket(&input.bucket)?;
        validate_part_number(input.part_number)?;
        let source = parse_copy_source(&input.copy_source)?;
        let src_bucket = self.state.get_bucket(&source.bucket)?;

        let (body, source_version) = {
            let store = src_bucket.objects.read();
            let object = match find_object(&store, &source.key, source.version_id.as_deref()) {
                Err(S3ServiceError::MethodNotAllowed) => {
                    return Err(S3ServiceError::invalid_request(
                        "The source of a copy request may not specifically refer to a delete marker by version id.",
                    ));
                }
                other => other?,
            };
            let body = match &input.copy_source_range {
                Some(range) => {
                    let (start, end) = parse_range_header(range, object.size())?;
                    let start = usize::try_from(start).map_err(|_| S3ServiceError::InvalidRange)?;
                    let end = usize::try_from(end).map_err(|_| S3ServiceError::InvalidRange)?;
                    object.body.slice(start..=end)
                }
                None => object.body.clone(),
            };
            (body, object.version_id.clone())
        };

        let etag = compute_etag(&body);
        let last_modified = Utc::now();
        store_part(
            &b,
            &input.key,
            &input.upload_id,
            UploadPart {
                part_number: input.part_number,
                etag: etag.clone(),
                body,
                last_modified,
            },
        )?;

        Ok(UploadPartCopyOutput {
            etag,
            last_modified,
            copy_source_version_id: reported_version(&source_version),
        })
    }

    /// Assemble the listed parts into the final object.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, `NoSuchUpload`, `MalformedXML` for an empty part
    /// list, `InvalidPartOrder`, `InvalidPart`, or `EntityTooSmall`.
    pub fn complete_multipart_upload(
        &self,
        input: CompleteMultipartUploadInput,
    ) -> S3ServiceResult<CompleteMultipartUploadOutput> {
        let b = self.state.get_bucket(&input.bucket)?;
        if input.parts.is_empty() {
            return Err(S3ServiceError::malformed_xml(
                "You must specify at least one part",
            ));
        }
        if input
            .parts
            .windows(2)
            .any(|pair| pair[1].part_number <= pair[0].part_number)
        {
            return Err(S3ServiceError::InvalidPartOrder);
        }

        let object = {
            let upload = b
                .multipart_uploads
                .get(&input.upload_id)
                .filter(|u| u.key == input.key)
                .ok_or_else(|| S3ServiceError::NoSuchUpload {
                    upload_id: input.upload_id.clone(),
                })?;

            let last = input.parts.len() - 1;
            let mut body = Vec::new();
            let mut etags = Vec::with_capacity(input.parts.len());
            for (idx, requested) in input.parts.iter().enumerate() {
                let part = upload
                    .get_part(requested.part_number)
                    .filter(|p| normalize_etag(&p.etag) == normalize_etag(&requested.etag))
                    .ok_or(S3ServiceError::InvalidPart {
                        part_number: requested.part_number,
                    })?;
                if idx < last && part.size() < self.config.min_part_size {
                    return Err(S3ServiceError::EntityTooSmall {
                        part_number: requested.part_number,
                    });
                }
                body.extend_from_slice(&part.body);
                etags.push(part.etag.as_str());
            }

            S3Object {
                key: input.key.clone(),
                version_id: String::new(),
                body: Bytes::from(body),
                etag: compute_multipart_etag(&etags),
                last_modified: Utc::now(),
                storage_class: upload.storage_class.clone(),
                metadata: upload.metadata.clone(),
                owner: upload.owner.clone(),
                acl: upload.acl.clone(),
                tags: upload.tags.clone(),
                parts_count: u32::try_from(input.parts.len()).ok(),
            }
        };

        b.multipart_uploads.remove(&input.upload_id);
        let etag = object.etag.clone();
        let version_id = b.objects.write().put(object, b.versioning_status());
        info!(bucket = %input.bucket, key = %input.key, %etag, "multipart upload completed");

        Ok(CompleteMultipartUploadOutput {
            bucket: input.bucket,
            key: input.key,
            etag,
            version_id: reported_version(&version_id),
        })
    }

    /// Discard an upload and its parts.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `NoSuchUpload`.
    pub fn abort_multipart_upload(&self, bucket: &str, key: &str, upload_id: &str) -> S3ServiceResult<()> {
        let b = self.state.get_bucket(bucket)?;
        b.multipart_uploads
            .remove_if(upload_id, |_, u| u.key == key)
            .ok_or_else(|| S3ServiceError::NoSuchUpload {
                upload_id: upload_id.to_owned(),
            })?;
        info!(bucket, key, upload_id, "multipart upload aborted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::S3Config;
    use crate::model::{CompletedPart, CreateBucketInput, GetObjectInput, PutObjectInput};
    use crate::state::ObjectMetadata;

    const MIN: u64 = 16;

    fn mock() -> MockS3 {
        let s3 = MockS3::new(S3Config::builder().min_part_size(MIN).build());
        s3.create_bucket(CreateBucketInput {
            bucket: "test-bucket".to_owned(),
            ..CreateBucketInput::default()
        })
        .unwrap_or_else(|e| panic!("create failed: {e}"));
        s3
    }

    fn initiate(s3: &MockS3, key: &str) -> String {
        s3.initiate_multipart_upload(InitiateMultipartUploadInput {
            bucket: "test-bucket".to_owned(),
            key: key.to_owned(),
            metadata: ObjectMetadata {
                content_type: Some("application/octet-stream".to_owned()),
                ..ObjectMetadata::default()
            },
            ..InitiateMultipartUploadInput::default()
        })
        .unwrap_or_else(|e| panic!("initiate failed: {e}"))
        .upload_id
    }

    fn upload(s3: &MockS3, key: &str, upload_id: &str, part_number: u32, body: Vec<u8>) -> CompletedPart {
        let out = s3
            .upload_part(UploadPartInput {
                bucket: "test-bucket".to_owned(),
                key: key.to_owned(),
                upload_id: upload_id.to_owned(),
                part_number,
                body: Bytes::from(body),
                ..UploadPartInput::default()
            })
            .unwrap_or_else(|e| panic!("upload part failed: {e}"));
        CompletedPart {
            part_number,
            etag: out.etag,
        }
    }

    fn complete(s3: &MockS3, key: &str, upload_id: &str, parts: Vec<CompletedPart>) -> S3ServiceResult<CompleteMultipartUploadOutput> {
        s3.complete_multipart_upload(CompleteMultipartUploadInput {
            bucket: "test-bucket".to_owned(),
            key: key.to_owned(),
            upload_id: upload_id.to_owned(),
            parts,
        })
    }

    #[test]
    fn test_should_assemble_parts_in_order() {
        let s3 = mock();
        let id = initiate(&s3, "big");
        let p1 = upload(&s3, "big", &id, 1, vec![b'a'; 16]);
        let p2 = upload(&s3, "big", &id, 2, b"tail".to_vec());

        let out = complete(&s3, "big", &id, vec![p1.clone(), p2.clone()])
            .unwrap_or_else(|e| panic!("complete failed: {e}"));
        assert_eq!(out.etag, compute_multipart_etag(&[p1.etag, p2.etag]));
        assert!(out.etag.ends_with("-2\""));

        let got = s3
            .get_object(GetObjectInput {
                bucket: "test-bucket".to_owned(),
                key: "big".to_owned(),
                ..GetObjectInput::default()
            })
            .unwrap_or_else(|e| panic!("get failed: {e}"));
        assert_eq!(got.body.len(), 20);
        assert!(got.body.ends_with(b"tail"));
        assert_eq!(got.head.parts_count, Some(2));
        assert_eq!(got.head.metadata.content_type.as_deref(), Some("application/octet-stream"));
        assert!(s3.state().get_bucket("test-bucket").is_ok_and(|b| b.multipart_uploads.is_empty()));
    }

    #[test]
    fn test_should_reject_bad_part_lists() {
        let s3 = mock();
        let id = initiate(&s3, "k");
        let p1 = upload(&s3, "k", &id, 1, vec![b'a'; 4]);
        let p2 = upload(&s3, "k", &id, 2, vec![b'b'; 16]);

        let result = complete(&s3, "k", &id, vec![]);
        assert!(matches!(result, Err(S3ServiceError::MalformedXml { .. })), "empty list, got {result:?}");

        let result = complete(&s3, "k", &id, vec![p2.clone(), p1.clone()]);
        assert!(matches!(result, Err(S3ServiceError::InvalidPartOrder)), "descending, got {result:?}");

        let bogus = CompletedPart {
            part_number: 2,
            etag: "\"0000\"".to_owned(),
        };
        let result = complete(&s3, "k", &id, vec![bogus]);
        assert!(
            matches!(result, Err(S3ServiceError::InvalidPart { part_number: 2 })),
            "etag mismatch, got {result:?}"
        );

        let result = complete(&s3, "k", &id, vec![p1, p2]);
        assert!(
            matches!(result, Err(S3ServiceError::EntityTooSmall { part_number: 1 })),
            "small first part, got {result:?}"
        );
        assert!(s3.state().get_bucket("test-bucket").is_ok_and(|b| !b.multipart_uploads.is_empty()));
    }

    #[test]
    fn test_should_accept_unquoted_etags_and_single_small_part() {
        let s3 = mock();
        let id = initiate(&s3, "tiny");
        let p1 = upload(&s3, "tiny", &id, 1, b"x".to_vec());
        let unquoted = CompletedPart {
            part_number: 1,
            etag: normalize_etag(&p1.etag).to_owned(),
        };
        assert!(complete(&s3, "tiny", &id, vec![unquoted]).is_ok());
    }

    #[test]
    fn test_should_validate_part_numbers_and_uploads() {
        let s3 = mock();
        let id = initiate(&s3, "k");
        for part_number in [0, MAX_PART_NUMBER + 1] {
            let result = s3.upload_part(UploadPartInput {
                bucket: "test-bucket".to_owned(),
                key: "k".to_owned(),
                upload_id: id.clone(),
                part_number,
                ..UploadPartInput::default()
            });
            assert!(
                matches!(result, Err(S3ServiceError::InvalidArgument { .. })),
                "part {part_number} should be rejected, got {result:?}"
            );
        }
        let result = s3.upload_part(UploadPartInput {
            bucket: "test-bucket".to_owned(),
            key: "k".to_owned(),
            upload_id: "nope".to_owned(),
            part_number: 1,
            ..UploadPartInput::default()
        });
        assert!(matches!(result, Err(S3ServiceError::NoSuchUpload { .. })), "got {result:?}");
    }

    #[test]
    fn test_should_abort_upload() {
        let s3 = mock();
        let id = initiate(&s3, "k");
        upload(&s3, "k", &id, 1, b"data".to_vec());
        assert!(
            matches!(s3.abort_multipart_upload("test-bucket", "other", &id), Err(S3ServiceError::NoSuchUpload { .. })),
            "key mismatch"
        );
        s3.abort_multipart_upload("test-bucket", "k", &id)
            .unwrap_or_else(|e| panic!("abort failed: {e}"));
        assert!(
            matches!(s3.abort_multipart_upload("test-bucket", "k", &id), Err(S3ServiceError::NoSuchUpload { .. })),
            "second abort"
        );
        assert!(s3.state().get_bucket("test-bucket").is_ok_and(|b| b.is_empty()));
    }

    #[test]
    fn test_should_copy_part_range_from_object() {
        let s3 = mock();
        s3.put_object(PutObjectInput {
            bucket: "test-bucket".to_owned(),
            key: "source".to_owned(),
            body: Bytes::from_static(b"0123456789"),
            ..PutObjectInput::default()
        })
        .unwrap_or_else(|e| panic!("put failed: {e}"));
        let id = initiate(&s3, "dest");

        let out = s3
            .upload_part_copy(UploadPartCopyInput {
                bucket: "test-bucket".to_owned(),
                key: "dest".to_owned(),
                upload_id: id.clone(),
                part_number: 1,
                copy_source: "test-bucket/source".to_owned(),
                copy_source_range: Some("bytes=3-5".to_owned()),
            })
            .unwrap_or_else(|e| panic!("copy part failed: {e}"));
        assert_eq!(out.etag, compute_etag(b"345"));

        complete(&s3, "dest", &id, vec![CompletedPart { part_number: 1, etag: out.etag }])
            .unwrap_or_else(|e| panic!("complete failed: {e}"));
        let got = s3
            .get_object(GetObjectInput {
                bucket: "test-bucket".to_owned(),
                key: "dest".to_owned(),
                ..GetObjectInput::default()
            })
            .unwrap_or_else(|e| panic!("get failed: {e}"));
        assert_eq!(got.body, Bytes::from_static(b"345"));
    }
}
