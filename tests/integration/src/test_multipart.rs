//! Multipart upload integration tests.

#[cfg(test)]
mod tests {
    use awsmock_s3::config::DEFAULT_MIN_PART_SIZE;
    use awsmock_s3::model::{
        CompleteMultipartUploadInput, CompletedPart, GetObjectInput, InitiateMultipartUploadInput,
        ListMultipartUploadsInput, ListPartsInput, UploadPartCopyInput, UploadPartInput,
    };
    use awsmock_s3::{MockS3, S3ServiceError};
    use bytes::Bytes;

    use crate::{create_test_bucket, put, s3};

    fn initiate(s3: &MockS3, bucket: &str, key: &str) -> String {
        s3.initiate_multipart_upload(InitiateMultipartUploadInput {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            tagging: vec![("kind".to_owned(), "archive".to_owned())],
            ..InitiateMultipartUploadInput::default()
        })
        .expect("initiate")
        .upload_id
    }

    fn upload(s3: &MockS3, bucket: &str, key: &str, upload_id: &str, part_number: u32, body: Bytes) -> CompletedPart {
        let etag = s3
            .upload_part(UploadPartInput {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                upload_id: upload_id.to_owned(),
                part_number,
                body,
                content_md5: None,
            })
            .expect("upload part")
            .etag;
        CompletedPart { part_number, etag }
    }

    fn complete(
        s3: &MockS3,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> Result<awsmock_s3::model::CompleteMultipartUploadOutput, S3ServiceError> {
        s3.complete_multipart_upload(CompleteMultipartUploadInput {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            upload_id: upload_id.to_owned(),
            parts,
        })
    }

    fn big_part() -> Bytes {
        let size = usize::try_from(DEFAULT_MIN_PART_SIZE).expect("part size fits");
        Bytes::from(vec![b'a'; size])
    }

    #[test]
    fn test_should_enforce_order_etag_and_size_then_complete() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "mpu");
        let upload_id = initiate(&s3, &bucket, "archive.bin");

        let p1 = upload(&s3, &bucket, "archive.bin", &upload_id, 1, big_part());
        let p2 = upload(&s3, &bucket, "archive.bin", &upload_id, 2, Bytes::from_static(b"tail"));

        let err = complete(&s3, &bucket, "archive.bin", &upload_id, vec![p2.clone(), p1.clone()]);
        assert!(
            matches!(err, Err(S3ServiceError::InvalidPartOrder)),
            "expected InvalidPartOrder, got {err:?}"
        );

        let wrong = CompletedPart {
            part_number: 2,
            etag: "\"00000000000000000000000000000000\"".to_owned(),
        };
        let err = complete(&s3, &bucket, "archive.bin", &upload_id, vec![p1.clone(), wrong]);
        assert!(
            matches!(err, Err(S3ServiceError::InvalidPart { part_number: 2 })),
            "expected InvalidPart, got {err:?}"
        );

        // Failed completions leave the upload open.
        let parts = s3
            .list_parts(ListPartsInput {
                bucket: bucket.clone(),
                key: "archive.bin".to_owned(),
                upload_id: upload_id.clone(),
                ..ListPartsInput::default()
            })
            .expect("list parts");
        assert_eq!(parts.parts.len(), 2);

        let done = complete(&s3, &bucket, "archive.bin", &upload_id, vec![p1, p2]).expect("complete");
        assert!(done.etag.ends_with("-2\""), "unexpected multipart etag {}", done.etag);

        let object = s3
            .get_object(GetObjectInput {
                bucket: bucket.clone(),
                key: "archive.bin".to_owned(),
                ..GetObjectInput::default()
            })
            .expect("get object");
        assert_eq!(object.body.len(), big_part().len() + 4);
        assert!(object.body.ends_with(b"tail"));
        assert_eq!(object.head.parts_count, Some(2));
        assert_eq!(object.head.tag_count, 1);

        let uploads = s3
            .list_multipart_uploads(ListMultipartUploadsInput {
                bucket,
                ..ListMultipartUploadsInput::default()
            })
            .expect("list uploads");
        assert!(uploads.uploads.is_empty());
    }

    #[test]
    fn test_should_reject_small_parts_before_the_last() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "small");
        let upload_id = initiate(&s3, &bucket, "k");
        let p1 = upload(&s3, &bucket, "k", &upload_id, 1, Bytes::from_static(b"tiny"));
        let p2 = upload(&s3, &bucket, "k", &upload_id, 2, Bytes::from_static(b"tiny"));

        let err = complete(&s3, &bucket, "k", &upload_id, vec![p1.clone(), p2]);
        assert!(
            matches!(err, Err(S3ServiceError::EntityTooSmall { part_number: 1 })),
            "expected EntityTooSmall, got {err:?}"
        );

        // A single small part is also the last part.
        let done = complete(&s3, &bucket, "k", &upload_id, vec![p1]).expect("complete");
        assert!(done.etag.ends_with("-1\""));
    }

    #[test]
    fn test_should_copy_part_range_from_existing_object() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "pcopy");
        put(&s3, &bucket, "source.txt", b"0123456789");
        let upload_id = initiate(&s3, &bucket, "dest.txt");

        let copied = s3
            .upload_part_copy(UploadPartCopyInput {
                bucket: bucket.clone(),
                key: "dest.txt".to_owned(),
                upload_id: upload_id.clone(),
                part_number: 1,
                copy_source: format!("{bucket}/source.txt"),
                copy_source_range: Some("bytes=2-5".to_owned()),
            })
            .expect("upload part copy");

        complete(
            &s3,
            &bucket,
            "dest.txt",
            &upload_id,
            vec![CompletedPart {
                part_number: 1,
                etag: copied.etag,
            }],
        )
        .expect("complete");
        let object = s3
            .get_object(GetObjectInput {
                bucket,
                key: "dest.txt".to_owned(),
                ..GetObjectInput::default()
            })
            .expect("get");
        assert_eq!(&object.body[..], b"2345");
    }

    #[test]
    fn test_should_fail_on_unknown_or_aborted_upload() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "abort");
        let upload_id = initiate(&s3, &bucket, "k");
        s3.abort_multipart_upload(&bucket, "k", &upload_id).expect("abort");

        let err = s3.abort_multipart_upload(&bucket, "k", &upload_id);
        assert!(
            matches!(err, Err(S3ServiceError::NoSuchUpload { .. })),
            "expected NoSuchUpload, got {err:?}"
        );
        let err = s3.upload_part(UploadPartInput {
            bucket: bucket.clone(),
            key: "k".to_owned(),
            upload_id,
            part_number: 1,
            body: Bytes::from_static(b"x"),
            content_md5: None,
        });
        assert!(
            matches!(err, Err(S3ServiceError::NoSuchUpload { .. })),
            "expected NoSuchUpload, got {err:?}"
        );
    }
}
