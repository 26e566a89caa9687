//! Object integration tests.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use awsmock_s3::model::{
        CopyObjectInput, DeleteObjectsInput, GetObjectInput, MetadataDirective, ObjectIdentifier,
        PutObjectInput,
    };
    use awsmock_s3::state::ObjectMetadata;
    use awsmock_s3::S3ServiceError;
    use bytes::Bytes;

    use crate::{create_test_bucket, put, read, s3};

    #[test]
    fn test_should_copy_across_buckets_and_refuse_plain_self_copy() {
        let s3 = s3();
        let src = create_test_bucket(&s3, "src");
        let dst = create_test_bucket(&s3, "dst");
        s3.put_object(PutObjectInput {
            bucket: src.clone(),
            key: "report.csv".to_owned(),
            body: Bytes::from_static(b"a,b,c"),
            metadata: ObjectMetadata {
                content_type: Some("text/csv".to_owned()),
                user_metadata: HashMap::from([("Owner".to_owned(), "finance".to_owned())]),
                ..ObjectMetadata::default()
            },
            tagging: vec![("team".to_owned(), "fin".to_owned())],
            ..PutObjectInput::default()
        })
        .expect("put source");

        let copied = s3
            .copy_object(CopyObjectInput {
                bucket: dst.clone(),
                key: "copy.csv".to_owned(),
                copy_source: format!("{src}/report.csv"),
                ..CopyObjectInput::default()
            })
            .expect("copy");

        let head = s3
            .head_object(GetObjectInput {
                bucket: dst.clone(),
                key: "copy.csv".to_owned(),
                ..GetObjectInput::default()
            })
            .expect("head copy");
        assert_eq!(head.etag, copied.etag);
        assert_eq!(head.metadata.content_type.as_deref(), Some("text/csv"));
        assert_eq!(
            head.metadata.user_metadata.get("owner").map(String::as_str),
            Some("finance")
        );
        assert_eq!(head.tag_count, 1);

        let err = s3.copy_object(CopyObjectInput {
            bucket: src.clone(),
            key: "report.csv".to_owned(),
            copy_source: format!("{src}/report.csv"),
            ..CopyObjectInput::default()
        });
        assert!(
            matches!(err, Err(S3ServiceError::InvalidRequest { .. })),
            "expected InvalidRequest, got {err:?}"
        );

        s3.copy_object(CopyObjectInput {
            bucket: src.clone(),
            key: "report.csv".to_owned(),
            copy_source: format!("{src}/report.csv"),
            metadata_directive: MetadataDirective::Replace,
            metadata: ObjectMetadata {
                content_type: Some("application/octet-stream".to_owned()),
                ..ObjectMetadata::default()
            },
            ..CopyObjectInput::default()
        })
        .expect("self copy with REPLACE");
        let head = s3
            .head_object(GetObjectInput {
                bucket: src,
                key: "report.csv".to_owned(),
                ..GetObjectInput::default()
            })
            .expect("head source");
        assert_eq!(head.metadata.content_type.as_deref(), Some("application/octet-stream"));
        assert!(head.metadata.user_metadata.is_empty());
    }

    #[test]
    fn test_should_honor_range_and_conditional_headers() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "cond");
        let etag = put(&s3, &bucket, "hello.txt", b"hello world").etag;

        let ranged = s3
            .get_object(GetObjectInput {
                bucket: bucket.clone(),
                key: "hello.txt".to_owned(),
                range: Some("bytes=0-4".to_owned()),
                ..GetObjectInput::default()
            })
            .expect("ranged get");
        assert_eq!(&ranged.body[..], b"hello");
        assert_eq!(ranged.head.content_range.as_deref(), Some("bytes 0-4/11"));

        let not_modified = s3.get_object(GetObjectInput {
            bucket: bucket.clone(),
            key: "hello.txt".to_owned(),
            if_none_match: Some(etag.clone()),
            ..GetObjectInput::default()
        });
        assert!(
            matches!(not_modified, Err(S3ServiceError::NotModified)),
            "expected NotModified, got {not_modified:?}"
        );

        let failed = s3.get_object(GetObjectInput {
            bucket: bucket.clone(),
            key: "hello.txt".to_owned(),
            if_match: Some("\"0123456789abcdef0123456789abcdef\"".to_owned()),
            ..GetObjectInput::default()
        });
        assert!(
            matches!(failed, Err(S3ServiceError::PreconditionFailed)),
            "expected PreconditionFailed, got {failed:?}"
        );

        let matched = s3
            .get_object(GetObjectInput {
                bucket,
                key: "hello.txt".to_owned(),
                if_match: Some(etag),
                ..GetObjectInput::default()
            })
            .expect("matching If-Match");
        assert_eq!(&matched.body[..], b"hello world");
    }

    #[test]
    fn test_should_report_each_key_of_a_multi_delete() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "multi");
        put(&s3, &bucket, "a", b"1");
        put(&s3, &bucket, "b", b"2");

        let objects = vec![
            ObjectIdentifier {
                key: "a".to_owned(),
                version_id: None,
            },
            ObjectIdentifier {
                key: "b".to_owned(),
                version_id: None,
            },
            ObjectIdentifier {
                key: String::new(),
                version_id: None,
            },
        ];
        let output = s3
            .delete_multiple_objects(DeleteObjectsInput {
                bucket: bucket.clone(),
                objects: objects.clone(),
                quiet: false,
            })
            .expect("delete objects");
        assert_eq!(output.deleted.len(), 2);
        assert_eq!(output.errors.len(), 1);
        assert!(matches!(read(&s3, &bucket, "a", None), Err(S3ServiceError::NoSuchKey { .. })));

        let quiet = s3
            .delete_multiple_objects(DeleteObjectsInput {
                bucket: bucket.clone(),
                objects,
                quiet: true,
            })
            .expect("quiet delete");
        assert!(quiet.deleted.is_empty());
        assert_eq!(quiet.errors.len(), 1);

        let err = s3.delete_multiple_objects(DeleteObjectsInput {
            bucket,
            objects: Vec::new(),
            quiet: false,
        });
        assert!(
            matches!(err, Err(S3ServiceError::MalformedXml { .. })),
            "expected MalformedXML, got {err:?}"
        );
    }

    #[test]
    fn test_should_tag_objects_independently_per_version() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "tags");
        s3.put_bucket_versioning(&bucket, "Enabled").expect("enable");
        let v1 = put(&s3, &bucket, "k", b"one").version_id.expect("v1 id");
        put(&s3, &bucket, "k", b"two");

        s3.put_object_tagging(
            &bucket,
            "k",
            Some(&v1),
            vec![("stage".to_owned(), "old".to_owned())],
        )
        .expect("tag v1");

        let latest = s3.get_object_tagging(&bucket, "k", None).expect("latest tags");
        assert!(latest.tags.is_empty());
        let first = s3.get_object_tagging(&bucket, "k", Some(&v1)).expect("v1 tags");
        assert_eq!(first.tags, vec![("stage".to_owned(), "old".to_owned())]);
        assert_eq!(first.version_id.as_deref(), Some(v1.as_str()));
    }
}
