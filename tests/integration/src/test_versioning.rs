//! Versioning integration tests.

#[cfg(test)]
mod tests {
    use awsmock_s3::S3ServiceError;
    use awsmock_s3::model::ListObjectVersionsInput;
    use awsmock_s3::state::VersioningStatus;

    use crate::{create_test_bucket, put, read, s3};

    fn version_ids(s3: &awsmock_s3::MockS3, bucket: &str) -> (Vec<String>, Vec<String>) {
        let listing = s3
            .list_object_versions(ListObjectVersionsInput {
                bucket: bucket.to_owned(),
                ..ListObjectVersionsInput::default()
            })
            .expect("list versions");
        (
            listing.versions.into_iter().map(|v| v.version_id).collect(),
            listing
                .delete_markers
                .into_iter()
                .map(|m| m.version_id)
                .collect(),
        )
    }

    #[test]
    fn test_should_replace_null_version_in_place_while_suspended() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "suspend");

        // Stored before versioning: keeps the null ID.
        assert!(put(&s3, &bucket, "k", b"pre").version_id.is_none());
        s3.put_bucket_versioning(&bucket, "Enabled").expect("enable");
        let real = put(&s3, &bucket, "k", b"real").version_id.expect("real version");

        s3.put_bucket_versioning(&bucket, "Suspended").expect("suspend");
        assert_eq!(
            s3.get_bucket_versioning(&bucket).expect("status"),
            VersioningStatus::Suspended
        );
        assert!(put(&s3, &bucket, "k", b"first-null").version_id.is_none());
        assert!(put(&s3, &bucket, "k", b"second-null").version_id.is_none());

        let (versions, markers) = version_ids(&s3, &bucket);
        assert_eq!(versions, vec!["null".to_owned(), real.clone()]);
        assert!(markers.is_empty());
        assert_eq!(&read(&s3, &bucket, "k", None).expect("latest")[..], b"second-null");
        assert_eq!(&read(&s3, &bucket, "k", Some(&real)).expect("real")[..], b"real");
    }

    #[test]
    fn test_should_hide_object_behind_delete_marker_and_restore_it() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "marker");
        s3.put_bucket_versioning(&bucket, "Enabled").expect("enable");
        let v1 = put(&s3, &bucket, "k", b"v1").version_id.expect("v1");
        let v2 = put(&s3, &bucket, "k", b"v2").version_id.expect("v2");
        assert_ne!(v1, v2);

        let deleted = s3.delete_object(&bucket, "k", None).expect("delete");
        assert!(deleted.delete_marker);
        let marker = deleted.version_id.expect("marker id");

        let err = read(&s3, &bucket, "k", None);
        assert!(
            matches!(err, Err(S3ServiceError::NoSuchKey { .. })),
            "expected NoSuchKey, got {err:?}"
        );
        let err = read(&s3, &bucket, "k", Some(&marker));
        assert!(
            matches!(err, Err(S3ServiceError::MethodNotAllowed)),
            "expected MethodNotAllowed, got {err:?}"
        );
        assert_eq!(&read(&s3, &bucket, "k", Some(&v1)).expect("v1")[..], b"v1");

        let removed = s3
            .delete_object(&bucket, "k", Some(&marker))
            .expect("delete marker");
        assert!(removed.delete_marker);
        assert_eq!(&read(&s3, &bucket, "k", None).expect("restored")[..], b"v2");
    }

    #[test]
    fn test_should_drop_null_version_on_suspended_delete() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "sdel");
        s3.put_bucket_versioning(&bucket, "Enabled").expect("enable");
        let real = put(&s3, &bucket, "k", b"real").version_id.expect("real");
        s3.put_bucket_versioning(&bucket, "Suspended").expect("suspend");
        put(&s3, &bucket, "k", b"null body");

        let deleted = s3.delete_object(&bucket, "k", None).expect("delete");
        assert!(deleted.delete_marker);
        assert_eq!(deleted.version_id.as_deref(), Some("null"));

        let (versions, markers) = version_ids(&s3, &bucket);
        assert_eq!(versions, vec![real]);
        assert_eq!(markers, vec!["null".to_owned()]);
    }

    #[test]
    fn test_should_never_return_to_disabled() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "states");
        assert_eq!(
            s3.get_bucket_versioning(&bucket).expect("status"),
            VersioningStatus::Disabled
        );
        let err = s3.put_bucket_versioning(&bucket, "Disabled");
        assert!(
            matches!(err, Err(S3ServiceError::MalformedXml { .. })),
            "expected MalformedXML, got {err:?}"
        );
        s3.put_bucket_versioning(&bucket, "Enabled").expect("enable");
        s3.put_bucket_versioning(&bucket, "Suspended").expect("suspend");
        assert_eq!(
            s3.get_bucket_versioning(&bucket).expect("status").as_str(),
            Some("Suspended")
        );
    }
}
