//! Bucket integration tests.

#[cfg(test)]
mod tests {
    use awsmock_core::{AccountId, AwsRegion};
    use awsmock_s3::acl::{ALL_USERS_URI, AclInput, Permission};
    use awsmock_s3::model::{CreateBucketInput, InitiateMultipartUploadInput, ListObjectVersionsInput};
    use awsmock_s3::{MockS3Registry, S3ServiceError};

    use crate::{create_test_bucket, put, s3, test_bucket_name};

    #[test]
    fn test_should_keep_bucket_until_every_version_and_upload_is_gone() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "nonempty");
        s3.put_bucket_versioning(&bucket, "Enabled")
            .expect("enable versioning");

        put(&s3, &bucket, "doc.txt", b"one");
        s3.delete_object(&bucket, "doc.txt", None)
            .expect("delete with marker");

        // Only a delete marker is visible, yet the bucket still holds data.
        let err = s3.delete_bucket(&bucket);
        assert!(
            matches!(err, Err(S3ServiceError::BucketNotEmpty { .. })),
            "expected BucketNotEmpty, got {err:?}"
        );

        let versions = s3
            .list_object_versions(ListObjectVersionsInput {
                bucket: bucket.clone(),
                ..ListObjectVersionsInput::default()
            })
            .expect("list versions");
        let ids: Vec<String> = versions
            .versions
            .iter()
            .map(|v| v.version_id.clone())
            .chain(versions.delete_markers.iter().map(|m| m.version_id.clone()))
            .collect();
        assert_eq!(ids.len(), 2);
        for id in &ids {
            s3.delete_object(&bucket, "doc.txt", Some(id))
                .expect("delete version");
        }

        let upload = s3
            .initiate_multipart_upload(InitiateMultipartUploadInput {
                bucket: bucket.clone(),
                key: "big.bin".to_owned(),
                ..InitiateMultipartUploadInput::default()
            })
            .expect("initiate");
        assert!(
            matches!(s3.delete_bucket(&bucket), Err(S3ServiceError::BucketNotEmpty { .. })),
            "an open upload should keep the bucket"
        );

        s3.abort_multipart_upload(&bucket, "big.bin", &upload.upload_id)
            .expect("abort");
        s3.delete_bucket(&bucket).expect("delete empty bucket");
        assert!(
            matches!(s3.head_bucket(&bucket), Err(S3ServiceError::NoSuchBucket { .. })),
            "bucket should be gone"
        );
    }

    #[test]
    fn test_should_share_bucket_names_across_accounts() {
        let registry = MockS3Registry::default();
        let other = AccountId::new("210987654321").expect("account id");
        let region = AwsRegion::new("eu-west-1");
        let mine = registry.get(&AccountId::default(), &region);
        let theirs = registry.get(&other, &region);

        let name = test_bucket_name("shared");
        let input = CreateBucketInput {
            bucket: name.clone(),
            ..CreateBucketInput::default()
        };
        mine.create_bucket(input.clone()).expect("create");
        assert_eq!(
            mine.get_bucket_location(&name).expect("location").as_deref(),
            Some("eu-west-1")
        );

        let err = mine.create_bucket(input.clone());
        assert!(
            matches!(err, Err(S3ServiceError::BucketAlreadyOwnedByYou { .. })),
            "expected BucketAlreadyOwnedByYou, got {err:?}"
        );
        let err = theirs.create_bucket(input);
        assert!(
            matches!(err, Err(S3ServiceError::BucketAlreadyExists { .. })),
            "expected BucketAlreadyExists, got {err:?}"
        );

        // The same registry hands back the same scope.
        let again = registry.get(&AccountId::default(), &region);
        assert_eq!(again.list_buckets().buckets.len(), 1);
        assert!(theirs.list_buckets().buckets.is_empty());
    }

    #[test]
    fn test_should_apply_canned_acl_and_bucket_policy() {
        let s3 = s3();
        let name = test_bucket_name("acl");
        s3.create_bucket(CreateBucketInput {
            bucket: name.clone(),
            acl: Some(AclInput::Canned("public-read".to_owned())),
            ..CreateBucketInput::default()
        })
        .expect("create");

        let acl = s3.get_bucket_acl(&name).expect("get acl");
        assert!(acl.grants_group(ALL_USERS_URI, Permission::Read));
        assert!(!acl.grants_group(ALL_USERS_URI, Permission::Write));

        let err = s3.put_bucket_acl(&name, &AclInput::Canned("world-writable".to_owned()));
        assert!(
            matches!(err, Err(S3ServiceError::InvalidArgument { .. })),
            "expected InvalidArgument, got {err:?}"
        );

        s3.put_bucket_acl(&name, &AclInput::Canned("private".to_owned()))
            .expect("put acl");
        assert!(
            !s3.get_bucket_acl(&name)
                .expect("get acl")
                .grants_group(ALL_USERS_URI, Permission::Read)
        );

        let policy = r#"{"Version":"2012-10-17","Statement":[]}"#;
        s3.put_bucket_policy(&name, policy).expect("put policy");
        assert_eq!(s3.get_bucket_policy(&name).expect("get policy"), policy);
        assert!(
            matches!(s3.put_bucket_policy(&name, "not json"), Err(S3ServiceError::MalformedPolicy)),
            "non-JSON policy should be rejected"
        );
        s3.delete_bucket_policy(&name).expect("delete policy");
        assert!(
            matches!(s3.get_bucket_policy(&name), Err(S3ServiceError::NoSuchBucketPolicy)),
            "policy should be gone"
        );
    }
}
