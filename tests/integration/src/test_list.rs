//! Listing and pagination integration tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use awsmock_s3::model::{InitiateMultipartUploadInput, ListMultipartUploadsInput, ListObjectsInput};

    use crate::{create_test_bucket, put, s3};

    #[test]
    fn test_should_page_objects_into_disjoint_sorted_pages() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "pages");
        let keys: Vec<String> = (0..23).map(|i| format!("key-{i:02}")).collect();
        for key in &keys {
            put(&s3, &bucket, key, b"x");
        }

        let mut seen = Vec::new();
        let mut marker = None;
        let mut pages = 0;
        loop {
            let page = s3
                .list_objects(ListObjectsInput {
                    bucket: bucket.clone(),
                    marker: marker.take(),
                    max_keys: Some(5),
                    ..ListObjectsInput::default()
                })
                .expect("list objects");
            pages += 1;
            assert!(page.contents.len() <= 5);
            seen.extend(page.contents.into_iter().map(|o| o.key));
            if !page.is_truncated {
                assert!(page.next_marker.is_none());
                break;
            }
            marker = Some(page.next_marker.expect("truncated page carries a marker"));
        }

        assert_eq!(pages, 5);
        assert_eq!(seen, keys);
        let unique: BTreeSet<&String> = seen.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn test_should_group_keys_by_delimiter() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "delim");
        for key in ["photos/2024/a.jpg", "photos/2024/b.jpg", "photos/2025/c.jpg", "photos/index.html", "docs/readme"] {
            put(&s3, &bucket, key, b"x");
        }

        let listing = s3
            .list_objects(ListObjectsInput {
                bucket: bucket.clone(),
                prefix: Some("photos/".to_owned()),
                delimiter: Some("/".to_owned()),
                ..ListObjectsInput::default()
            })
            .expect("list objects");
        assert_eq!(
            listing.common_prefixes,
            vec!["photos/2024/".to_owned(), "photos/2025/".to_owned()]
        );
        let keys: Vec<&str> = listing.contents.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["photos/index.html"]);
        assert!(!listing.is_truncated);

        let top = s3
            .list_objects(ListObjectsInput {
                bucket,
                delimiter: Some("/".to_owned()),
                ..ListObjectsInput::default()
            })
            .expect("list objects");
        assert_eq!(top.common_prefixes, vec!["docs/".to_owned(), "photos/".to_owned()]);
        assert!(top.contents.is_empty());
    }

    #[test]
    fn test_should_hide_deleted_keys_from_object_listing() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "hidden");
        s3.put_bucket_versioning(&bucket, "Enabled").expect("enable");
        put(&s3, &bucket, "kept", b"1");
        put(&s3, &bucket, "gone", b"2");
        s3.delete_object(&bucket, "gone", None).expect("delete");

        let listing = s3
            .list_objects(ListObjectsInput {
                bucket,
                ..ListObjectsInput::default()
            })
            .expect("list objects");
        let keys: Vec<&str> = listing.contents.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["kept"]);
    }

    #[test]
    fn test_should_page_multipart_uploads_by_key() {
        let s3 = s3();
        let bucket = create_test_bucket(&s3, "uploads");
        for key in ["c", "a", "b"] {
            s3.initiate_multipart_upload(InitiateMultipartUploadInput {
                bucket: bucket.clone(),
                key: key.to_owned(),
                ..InitiateMultipartUploadInput::default()
            })
            .expect("initiate");
        }

        let first = s3
            .list_multipart_uploads(ListMultipartUploadsInput {
                bucket: bucket.clone(),
                max_uploads: Some(2),
                ..ListMultipartUploadsInput::default()
            })
            .expect("list uploads");
        let keys: Vec<&str> = first.uploads.iter().map(|u| u.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(first.is_truncated);

        let second = s3
            .list_multipart_uploads(ListMultipartUploadsInput {
                bucket,
                key_marker: first.next_key_marker.clone(),
                upload_id_marker: first.next_upload_id_marker.clone(),
                max_uploads: Some(2),
                ..ListMultipartUploadsInput::default()
            })
            .expect("list uploads");
        let keys: Vec<&str> = second.uploads.iter().map(|u| u.key.as_str()).collect();
        assert_eq!(keys, vec!["c"]);
        assert!(!second.is_truncated);
    }
}
