//! Listing operation handlers.
//!
//! Implements `list_objects`, `list_object_versions`,
//! `list_multipart_uploads`, and `list_parts`.

use crate::error::{S3ServiceError, S3ServiceResult};
use crate::model::{
    DeleteMarkerSummary, ListMultipartUploadsInput, ListMultipartUploadsOutput,
    ListObjectVersionsInput, ListObjectVersionsOutput, ListObjectsInput, ListObjectsOutput,
    ListPartsInput, ListPartsOutput, MultipartUploadSummary, ObjectSummary, ObjectVersionSummary,
    PartSummary,
};
use crate::provider::MockS3;
use crate::state::ObjectVersion;

impl MockS3 {
    /// Effective page size: the request's, capped by the configured maximum.
    fn page_size(&self, requested: Option<usize>) -> usize {
        requested.map_or(self.config.max_keys, |n| n.min(self.config.max_keys))
    }

    /// List the current objects of a bucket.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn list_objects(&self, input: ListObjectsInput) -> S3ServiceResult<ListObjectsOutput> {
        let b = self.state.get_bucket(&input.bucket)?;
        let prefix = input.prefix.unwrap_or_default();
        let marker = input.marker.unwrap_or_default();
        let delimiter = input.delimiter.filter(|d| !d.is_empty());
        let max_keys = self.page_size(input.max_keys);

        let result = b.objects.read().list_objects(
            &prefix,
            delimiter.as_deref().unwrap_or_default(),
            &marker,
            max_keys,
        );

        let contents = result
            .objects
            .into_iter()
            .map(|o| ObjectSummary {
                size: o.size(),
                key: o.key,
                last_modified: o.last_modified,
                etag: o.etag,
                storage_class: o.storage_class,
                owner: o.owner,
            })
            .collect();

        Ok(ListObjectsOutput {
            name: input.bucket,
            prefix,
            delimiter,
            marker,
            max_keys,
            is_truncated: result.is_truncated,
            next_marker: result.next_marker,
            contents,
            common_prefixes: result.common_prefixes,
        })
    }

    /// List every version and delete marker of a bucket.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn list_object_versions(
        &self,
        input: ListObjectVersionsInput,
    ) -> S3ServiceResult<ListObjectVersionsOutput> {
        let b = self.state.get_bucket(&input.bucket)?;
        let prefix = input.prefix.unwrap_or_default();
        let key_marker = input.key_marker.unwrap_or_default();
        let version_id_marker = input.version_id_marker.unwrap_or_default();
        let max_keys = self.page_size(input.max_keys);

        let result = b.objects.read().list_object_versions(
            &prefix,
            input.delimiter.as_deref().unwrap_or_default(),
            &key_marker,
            &version_id_marker,
            max_keys,
        );

        let mut output = ListObjectVersionsOutput {
            name: input.bucket,
            prefix,
            key_marker,
            version_id_marker,
            max_keys,
            is_truncated: result.is_truncated,
            next_key_marker: result.next_key_marker,
            next_version_id_marker: result.next_version_id_marker,
            common_prefixes: result.common_prefixes,
            ..ListObjectVersionsOutput::default()
        };
        for entry in result.versions {
            match entry.version {
                ObjectVersion::Object(o) => output.versions.push(ObjectVersionSummary {
                    size: o.size(),
                    key: o.key,
                    version_id: o.version_id,
                    is_latest: entry.is_latest,
                    last_modified: o.last_modified,
                    etag: o.etag,
                    storage_class: o.storage_class,
                    owner: o.owner,
                }),
                ObjectVersion::DeleteMarker(dm) => output.delete_markers.push(DeleteMarkerSummary {
                    key: dm.key,
                    version_id: dm.version_id,
                    is_latest: entry.is_latest,
                    last_modified: dm.last_modified,
                    owner: dm.owner,
                }),
            }
        }
        Ok(output)
    }

    /// List in-progress multipart uploads, sorted by key then initiation
    /// time.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn list_multipart_uploads(
        &self,
        input: ListMultipartUploadsInput,
    ) -> S3ServiceResult<ListMultipartUploadsOutput> {
        let b = self.state.get_bucket(&input.bucket)?;
        let prefix = input.prefix.unwrap_or_default();
        let key_marker = input.key_marker.unwrap_or_default();
        let upload_id_marker = input.upload_id_marker.unwrap_or_default();
        let max_uploads = self.page_size(input.max_uploads);

        let mut uploads: Vec<MultipartUploadSummary> = b
            .multipart_uploads
            .iter()
            .filter(|entry| entry.key.starts_with(&prefix))
            .map(|entry| MultipartUploadSummary {
                key: entry.key.clone(),
                upload_id: entry.upload_id.clone(),
                initiated: entry.initiated,
                owner: entry.owner.clone(),
                storage_class: entry.storage_class.clone(),
            })
            .collect();
        uploads.sort_by(|a, c| {
            (a.key.as_str(), a.initiated, a.upload_id.as_str())
                .cmp(&(c.key.as_str(), c.initiated, c.upload_id.as_str()))
        });

        let after_key = |u: &MultipartUploadSummary| u.key.as_str() > key_marker.as_str();
        let start = if key_marker.is_empty() {
            0
        } else if upload_id_marker.is_empty() {
            uploads.iter().position(after_key).unwrap_or(uploads.len())
        } else {
            uploads
                .iter()
                .position(|u| u.key == key_marker && u.upload_id == upload_id_marker)
                .map(|idx| idx + 1)
                .or_else(|| uploads.iter().position(after_key))
                .unwrap_or(uploads.len())
        };

        let mut page: Vec<_> = uploads.into_iter().skip(start).collect();
        let is_truncated = page.len() > max_uploads;
        page.truncate(max_uploads);
        let (next_key_marker, next_upload_id_marker) = match page.last() {
            Some(last) if is_truncated => (Some(last.key.clone()), Some(last.upload_id.clone())),
            _ => (None, None),
        };

        Ok(ListMultipartUploadsOutput {
            bucket: input.bucket,
            prefix,
            key_marker,
            upload_id_marker,
            max_uploads,
            is_truncated,
            next_key_marker,
            next_upload_id_marker,
            uploads: page,
        })
    }

    /// List the parts of an upload after `part_number_marker`.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, or `NoSuchUpload` when the upload is unknown or
    /// belongs to another key.
    pub fn list_parts(&self, input: ListPartsInput) -> S3ServiceResult<ListPartsOutput> {
        let b = self.state.get_bucket(&input.bucket)?;
        let upload = b
            .multipart_uploads
            .get(&input.upload_id)
            .filter(|u| u.key == input.key)
            .ok_or_else(|| S3ServiceError::NoSuchUpload {
                upload_id: input.upload_id.clone(),
            })?;

        let marker = input.part_number_marker.unwrap_or(0);
        let max_parts = self.page_size(input.max_parts);
        let mut parts: Vec<PartSummary> = upload
            .parts
            .range(marker.saturating_add(1)..)
            .map(|(_, p)| PartSummary {
                part_number: p.part_number,
                etag: p.etag.clone(),
                size: p.size(),
                last_modified: p.last_modified,
            })
            .collect();
        let is_truncated = parts.len() > max_parts;
        parts.truncate(max_parts);
        let next_part_number_marker = if is_truncated {
            parts.last().map(|p| p.part_number)
        } else {
            None
        };

        Ok(ListPartsOutput {
            bucket: input.bucket,
            key: input.key,
            upload_id: input.upload_id,
            part_number_marker: marker,
            next_part_number_marker,
            max_parts,
            is_truncated,
            parts,
            owner: upload.owner.clone(),
            storage_class: upload.storage_class.clone(),
        })
    }
}
