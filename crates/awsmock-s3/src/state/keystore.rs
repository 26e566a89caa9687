//! Object key storage with versioning support.
//!
//! [`ObjectStore`] keeps every key's history as a list of versions, newest
//! first, inside a `BTreeMap` so keys are always sorted for listings. The
//! bucket's [`VersioningStatus`] is passed into each mutation and decides
//! how the history changes:
//!
//! | Status | `PUT` | `DELETE` without version |
//! |--------|-------|--------------------------|
//! | `Disabled` | replace the `null` version | remove the `null` version |
//! | `Enabled` | prepend a fresh version | prepend a delete marker |
//! | `Suspended` | replace the `null` version, keep the rest | replace the `null` version with a `null` marker |
//!
//! A `DELETE` that names a version always removes exactly that entry.

use std::collections::BTreeMap;
use std::ops::Bound;

use chrono::Utc;
use tracing::debug;

use super::bucket::VersioningStatus;
use super::object::{ObjectVersion, S3DeleteMarker, S3Object};
use crate::acl::Owner;
use crate::utils::{NULL_VERSION_ID, generate_version_id};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// What a `DELETE` did to a key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteOutcome {
    /// Version ID of the created marker or the removed version.
    pub version_id: Option<String>,
    /// Whether a delete marker was created or removed.
    pub delete_marker: bool,
}

/// Result of a `ListObjects` operation.
#[derive(Debug, Clone, Default)]
pub struct ListResult {
    /// The current objects that match the listing criteria.
    pub objects: Vec<S3Object>,
    /// Common prefixes when a delimiter is used.
    pub common_prefixes: Vec<String>,
    /// Whether more keys are available.
    pub is_truncated: bool,
    /// Marker for the next page (last key or prefix returned).
    pub next_marker: Option<String>,
}

/// Result of a `ListObjectVersions` operation.
#[derive(Debug, Clone, Default)]
pub struct VersionListResult {
    /// Object versions and delete markers, newest first per key.
    pub versions: Vec<VersionListEntry>,
    /// Common prefixes when a delimiter is used.
    pub common_prefixes: Vec<String>,
    /// Whether the result is truncated.
    pub is_truncated: bool,
    /// The key marker for the next page.
    pub next_key_marker: Option<String>,
    /// The version-id marker for the next page.
    pub next_version_id_marker: Option<String>,
}

/// A single entry in a version listing, augmented with `is_latest`.
#[derive(Debug, Clone)]
pub struct VersionListEntry {
    /// The underlying object version or delete marker.
    pub version: ObjectVersion,
    /// Whether this is the latest version for its key.
    pub is_latest: bool,
}

// ---------------------------------------------------------------------------
// ObjectStore
// ---------------------------------------------------------------------------

/// Sorted map of key to version history (newest first).
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: BTreeMap<String, Vec<ObjectVersion>>,
}

impl ObjectStore {
    /// Store an object and return the version ID it was given.
    pub fn put(&mut self, mut object: S3Object, status: VersioningStatus) -> String {
        let versions = self.objects.entry(object.key.clone()).or_default();
        match status {
            VersioningStatus::Enabled => object.version_id = generate_version_id(),
            VersioningStatus::Disabled | VersioningStatus::Suspended => {
                object.version_id = NULL_VERSION_ID.to_owned();
                versions.retain(|v| !v.is_null_version());
            }
        }
        let version_id = object.version_id.clone();
        debug!(key = %object.key, version_id = %version_id, ?status, "storing object");
        versions.insert(0, ObjectVersion::Object(Box::new(object)));
        version_id
    }

    /// Delete the current object of a key according to the versioning status.
    pub fn delete(&mut self, key: &str, status: VersioningStatus, owner: &Owner) -> DeleteOutcome {
        let marker_id = match status {
            VersioningStatus::Disabled => {
                self.objects.remove(key);
                return DeleteOutcome::default();
            }
            VersioningStatus::Enabled => generate_version_id(),
            VersioningStatus::Suspended => NULL_VERSION_ID.to_owned(),
        };

        let versions = self.objects.entry(key.to_owned()).or_default();
        if status == VersioningStatus::Suspended {
            versions.retain(|v| !v.is_null_version());
        }
        versions.insert(
            0,
            ObjectVersion::DeleteMarker(S3DeleteMarker {
                key: key.to_owned(),
                version_id: marker_id.clone(),
                last_modified: Utc::now(),
                owner: owner.clone(),
            }),
        );
        debug!(key, version_id = %marker_id, "inserted delete marker");

        DeleteOutcome {
            version_id: Some(marker_id),
            delete_marker: true,
        }
    }

    /// Remove a specific version (object or delete marker) entirely.
    pub fn delete_version(&mut self, key: &str, version_id: &str) -> Option<ObjectVersion> {
        let versions = self.objects.get_mut(key)?;
        let idx = versions.iter().position(|v| v.version_id() == version_id)?;
        let removed = versions.remove(idx);
        if versions.is_empty() {
            self.objects.remove(key);
        }
        debug!(key, version_id, "removed version");
        Some(removed)
    }

    /// Newest entry of a key, which may be a delete marker.
    #[must_use]
    pub fn latest(&self, key: &str) -> Option<&ObjectVersion> {
        self.objects.get(key).and_then(|v| v.first())
    }

    /// Current object of a key: `None` when absent or hidden by a marker.
    #[must_use]
    pub fn current(&self, key: &str) -> Option<&S3Object> {
        self.latest(key).and_then(ObjectVersion::as_object)
    }

    /// Current object of a key, mutably.
    pub fn current_mut(&mut self, key: &str) -> Option<&mut S3Object> {
        self.objects
            .get_mut(key)
            .and_then(|v| v.first_mut())
            .and_then(ObjectVersion::as_object_mut)
    }

    /// A specific version of a key.
    #[must_use]
    pub fn version(&self, key: &str, version_id: &str) -> Option<&ObjectVersion> {
        self.objects
            .get(key)?
            .iter()
            .find(|v| v.version_id() == version_id)
    }

    /// A specific version of a key, mutably.
    pub fn version_mut(&mut self, key: &str, version_id: &str) -> Option<&mut ObjectVersion> {
        self.objects
            .get_mut(key)?
            .iter_mut()
            .find(|v| v.version_id() == version_id)
    }

    /// Number of keys with at least one entry.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.objects.len()
    }

    /// Whether no key holds any version or delete marker.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Drop every key.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    fn keys_after<'a>(
        &'a self,
        marker: &'a str,
        inclusive: bool,
    ) -> impl Iterator<Item = (&'a String, &'a Vec<ObjectVersion>)> {
        let lower = match (marker.is_empty(), inclusive) {
            (true, _) => Bound::Unbounded,
            (false, true) => Bound::Included(marker),
            (false, false) => Bound::Excluded(marker),
        };
        self.objects.range::<str, _>((lower, Bound::Unbounded))
    }

    /// List current objects after `marker`, grouping by `delimiter`.
    ///
    /// Each common prefix counts toward `max_keys` like a key does.
    #[must_use]
    pub fn list_objects(
        &self,
        prefix: &str,
        delimiter: &str,
        marker: &str,
        max_keys: usize,
    ) -> ListResult {
        let mut result = ListResult::default();
        if max_keys == 0 {
            return result;
        }
        let mut last: Option<String> = None;
        let mut count = 0usize;

        for (key, versions) in self.keys_after(marker, false) {
            if !key.starts_with(prefix) {
                continue;
            }
            let Some(object) = versions.first().and_then(ObjectVersion::as_object) else {
                continue;
            };

            match common_prefix(key, prefix, delimiter) {
                Some(cp) => {
                    if result.common_prefixes.last() == Some(&cp)
                        || (!marker.is_empty() && cp.as_str() <= marker)
                    {
                        continue;
                    }
                    if count >= max_keys {
                        result.is_truncated = true;
                        break;
                    }
                    result.common_prefixes.push(cp.clone());
                    last = Some(cp);
                }
                None => {
                    if count >= max_keys {
                        result.is_truncated = true;
                        break;
                    }
                    result.objects.push(object.clone());
                    last = Some(key.clone());
                }
            }
            count += 1;
        }

        if result.is_truncated {
            result.next_marker = last;
        }
        result
    }

    /// List versions and delete markers after (`key_marker`,
    /// `version_id_marker`), grouping by `delimiter`.
    #[must_use]
    pub fn list_object_versions(
        &self,
        prefix: &str,
        delimiter: &str,
        key_marker: &str,
        version_id_marker: &str,
        max_keys: usize,
    ) -> VersionListResult {
        let mut result = VersionListResult::default();
        if max_keys == 0 {
            return result;
        }
        let mut last: Option<(String, Option<String>)> = None;
        let mut count = 0usize;

        'keys: for (key, versions) in self.keys_after(key_marker, !version_id_marker.is_empty()) {
            if !key.starts_with(prefix) {
                continue;
            }

            if let Some(cp) = common_prefix(key, prefix, delimiter) {
                if result.common_prefixes.last() == Some(&cp)
                    || (!key_marker.is_empty() && cp.as_str() <= key_marker)
                {
                    continue;
                }
                if count >= max_keys {
                    result.is_truncated = true;
                    break;
                }
                result.common_prefixes.push(cp.clone());
                last = Some((cp, None));
                count += 1;
                continue;
            }

            let skip = if key.as_str() == key_marker {
                versions
                    .iter()
                    .position(|v| v.version_id() == version_id_marker)
                    .map_or(versions.len(), |idx| idx + 1)
            } else {
                0
            };

            for (idx, version) in versions.iter().enumerate().skip(skip) {
                if count >= max_keys {
                    result.is_truncated = true;
                    break 'keys;
                }
                result.versions.push(VersionListEntry {
                    version: version.clone(),
                    is_latest: idx == 0,
                });
                last = Some((key.clone(), Some(version.version_id().to_owned())));
                count += 1;
            }
        }

        if result.is_truncated {
            if let Some((key, version_id)) = last {
                result.next_key_marker = Some(key);
                result.next_version_id_marker = version_id;
            }
        }
        result
    }
}

/// Common prefix of `key` under `prefix` and `delimiter`, if the key rolls up.
fn common_prefix(key: &str, prefix: &str, delimiter: &str) -> Option<String> {
    if delimiter.is_empty() {
        return None;
    }
    let rest = &key[prefix.len()..];
    rest.find(delimiter)
        .map(|pos| format!("{prefix}{}{delimiter}", &rest[..pos]))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
