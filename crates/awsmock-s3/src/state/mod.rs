//! S3 service state management.
//!
//! - [`S3ServiceState`] -- buckets of one account/region scope
//! - [`S3Bucket`] -- per-bucket state (objects, versioning, configs)
//! - [`ObjectStore`] -- key-level storage with version history
//! - [`S3Object`] / [`S3DeleteMarker`] / [`ObjectMetadata`] -- object types
//! - [`MultipartUpload`] / [`UploadPart`] -- multipart upload tracking
//!
//! # Thread Safety
//!
//! All types are `Send + Sync`. Concurrent access is handled via:
//!
//! - `DashMap` for the bucket table, the global name index and the
//!   multipart upload table
//! - `parking_lot::RwLock` for per-bucket configuration fields and the object
//!   store

pub(crate) mod bucket;
pub(crate) mod keystore;
pub(crate) mod multipart;
pub(crate) mod object;
pub(crate) mod service;

pub use bucket::{RequestPayer, S3Bucket, VersioningStatus};
pub use keystore::{DeleteOutcome, ListResult, ObjectStore, VersionListEntry, VersionListResult};
pub use multipart::{MultipartUpload, UploadPart};
pub use object::{ObjectMetadata, ObjectVersion, S3DeleteMarker, S3Object};
pub use service::{GlobalBucketIndex, S3ServiceState};
