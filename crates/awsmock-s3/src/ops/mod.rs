//! S3 operation handlers.
//!
//! Each submodule adds one category of operations as inherent methods on
//! [`crate::provider::MockS3`]. All handlers are synchronous and return
//! [`crate::error::S3ServiceResult`].

pub mod bucket;
pub mod bucket_config;
pub mod list;
pub mod multipart;
pub mod object;
pub mod object_config;
