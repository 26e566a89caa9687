//! In-memory S3 mock for tests.
//!
//! Buckets, objects with full version history, ACLs, tagging, bucket
//! configurations and multipart uploads, all held in process memory and
//! driven through synchronous methods on [`MockS3`].
//!
//! # Architecture
//!
//! ```text
//! MockS3Registry (one MockS3 per account/region)
//!        |
//!        v
//! MockS3 (operation handlers in `ops`)
//!        |
//!        v
//!   S3ServiceState (buckets, shared global name index)
//!        |
//!        v
//!   S3Bucket -> ObjectStore (key -> versions, newest first)
//! ```
//!
//! # Example
//!
//! ```
//! use awsmock_s3::{MockS3, S3Config};
//! use awsmock_s3::model::{CreateBucketInput, GetObjectInput, PutObjectInput};
//!
//! let s3 = MockS3::new(S3Config::default());
//! s3.create_bucket(CreateBucketInput {
//!     bucket: "docs".to_owned(),
//!     ..CreateBucketInput::default()
//! })?;
//! s3.put_object(PutObjectInput {
//!     bucket: "docs".to_owned(),
//!     key: "readme.txt".to_owned(),
//!     body: bytes::Bytes::from_static(b"hello"),
//!     ..PutObjectInput::default()
//! })?;
//!
//! let object = s3.get_object(GetObjectInput {
//!     bucket: "docs".to_owned(),
//!     key: "readme.txt".to_owned(),
//!     ..GetObjectInput::default()
//! })?;
//! assert_eq!(&object.body[..], b"hello");
//! # Ok::<(), awsmock_s3::S3ServiceError>(())
//! ```

pub mod acl;
pub mod config;
pub mod error;
pub mod model;
mod ops;
pub mod provider;
pub mod state;
pub mod utils;
pub mod validation;

pub use config::S3Config;
pub use error::{S3ErrorCode, S3ServiceError, S3ServiceResult};
pub use ops::multipart::MAX_PART_NUMBER;
pub use ops::object::MAX_DELETE_OBJECTS;
pub use provider::{MockS3, MockS3Registry};
