//! S3-specific error types.
//!
//! [`S3ServiceError`] carries one variant per failure the mock can produce.
//! Each variant maps to an [`S3ErrorCode`], which knows the documented code
//! string and the HTTP status S3 answers with.
//!
//! # Usage
//!
//! ```
//! use awsmock_s3::error::{S3ErrorCode, S3ServiceError};
//!
//! let err = S3ServiceError::NoSuchBucket {
//!     bucket: "my-bucket".to_owned(),
//! };
//! assert_eq!(err.code(), S3ErrorCode::NoSuchBucket);
//! assert_eq!(err.status_code(), http::StatusCode::NOT_FOUND);
//! ```

use std::fmt;

use awsmock_core::MockError;

/// Documented S3 error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum S3ErrorCode {
    /// Bucket does not exist.
    NoSuchBucket,
    /// Bucket name is owned by another account.
    BucketAlreadyExists,
    /// Bucket name is already owned by the caller.
    BucketAlreadyOwnedByYou,
    /// Bucket still holds objects, versions, or uploads.
    BucketNotEmpty,
    /// Key does not exist.
    NoSuchKey,
    /// Version does not exist.
    NoSuchVersion,
    /// Multipart upload does not exist.
    NoSuchUpload,
    /// Completed parts were not ascending.
    InvalidPartOrder,
    /// A completed part is missing or its ETag differs.
    InvalidPart,
    /// A non-final part is below the minimum part size.
    EntityTooSmall,
    /// Bucket name breaks the naming rules.
    InvalidBucketName,
    /// Generic bad argument.
    InvalidArgument,
    /// Request is invalid in its combination of parameters.
    InvalidRequest,
    /// `Range` cannot be satisfied.
    InvalidRange,
    /// Tag set breaks the tagging rules.
    InvalidTag,
    /// Storage class is unknown.
    InvalidStorageClass,
    /// Request document is not well formed.
    MalformedXML,
    /// Bucket policy is not valid JSON.
    MalformedPolicy,
    /// Access control policy is incomplete.
    MalformedACLError,
    /// Method not allowed on the addressed version.
    MethodNotAllowed,
    /// A conditional header did not hold.
    PreconditionFailed,
    /// Object not modified since the given time or ETag.
    NotModified,
    /// `Content-MD5` is not valid base64 MD5.
    InvalidDigest,
    /// `Content-MD5` does not match the body.
    BadDigest,
    /// Key is longer than 1024 bytes.
    KeyTooLongError,
    /// User metadata exceeds 2 KiB.
    MetadataTooLarge,
    /// Bucket has no CORS configuration.
    NoSuchCORSConfiguration,
    /// Bucket has no tag set.
    NoSuchTagSet,
    /// Bucket has no lifecycle configuration.
    NoSuchLifecycleConfiguration,
    /// Bucket has no policy.
    NoSuchBucketPolicy,
    /// Bucket has no website configuration.
    NoSuchWebsiteConfiguration,
    /// Unexpected failure inside the mock.
    InternalError,
}

impl S3ErrorCode {
    /// Returns the code string as it appears in S3 error documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoSuchBucket => "NoSuchBucket",
            Self::BucketAlreadyExists => "BucketAlreadyExists",
            Self::BucketAlreadyOwnedByYou => "BucketAlreadyOwnedByYou",
            Self::BucketNotEmpty => "BucketNotEmpty",
            Self::NoSuchKey => "NoSuchKey",
            Self::NoSuchVersion => "NoSuchVersion",
            Self::NoSuchUpload => "NoSuchUpload",
            Self::InvalidPartOrder => "InvalidPartOrder",
            Self::InvalidPart => "InvalidPart",
            Self::EntityTooSmall => "EntityTooSmall",
            Self::InvalidBucketName => "InvalidBucketName",
            Self::InvalidArgument => "InvalidArgument",
            Self::InvalidRequest => "InvalidRequest",
            Self::InvalidRange => "InvalidRange",
            Self::InvalidTag => "InvalidTag",
            Self::InvalidStorageClass => "InvalidStorageClass",
            Self::MalformedXML => "MalformedXML",
            Self::MalformedPolicy => "MalformedPolicy",
            Self::MalformedACLError => "MalformedACLError",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::PreconditionFailed => "PreconditionFailed",
            Self::NotModified => "NotModified",
            Self::InvalidDigest => "InvalidDigest",
            Self::BadDigest => "BadDigest",
            Self::KeyTooLongError => "KeyTooLongError",
            Self::MetadataTooLarge => "MetadataTooLarge",
            Self::NoSuchCORSConfiguration => "NoSuchCORSConfiguration",
            Self::NoSuchTagSet => "NoSuchTagSet",
            Self::NoSuchLifecycleConfiguration => "NoSuchLifecycleConfiguration",
            Self::NoSuchBucketPolicy => "NoSuchBucketPolicy",
            Self::NoSuchWebsiteConfiguration => "NoSuchWebsiteConfiguration",
            Self::InternalError => "InternalError",
        }
    }

    /// Returns the HTTP status S3 answers with for this code.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::NoSuchBucket
            | Self::NoSuchKey
            | Self::NoSuchVersion
            | Self::NoSuchUpload
            | Self::NoSuchCORSConfiguration
            | Self::NoSuchTagSet
            | Self::NoSuchLifecycleConfiguration
            | Self::NoSuchBucketPolicy
            | Self::NoSuchWebsiteConfiguration => http::StatusCode::NOT_FOUND,
            Self::BucketAlreadyExists | Self::BucketAlreadyOwnedByYou | Self::BucketNotEmpty => {
                http::StatusCode::CONFLICT
            }
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::PreconditionFailed => http::StatusCode::PRECONDITION_FAILED,
            Self::NotModified => http::StatusCode::NOT_MODIFIED,
            Self::InvalidRange => http::StatusCode::RANGE_NOT_SATISFIABLE,
            Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
            _ => http::StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for S3ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// S3 service error type.
#[derive(Debug, thiserror::Error)]
pub enum S3ServiceError {
    // -----------------------------------------------------------------------
    // Bucket errors
    // -----------------------------------------------------------------------
    /// The specified bucket does not exist.
    #[error("The specified bucket does not exist: {bucket}")]
    NoSuchBucket {
        /// The bucket name that was not found.
        bucket: String,
    },

    /// The requested bucket name is not available (owned by another account).
    #[error("The requested bucket name is not available: {bucket}")]
    BucketAlreadyExists {
        /// The bucket name that already exists.
        bucket: String,
    },

    /// The bucket already exists and is owned by you.
    #[error(
        "Your previous request to create the named bucket succeeded and you already own it: {bucket}"
    )]
    BucketAlreadyOwnedByYou {
        /// The bucket name that already exists.
        bucket: String,
    },

    /// The bucket is not empty and cannot be deleted.
    #[error("The bucket you tried to delete is not empty: {bucket}")]
    BucketNotEmpty {
        /// The bucket name that is not empty.
        bucket: String,
    },

    // -----------------------------------------------------------------------
    // Object / key errors
    // -----------------------------------------------------------------------
    /// The specified key does not exist.
    #[error("The specified key does not exist: {key}")]
    NoSuchKey {
        /// The key that was not found.
        key: String,
    },

    /// The specified version does not exist.
    #[error("The specified version does not exist: key={key}, version_id={version_id}")]
    NoSuchVersion {
        /// The key for the version.
        key: String,
        /// The version ID that was not found.
        version_id: String,
    },

    // -----------------------------------------------------------------------
    // Multipart upload errors
    // -----------------------------------------------------------------------
    /// The specified multipart upload does not exist.
    #[error("The specified upload does not exist: {upload_id}")]
    NoSuchUpload {
        /// The upload ID that was not found.
        upload_id: String,
    },

    /// The list of parts was not in ascending order.
    #[error("The list of parts was not in ascending order")]
    InvalidPartOrder,

    /// One or more of the specified parts could not be found.
    #[error("One or more of the specified parts could not be found: part {part_number}")]
    InvalidPart {
        /// The first offending part number.
        part_number: u32,
    },

    /// A proposed upload part is smaller than the minimum allowed size.
    #[error("Your proposed upload is smaller than the minimum allowed object size: part {part_number}")]
    EntityTooSmall {
        /// The first undersized part number.
        part_number: u32,
    },

    // -----------------------------------------------------------------------
    // Validation errors
    // -----------------------------------------------------------------------
    /// The specified bucket name is not valid.
    #[error("Invalid bucket name: {name}: {reason}")]
    InvalidBucketName {
        /// The invalid bucket name.
        name: String,
        /// The reason for the error.
        reason: String,
    },

    /// An argument provided is invalid.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    /// The request combines parameters in an unsupported way.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of the problem.
        message: String,
    },

    /// The requested range is not satisfiable.
    #[error("The requested range is not satisfiable")]
    InvalidRange,

    /// A tag key or value is invalid.
    #[error("Invalid tag: {message}")]
    InvalidTag {
        /// Description of the tag error.
        message: String,
    },

    /// The storage class is not one S3 knows.
    #[error("The storage class you specified is not valid: {storage_class}")]
    InvalidStorageClass {
        /// The rejected storage class.
        storage_class: String,
    },

    /// The request body is malformed.
    #[error("The XML you provided was not well-formed or did not validate: {message}")]
    MalformedXml {
        /// Description of the problem.
        message: String,
    },

    /// The bucket policy is not a JSON document.
    #[error("Policies must be valid JSON and the first byte must be '{{'")]
    MalformedPolicy,

    /// The access control policy is incomplete.
    #[error("The ACL you provided was not well-formed: {message}")]
    MalformedAcl {
        /// Description of the problem.
        message: String,
    },

    /// The HTTP method is not allowed against this resource.
    #[error("The specified method is not allowed against this resource")]
    MethodNotAllowed,

    // -----------------------------------------------------------------------
    // Conditional request errors
    // -----------------------------------------------------------------------
    /// A precondition specified in the request was not met.
    #[error("At least one of the preconditions you specified did not hold")]
    PreconditionFailed,

    /// The object was not modified.
    #[error("Not Modified")]
    NotModified,

    // -----------------------------------------------------------------------
    // Digest / content errors
    // -----------------------------------------------------------------------
    /// The Content-MD5 you specified is invalid.
    #[error("The Content-MD5 you specified is not valid")]
    InvalidDigest,

    /// The Content-MD5 you specified did not match what we received.
    #[error("The Content-MD5 you specified did not match what we received")]
    BadDigest,

    /// The key is too long.
    #[error("Your key is too long")]
    KeyTooLong,

    /// User metadata is larger than 2 KiB.
    #[error("Your metadata headers exceed the maximum allowed metadata size: {size} bytes")]
    MetadataTooLarge {
        /// The measured metadata size.
        size: usize,
    },

    // -----------------------------------------------------------------------
    // Configuration-not-found errors
    // -----------------------------------------------------------------------
    /// The CORS configuration does not exist.
    #[error("The CORS configuration does not exist")]
    NoSuchCorsConfiguration,

    /// The tag set does not exist.
    #[error("The TagSet does not exist")]
    NoSuchTagSet,

    /// The lifecycle configuration does not exist.
    #[error("The lifecycle configuration does not exist")]
    NoSuchLifecycleConfiguration,

    /// The bucket policy does not exist.
    #[error("The bucket policy does not exist")]
    NoSuchBucketPolicy,

    /// The website configuration does not exist.
    #[error("The specified bucket does not have a website configuration")]
    NoSuchWebsiteConfiguration,

    // -----------------------------------------------------------------------
    // Internal / catch-all
    // -----------------------------------------------------------------------
    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl S3ServiceError {
    /// The S3 error code for this failure.
    #[must_use]
    pub fn code(&self) -> S3ErrorCode {
        match self {
            Self::NoSuchBucket { .. } => S3ErrorCode::NoSuchBucket,
            Self::BucketAlreadyExists { .. } => S3ErrorCode::BucketAlreadyExists,
            Self::BucketAlreadyOwnedByYou { .. } => S3ErrorCode::BucketAlreadyOwnedByYou,
            Self::BucketNotEmpty { .. } => S3ErrorCode::BucketNotEmpty,
            Self::NoSuchKey { .. } => S3ErrorCode::NoSuchKey,
            Self::NoSuchVersion { .. } => S3ErrorCode::NoSuchVersion,
            Self::NoSuchUpload { .. } => S3ErrorCode::NoSuchUpload,
            Self::InvalidPartOrder => S3ErrorCode::InvalidPartOrder,
            Self::InvalidPart { .. } => S3ErrorCode::InvalidPart,
            Self::EntityTooSmall { .. } => S3ErrorCode::EntityTooSmall,
            Self::InvalidBucketName { .. } => S3ErrorCode::InvalidBucketName,
            Self::InvalidArgument { .. } => S3ErrorCode::InvalidArgument,
            Self::InvalidRequest { .. } => S3ErrorCode::InvalidRequest,
            Self::InvalidRange => S3ErrorCode::InvalidRange,
            Self::InvalidTag { .. } => S3ErrorCode::InvalidTag,
            Self::InvalidStorageClass { .. } => S3ErrorCode::InvalidStorageClass,
            Self::MalformedXml { .. } => S3ErrorCode::MalformedXML,
            Self::MalformedPolicy => S3ErrorCode::MalformedPolicy,
            Self::MalformedAcl { .. } => S3ErrorCode::MalformedACLError,
            Self::MethodNotAllowed => S3ErrorCode::MethodNotAllowed,
            Self::PreconditionFailed => S3ErrorCode::PreconditionFailed,
            Self::NotModified => S3ErrorCode::NotModified,
            Self::InvalidDigest => S3ErrorCode::InvalidDigest,
            Self::BadDigest => S3ErrorCode::BadDigest,
            Self::KeyTooLong => S3ErrorCode::KeyTooLongError,
            Self::MetadataTooLarge { .. } => S3ErrorCode::MetadataTooLarge,
            Self::NoSuchCorsConfiguration => S3ErrorCode::NoSuchCORSConfiguration,
            Self::NoSuchTagSet => S3ErrorCode::NoSuchTagSet,
            Self::NoSuchLifecycleConfiguration => S3ErrorCode::NoSuchLifecycleConfiguration,
            Self::NoSuchBucketPolicy => S3ErrorCode::NoSuchBucketPolicy,
            Self::NoSuchWebsiteConfiguration => S3ErrorCode::NoSuchWebsiteConfiguration,
            Self::Internal(_) => S3ErrorCode::InternalError,
        }
    }

    /// The HTTP status S3 answers with for this failure.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        self.code().status_code()
    }

    pub(crate) fn malformed_xml(message: impl Into<String>) -> Self {
        Self::MalformedXml {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

impl From<MockError> for S3ServiceError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::InvalidMarker(_)
            | MockError::InvalidPageSize { .. }
            | MockError::InvalidAccountId(_)
            | MockError::InvalidArn(_) => Self::invalid_argument(err.to_string()),
            MockError::Config(msg) => Self::Internal(anyhow::anyhow!(msg)),
            MockError::Internal(e) => Self::Internal(e),
        }
    }
}

/// Convenience result type for S3 service operations.
pub type S3ServiceResult<T> = Result<T, S3ServiceError>;
