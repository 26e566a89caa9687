//! Error types for the AWSMock core.

/// Core error type for AWSMock infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// Invalid AWS account ID format.
    #[error("invalid AWS account ID: {0} (must be 12-digit numeric string)")]
    InvalidAccountId(String),

    /// A string could not be parsed as an ARN.
    #[error("invalid ARN: {0}")]
    InvalidArn(String),

    /// A pagination marker is unknown, already consumed, or belongs to a
    /// different listing.
    #[error("invalid pagination marker: {0}")]
    InvalidMarker(String),

    /// A requested page size is outside the accepted range.
    #[error("invalid page size {requested}: must be between 1 and {max}")]
    InvalidPageSize {
        /// The page size the caller asked for.
        requested: usize,
        /// The largest accepted page size.
        max: usize,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for AWSMock core operations.
pub type MockResult<T> = Result<T, MockError>;
