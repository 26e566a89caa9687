//! IAM error types.
//!
//! IAM errors travel as `<ErrorResponse>` documents carrying a fault type
//! (`Sender` for caller mistakes, `Receiver` for service failures), a code
//! and a message.

use std::fmt;

use awsmock_core::MockError;

/// Well-known IAM error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum IamErrorCode {
    /// Entity does not exist.
    NoSuchEntity,
    /// Entity with that name already exists.
    EntityAlreadyExists,
    /// Entity still has subordinate entities or attachments.
    DeleteConflict,
    /// A per-entity quota was reached.
    LimitExceeded,
    /// Policy document is not a JSON object.
    MalformedPolicyDocument,
    /// A parameter failed its constraints.
    ValidationError,
    /// A parameter value is not acceptable.
    InvalidInput,
    /// The `Action` is not recognized.
    InvalidAction,
    /// A required parameter is absent.
    MissingParameter,
    /// Unexpected failure inside the mock.
    ServiceFailure,
}

impl IamErrorCode {
    /// Returns the code string as it appears in error documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoSuchEntity => "NoSuchEntity",
            Self::EntityAlreadyExists => "EntityAlreadyExists",
            Self::DeleteConflict => "DeleteConflict",
            Self::LimitExceeded => "LimitExceeded",
            Self::MalformedPolicyDocument => "MalformedPolicyDocument",
            Self::ValidationError => "ValidationError",
            Self::InvalidInput => "InvalidInput",
            Self::InvalidAction => "InvalidAction",
            Self::MissingParameter => "MissingParameter",
            Self::ServiceFailure => "ServiceFailure",
        }
    }

    /// Returns the HTTP status IAM answers with for this code.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::NoSuchEntity => http::StatusCode::NOT_FOUND,
            Self::EntityAlreadyExists | Self::DeleteConflict | Self::LimitExceeded => {
                http::StatusCode::CONFLICT
            }
            Self::ServiceFailure => http::StatusCode::INTERNAL_SERVER_ERROR,
            _ => http::StatusCode::BAD_REQUEST,
        }
    }

    /// Fault type reported in the `<Type>` element.
    #[must_use]
    pub fn fault(&self) -> &'static str {
        match self {
            Self::ServiceFailure => "Receiver",
            _ => "Sender",
        }
    }
}

impl fmt::Display for IamErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An IAM error response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct IamError {
    /// The error code.
    pub code: IamErrorCode,
    /// A human-readable error message.
    pub message: String,
}

impl IamError {
    /// Create an error with a custom message.
    #[must_use]
    pub fn with_message(code: IamErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// HTTP status of this error.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        self.code.status_code()
    }

    // -- Convenience constructors --

    /// The named entity does not exist.
    #[must_use]
    pub fn no_such_entity(kind: &str, name: &str) -> Self {
        Self::with_message(
            IamErrorCode::NoSuchEntity,
            format!("The {kind} with name {name} cannot be found."),
        )
    }

    /// An entity with the same name exists.
    #[must_use]
    pub fn already_exists(kind: &str, name: &str) -> Self {
        Self::with_message(
            IamErrorCode::EntityAlreadyExists,
            format!("{kind} with name {name} already exists."),
        )
    }

    /// The entity cannot be deleted yet.
    #[must_use]
    pub fn delete_conflict(message: impl Into<String>) -> Self {
        Self::with_message(IamErrorCode::DeleteConflict, message)
    }

    /// A quota was reached.
    #[must_use]
    pub fn limit_exceeded(message: impl Into<String>) -> Self {
        Self::with_message(IamErrorCode::LimitExceeded, message)
    }

    /// A parameter failed validation.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(IamErrorCode::ValidationError, message)
    }

    /// A required Query parameter is absent.
    #[must_use]
    pub fn missing_parameter(name: &str) -> Self {
        Self::with_message(
            IamErrorCode::MissingParameter,
            format!("The request must contain the parameter {name}"),
        )
    }

    /// Internal failure.
    #[must_use]
    pub fn service_failure(message: impl Into<String>) -> Self {
        Self::with_message(IamErrorCode::ServiceFailure, message)
    }
}

impl From<MockError> for IamError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::InvalidPageSize { .. } => Self::validation(err.to_string()),
            MockError::InvalidMarker(_) | MockError::InvalidAccountId(_) | MockError::InvalidArn(_) => {
                Self::with_message(IamErrorCode::InvalidInput, err.to_string())
            }
            MockError::Config(_) | MockError::Internal(_) => Self::service_failure(err.to_string()),
        }
    }
}

/// Create an `IamError` from an error code name and message.
///
/// # Examples
///
/// ```
/// use awsmock_iam::iam_error;
/// use awsmock_iam::error::IamErrorCode;
///
/// let err = iam_error!(InvalidInput, "bad value");
/// assert_eq!(err.code, IamErrorCode::InvalidInput);
/// assert_eq!(err.message, "bad value");
/// ```
#[macro_export]
macro_rules! iam_error {
    ($code:ident, $msg:expr) => {
        $crate::error::IamError::with_message($crate::error::IamErrorCode::$code, $msg)
    };
}

/// Convenience result type for IAM operations.
pub type IamResult<T> = Result<T, IamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_map_codes_to_status() {
        assert_eq!(IamErrorCode::NoSuchEntity.status_code(), http::StatusCode::NOT_FOUND);
        assert_eq!(IamErrorCode::DeleteConflict.status_code(), http::StatusCode::CONFLICT);
        assert_eq!(IamErrorCode::InvalidAction.status_code(), http::StatusCode::BAD_REQUEST);
        assert_eq!(
            IamErrorCode::ServiceFailure.status_code(),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_should_report_fault_type() {
        assert_eq!(IamErrorCode::ValidationError.fault(), "Sender");
        assert_eq!(IamErrorCode::ServiceFailure.fault(), "Receiver");
    }

    #[test]
    fn test_should_convert_pagination_errors() {
        let err: IamError = MockError::InvalidPageSize {
            requested: 0,
            max: 1000,
        }
        .into();
        assert_eq!(err.code, IamErrorCode::ValidationError);

        let err: IamError = MockError::InvalidMarker("m".to_owned()).into();
        assert_eq!(err.code, IamErrorCode::InvalidInput);
    }

    #[test]
    fn test_should_format_not_found_message() {
        let err = IamError::no_such_entity("user", "alice");
        assert_eq!(err.to_string(), "NoSuchEntity: The user with name alice cannot be found.");
    }
}
