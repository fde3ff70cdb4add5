use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Domain error for user management.
///
/// Callers branch on the variant (and its structured fields) rather than on
/// a type hierarchy. Every variant carries the data needed to render a
/// precise message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    /// A required string field was blank or whitespace-only.
    #[error("{field} cannot be empty")]
    EmptyValue { field: &'static str },

    /// Name/last name outside the allowed length bounds after trimming.
    #[error(
        "{field} length must be between {min} and {max} characters. Current length: {actual}"
    )]
    InvalidLength {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    /// Email does not match the required `local@domain.tld` shape.
    #[error("Invalid email format: '{0}'")]
    InvalidEmailFormat(String),

    /// State constructed with a value outside the enumerated literals.
    #[error("Invalid user state: '{0}'")]
    InvalidState(String),

    #[error("User with ID '{0}' not found")]
    NotFound(String),

    #[error("User with email '{0}' already exists")]
    EmailAlreadyExists(String),

    /// Failure surfaced by the persistence layer, propagated unchanged.
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            UserError::EmptyValue { .. } => "EMPTY_VALUE_ERROR",
            UserError::InvalidLength { .. } => "INVALID_NAME_LENGTH",
            UserError::InvalidEmailFormat(_) => "INVALID_EMAIL_FORMAT",
            UserError::InvalidState(_) => "INVALID_USER_STATE",
            UserError::NotFound(_) => "USER_NOT_FOUND",
            UserError::EmailAlreadyExists(_) => "USER_EMAIL_ALREADY_EXISTS",
            UserError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// HTTP status mapping for the presentation layer.
    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::EmptyValue { .. }
            | UserError::InvalidLength { .. }
            | UserError::InvalidEmailFormat(_)
            | UserError::InvalidState(_) => StatusCode::BAD_REQUEST,
            UserError::NotFound(_) => StatusCode::NOT_FOUND,
            UserError::EmailAlreadyExists(_) => StatusCode::CONFLICT,
            UserError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Storage(err.to_string())
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            UserError::Storage(details) => {
                tracing::error!("Storage error: {}", details);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(json!({
                "error": {
                    "code": self.code(),
                    "message": message
                }
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            UserError::EmptyValue { field: "Name" }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            UserError::NotFound("abc".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            UserError::EmailAlreadyExists("a@b.c".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            UserError::Storage("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_length_error_message_carries_bounds() {
        let err = UserError::InvalidLength {
            field: "Name",
            min: 2,
            max: 50,
            actual: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("between 2 and 50"));
        assert!(msg.contains("Current length: 1"));
    }

    #[test]
    fn test_storage_error_message_is_masked_in_response() {
        let err = UserError::Storage("connection refused".into());
        assert_eq!(err.code(), "STORAGE_ERROR");
        // The display form keeps the detail for logs
        assert!(err.to_string().contains("connection refused"));
    }
}
