// Error handling module for the Ride Auth API
// Provides centralized error types and HTTP response conversion

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::auth::AuthError;

/// Main error type for the API
/// All handlers should return Result<T, ApiError>
#[derive(Debug)]
pub enum ApiError {
    /// Validation errors from request validation
    /// Maps to HTTP 400 Bad Request
    ValidationError(ValidationErrors),

    /// A single bad field, or a body that could not be read at all
    /// Maps to HTTP 400 Bad Request
    InvalidField { field: String, message: String },

    /// Duplicate resource conflict
    /// Maps to HTTP 409 Conflict
    Conflict { message: String },

    /// Authentication failures
    /// Maps to HTTP 401 Unauthorized
    Unauthorized(String),

    /// Database operation errors
    /// Maps to HTTP 500, details are only logged
    DatabaseError(String),

    /// Internal server errors
    /// Maps to HTTP 500, details are only logged
    InternalError(String),
}

/// Consistent error response structure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR", "UNAUTHORIZED")
    #[schema(example = "UNAUTHORIZED")]
    pub error_code: String,

    /// Human-readable error message
    #[schema(example = "Unauthorized")]
    pub message: String,

    /// Field-level validation errors, omitted when empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,

    /// RFC 3339 timestamp of when the error occurred
    pub timestamp: String,
}

/// A single failed field check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "full_name.first_name")]
    pub field: String,
    #[schema(example = "First Name must be at least 3 characters long")]
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let timestamp = Utc::now().to_rfc3339();

        match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);

                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error_code: "VALIDATION_ERROR".to_string(),
                        message: "Request validation failed".to_string(),
                        details: Some(flatten_validation_errors(errors)),
                        timestamp,
                    },
                )
            }
            ApiError::InvalidField { field, message } => {
                debug!("Invalid field {}: {}", field, message);

                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error_code: "VALIDATION_ERROR".to_string(),
                        message: "Request validation failed".to_string(),
                        details: Some(vec![FieldError {
                            field: field.clone(),
                            message: message.clone(),
                        }]),
                        timestamp,
                    },
                )
            }
            ApiError::Conflict { message } => {
                warn!("Conflict error: {}", message);

                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error_code: "CONFLICT".to_string(),
                        message: message.clone(),
                        details: None,
                        timestamp,
                    },
                )
            }
            ApiError::Unauthorized(message) => {
                warn!("Unauthorized access attempt: {}", message);

                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse {
                        error_code: "UNAUTHORIZED".to_string(),
                        message: message.clone(),
                        details: None,
                        timestamp,
                    },
                )
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {}", db_error);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error_code: "DATABASE_ERROR".to_string(),
                        message: "A database error occurred".to_string(),
                        details: None,
                        timestamp,
                    },
                )
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error_code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred".to_string(),
                        details: None,
                        timestamp,
                    },
                )
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) | ApiError::InvalidField { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Flatten nested validator output into `field.path: message` pairs,
/// sorted by field so responses are deterministic.
pub fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect_field_errors(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

fn collect_field_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                    out.push(FieldError {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_errors(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

/// Convert validator errors to ApiError
impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

/// Body extraction failures become validation errors on `body`
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match &rejection {
            JsonRejection::JsonDataError(_) => rejection.body_text(),
            JsonRejection::JsonSyntaxError(_) => "Malformed JSON body".to_string(),
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with `Content-Type: application/json`".to_string()
            }
            _ => rejection.body_text(),
        };

        ApiError::InvalidField {
            field: "body".to_string(),
            message,
        }
    }
}

/// Convert password/token layer errors to ApiError.
/// Every authentication failure is reported with the same message.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::RevokedToken
            | AuthError::WrongAccountKind => {
                debug!("Token rejected: {}", err);
                ApiError::Unauthorized("Unauthorized".to_string())
            }
            AuthError::EmailAlreadyExists => ApiError::Conflict {
                message: "Email already exists".to_string(),
            },
            AuthError::InvalidVehicle(message) => ApiError::InvalidField {
                field: "vehicle.vehicle_type".to_string(),
                message,
            },
            AuthError::DatabaseError(msg) => ApiError::DatabaseError(msg),
            AuthError::PasswordHashError(msg) | AuthError::TokenGenerationError(msg) => {
                ApiError::InternalError(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Inner {
        #[validate(length(min = 3, message = "too short"))]
        name: String,
    }

    #[derive(Debug, Validate)]
    struct Outer {
        #[validate(email(message = "Invalid Email"))]
        email: String,
        #[validate]
        inner: Inner,
        #[validate(range(min = 1))]
        count: i32,
    }

    #[test]
    fn test_flatten_nested_errors() {
        let outer = Outer {
            email: "nope".to_string(),
            inner: Inner { name: "ab".to_string() },
            count: 0,
        };
        let errors = outer.validate().unwrap_err();
        let flat = flatten_validation_errors(&errors);

        assert_eq!(flat.len(), 3);
        assert_eq!(flat[0].field, "count");
        assert!(flat[0].message.contains("range"));
        assert_eq!(
            flat[1],
            FieldError { field: "email".to_string(), message: "Invalid Email".to_string() }
        );
        assert_eq!(
            flat[2],
            FieldError { field: "inner.name".to_string(), message: "too short".to_string() }
        );
    }

    #[test]
    fn test_auth_errors_map_to_statuses() {
        let cases = [
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::MissingToken, StatusCode::UNAUTHORIZED),
            (AuthError::ExpiredToken, StatusCode::UNAUTHORIZED),
            (AuthError::RevokedToken, StatusCode::UNAUTHORIZED),
            (AuthError::WrongAccountKind, StatusCode::UNAUTHORIZED),
            (AuthError::EmailAlreadyExists, StatusCode::CONFLICT),
            (AuthError::InvalidVehicle("truck".into()), StatusCode::BAD_REQUEST),
            (AuthError::DatabaseError("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AuthError::PasswordHashError("bad".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AuthError::TokenGenerationError("bad".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (auth_error, status) in cases {
            assert_eq!(ApiError::from(auth_error).status_code(), status);
        }
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let (status, body) =
            ApiError::DatabaseError("password=hunter2 connection refused".into()).to_error_response();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.message.contains("hunter2"));
        assert!(body.details.is_none());
    }

    #[test]
    fn test_invalid_field_has_single_detail() {
        let (status, body) = ApiError::InvalidField {
            field: "body".into(),
            message: "Malformed JSON body".into(),
        }
        .to_error_response();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error_code, "VALIDATION_ERROR");
        assert_eq!(
            body.details,
            Some(vec![FieldError {
                field: "body".to_string(),
                message: "Malformed JSON body".to_string(),
            }])
        );
    }
}
