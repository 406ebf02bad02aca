/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers return `Result<T, ApiError>` which converts to the appropriate
/// status code and a JSON body of the form `{error, message, details?}`.
///
/// Every rejected path maps to a distinct, documented status:
///
/// - `Unauthenticated` → 401 with a `WWW-Authenticate: Bearer` challenge
/// - `Conflict` (duplicate username/email) → 400
/// - `InvalidCredential` (wrong old password) → 400
/// - `Forbidden` (authenticated non-owner) → 403
/// - `NotFound` → 404
/// - `Validation` → 422
/// - `Internal` → 500, details logged but never echoed to the client
///
/// Secrets — passwords, hashes, the signing key — never appear in any
/// message.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use taskdeck_shared::auth::{ownership::OwnershipError, password::PasswordError, token::TokenError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Missing, invalid or expired credentials (401)
    Unauthenticated(String),

    /// Duplicate username or email (400)
    Conflict(String),

    /// Supplied credential failed verification, e.g. wrong old password (400)
    InvalidCredential(String),

    /// Authenticated but not the owner of the resource (403)
    Forbidden(String),

    /// Resource absent (404)
    NotFound(String),

    /// Request shape failed validation (422)
    Validation(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    Internal(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g. "conflict", "unauthenticated")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InvalidCredential(msg) => write!(f, "Invalid credential: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 401 carries the bearer challenge on top of the standard body
        if let ApiError::Unauthenticated(message) = &self {
            let body = Json(ErrorResponse {
                error: "unauthenticated".to_string(),
                message: message.clone(),
                details: None,
            });

            let mut response = (StatusCode::UNAUTHORIZED, body).into_response();
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
            return response;
        }

        let (status, error_code, message, details) = match self {
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, "unauthenticated", msg, None),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, "conflict", msg, None),
            ApiError::InvalidCredential(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_credential", msg, None)
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Unique-constraint violations on the users table mean a registration or
/// profile update lost the uniqueness race; the insert failure is the
/// authoritative conflict signal, never a crash.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("username") || constraint.contains("email") {
                        return ApiError::Conflict(
                            "Username or email already registered".to_string(),
                        );
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert ownership check failures to API errors
impl From<OwnershipError> for ApiError {
    fn from(err: OwnershipError) -> Self {
        match err {
            OwnershipError::NotOwner => {
                ApiError::Forbidden("Not authorized to access this resource".to_string())
            }
        }
    }
}

/// Convert password hashing errors to API errors
///
/// These are operational failures (parameter or parse problems); a wrong
/// password is `Ok(false)` at the hashing layer and never reaches here.
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert token creation errors to API errors
///
/// Handlers only issue tokens; validation failures are consumed by the auth
/// middleware before any handler runs.
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Internal(format!("Token operation failed: {}", err))
    }
}

/// Convert request validation errors into the 422 response shape
impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        let errors: Vec<ValidationErrorDetail> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Conflict("Username or email already registered".to_string());
        assert_eq!(
            err.to_string(),
            "Conflict: Username or email already registered"
        );

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Unauthenticated("nope".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::Conflict("dup".to_string()), StatusCode::BAD_REQUEST),
            (
                ApiError::InvalidCredential("wrong".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Forbidden("no".to_string()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("gone".to_string()), StatusCode::NOT_FOUND),
            (
                ApiError::Validation(vec![]),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_unauthenticated_carries_challenge_header() {
        let response = ApiError::Unauthenticated("Invalid authentication credentials".to_string())
            .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer")
        );
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_internal_error_hides_details() {
        let response = ApiError::Internal("connection string leaked?".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
