// Error handling module for the Vendor API
// Provides centralized error types and HTTP response conversion

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, warn};

/// Main error type for the API
/// All handlers and services return Result<T, ApiError>
///
/// Each variant maps to a specific HTTP status code and error response format.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Field-level validation errors from the validator crate
    /// Maps to HTTP 400 Bad Request
    #[error("Request validation failed")]
    ValidationError(validator::ValidationErrors),

    /// Malformed request that is not a field-level validation failure
    /// Maps to HTTP 400 Bad Request
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found by ID
    /// Maps to HTTP 404 Not Found
    #[error("{resource} with id {id} not found")]
    NotFound { resource: String, id: String },

    /// Duplicate unique key
    /// Maps to HTTP 409 Conflict
    #[error("{message}")]
    Conflict { message: String },

    /// Database operation errors
    /// Maps to HTTP 500, details are only logged
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    /// Internal server errors
    /// Maps to HTTP 500, details are only logged
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Authentication failures
    /// Maps to HTTP 401 Unauthorized
    #[error("{0}")]
    Unauthorized(String),
}

/// Consistent error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR", "NOT_FOUND")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Field-level validation errors, omitted when None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// RFC 3339 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(error_code: &str, message: String, details: Option<serde_json::Value>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message,
            details,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Shorthand for a not found error on a numeric id
    pub fn not_found(resource: &str, id: i64) -> Self {
        ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Logging level follows severity:
    /// - error!: database and internal errors (500-level)
    /// - warn!: conflicts and authentication failures
    /// - debug!: expected client errors (validation, not found)
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        let response = match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                ErrorResponse::new(
                    "VALIDATION_ERROR",
                    "Request validation failed".to_string(),
                    Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({}))),
                )
            }
            ApiError::BadRequest(message) => {
                debug!("Bad request: {}", message);
                ErrorResponse::new("BAD_REQUEST", message.clone(), None)
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                ErrorResponse::new("NOT_FOUND", format!("{} with id {} not found", resource, id), None)
            }
            ApiError::Conflict { message } => {
                warn!("Conflict error: {}", message);
                ErrorResponse::new("CONFLICT", message.clone(), None)
            }
            ApiError::DatabaseError(db_error) => {
                // Full error stays in the logs, never in the response
                error!("Database error: {:?}", db_error);
                ErrorResponse::new("DATABASE_ERROR", "A database error occurred".to_string(), None)
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
            ApiError::Unauthorized(message) => {
                warn!("Unauthorized access attempt: {}", message);
                ErrorResponse::new("UNAUTHORIZED", message.clone(), None)
            }
        };
        (status, response)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Convert sqlx errors to ApiError
///
/// Unique violations become 409, foreign key and check violations 400.
impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &error {
            if db_err.is_unique_violation() {
                let message = match db_err.constraint() {
                    Some("vendors_vendor_code_key") => {
                        "Vendor with this vendor_code already exists".to_string()
                    }
                    Some("purchase_orders_po_number_key") => {
                        "Purchase order with this po_number already exists".to_string()
                    }
                    Some(constraint) => format!("Duplicate value violates {}", constraint),
                    None => "Duplicate value violates a unique constraint".to_string(),
                };
                return ApiError::Conflict { message };
            }
            if db_err.code().as_deref().is_some_and(is_transient_conflict) {
                return ApiError::Conflict {
                    message: "Concurrent update conflict, retry the request".to_string(),
                };
            }
            if db_err.is_foreign_key_violation() {
                return ApiError::BadRequest("Referenced resource does not exist".to_string());
            }
            if db_err.is_check_violation() {
                return ApiError::BadRequest("Value violates a data constraint".to_string());
            }
        }
        ApiError::DatabaseError(error)
    }
}

/// SQLSTATEs for which retrying the whole request can succeed:
/// serialization_failure (40001) and deadlock_detected (40P01)
fn is_transient_conflict(code: &str) -> bool {
    matches!(code, "40001" | "40P01")
}

/// Convert validator errors to ApiError
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

/// Malformed or mistyped JSON bodies share the API error envelope
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Unparsable path ids share the API error envelope
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Mistyped query parameters share the API error envelope
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::ValidationError(validator::ValidationErrors::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::BadRequest("bad".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("Vendor", 7).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Conflict { message: "dup".into() }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Unauthorized("no".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_not_found_message() {
        let (status, body) = ApiError::not_found("PurchaseOrder", 99999).to_error_response();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error_code, "NOT_FOUND");
        assert_eq!(body.message, "PurchaseOrder with id 99999 not found");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_database_error_hides_details() {
        let (_, body) = ApiError::DatabaseError(sqlx::Error::PoolTimedOut).to_error_response();
        assert_eq!(body.error_code, "DATABASE_ERROR");
        assert_eq!(body.message, "A database error occurred");
    }

    #[test]
    fn test_transient_conflict_codes() {
        assert!(is_transient_conflict("40P01"));
        assert!(is_transient_conflict("40001"));
        assert!(!is_transient_conflict("23505"));
        assert!(!is_transient_conflict("40000"));
    }

    #[test]
    fn test_non_database_sqlx_error_stays_internal() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, ApiError::DatabaseError(_)));
    }
}
