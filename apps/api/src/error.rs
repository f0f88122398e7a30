//! HTTP error mapping.
//!
//! Every failure leaves the server as `{success: false, code, message}`.
//!
//! ```text
//! ┌──────────────────────────────┬────────┬─────────────────────┬───────────┐
//! │ source                       │ status │ code                │ retryable │
//! ├──────────────────────────────┼────────┼─────────────────────┼───────────┤
//! │ ValidationError / bad body   │ 400    │ VALIDATION_ERROR    │ no        │
//! │ InvalidTransition            │ 400    │ INVALID_TRANSITION  │ no        │
//! │ InsufficientStock            │ 400    │ INSUFFICIENT_STOCK  │ no        │
//! │ InventoryNotFound            │ 400    │ INVENTORY_NOT_FOUND │ no        │
//! │ Order/Sale not found         │ 404    │ NOT_FOUND           │ no        │
//! │ role not allowed             │ 403    │ FORBIDDEN           │ no        │
//! │ DbError::LockTimeout         │ 409    │ LOCK_CONFLICT       │ yes       │
//! │ DbError::PoolExhausted       │ 503    │ SERVICE_UNAVAILABLE │ yes       │
//! │ any other DbError            │ 500    │ INTERNAL_ERROR      │ no        │
//! └──────────────────────────────┴────────┴─────────────────────┴───────────┘
//! ```
//! Internal errors are logged with their detail and answered generically.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sportline_core::{CoreError, ValidationError};
use sportline_db::{DbError, ServiceError};
use thiserror::Error;
use tracing::error;

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ValidationError,
    InvalidTransition,
    InsufficientStock,
    InventoryNotFound,
    NotFound,
    Forbidden,
    LockConflict,
    ServiceUnavailable,
    InternalError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidTransition => "INVALID_TRANSITION",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::InventoryNotFound => "INVENTORY_NOT_FOUND",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::LockConflict => "LOCK_CONFLICT",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError
            | ErrorCode::InvalidTransition
            | ErrorCode::InsufficientStock
            | ErrorCode::InventoryNotFound => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::LockConflict => StatusCode::CONFLICT,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the client may resend the same request.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::LockConflict | ErrorCode::ServiceUnavailable)
    }
}

/// Error returned by every handler.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn forbidden(action: &str) -> Self {
        ApiError::new(
            ErrorCode::Forbidden,
            format!("Your role is not allowed to {action}"),
        )
    }

    fn internal() -> Self {
        ApiError::new(ErrorCode::InternalError, "Internal server error")
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::new(ErrorCode::ValidationError, err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::Validation(inner) => {
                return ApiError::new(ErrorCode::ValidationError, inner.to_string())
            }
            CoreError::OrderNotFound(_) | CoreError::SaleNotFound(_) => ErrorCode::NotFound,
            CoreError::InventoryNotFound { .. } => ErrorCode::InventoryNotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::InvalidTransition(_) => ErrorCode::InvalidTransition,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::LockTimeout => ApiError::new(ErrorCode::LockConflict, err.to_string()),
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::ServiceUnavailable, "Server is busy, retry later")
            }
            DbError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            other => {
                error!(error = %other, "Database error");
                ApiError::internal()
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(core) => core.into(),
            ServiceError::Db(db) => db.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(ErrorCode::ValidationError, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::new(ErrorCode::ValidationError, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::new(ErrorCode::ValidationError, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "code": self.code.as_str(),
            "message": self.message,
            "retryable": self.code.is_retryable(),
        });
        (self.code.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_client_errors() {
        let err: ApiError = CoreError::InsufficientStock {
            product_id: 1,
            branch_id: 5,
            available: 1,
            requested: 2,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.code.status(), StatusCode::BAD_REQUEST);
        assert!(err.message.contains("short by 1"));

        let err: ApiError = CoreError::OrderNotFound(3).into();
        assert_eq!(err.code.status(), StatusCode::NOT_FOUND);

        let err: ApiError = CoreError::Validation(ValidationError::required("lines")).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "lines is required");
    }

    #[test]
    fn test_lock_timeout_is_retryable_conflict() {
        let err: ApiError = ServiceError::Db(DbError::LockTimeout).into();
        assert_eq!(err.code.status(), StatusCode::CONFLICT);
        assert!(err.code.is_retryable());
    }

    #[test]
    fn test_infrastructure_detail_is_hidden() {
        let err: ApiError = DbError::QueryFailed("no such column: secret".to_string()).into();
        assert_eq!(err.code.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }
}
