//! Error types for the portal API.
//!
//! Every failure a handler can produce flows through `ApiError`, which
//! serializes as `{ "error": { "code", "message" } }` with the matching
//! HTTP status. Mutating endpoints therefore return either the fully
//! updated record or exactly one descriptive error - never a partial
//! success.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use canvass_core::CoreError;
use canvass_db::DbError;

/// Error category, mapped 1:1 onto an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// 400 - bad input shape (missing address, empty products, bad enum)
    Validation,
    /// 401 - missing or invalid bearer token
    Unauthorized,
    /// 403 - authenticated but lacking the permission
    Forbidden,
    /// 404 - referenced sale/user/notification does not exist
    NotFound,
    /// 409 - transition out of a terminal sale status
    Conflict,
    /// 500 - backing store unavailable or misbehaving
    Database,
    /// 500 - anything else
    Internal,
}

impl ErrorCode {
    const fn status(&self) -> StatusCode {
        match self {
            ErrorCode::Validation => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Database | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Portal API error.
#[derive(Debug, Clone)]
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

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Validation, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{entity} not found: {id}"))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Domain errors map onto the client-visible taxonomy.
///
/// An unknown plan id is a *validation* failure of the submission (the
/// input referred to a plan that is not sellable), while an unknown sale
/// id is a true 404.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::PlanNotFound(_) => ApiError::new(ErrorCode::Validation, err.to_string()),
            CoreError::SaleNotFound(id) => ApiError::not_found("Sale", &id),
            CoreError::InvalidTransition { .. } => {
                ApiError::new(ErrorCode::Conflict, err.to_string())
            }
            CoreError::Validation(v) => ApiError::new(ErrorCode::Validation, v.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            DbError::Conflict { .. } => ApiError::new(ErrorCode::Conflict, err.to_string()),
            _ => ApiError::new(ErrorCode::Database, err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: ErrorCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (status, Json(body)).into_response()
    }
}
