use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use infra::rules::RuleViolation;
use infra::store::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("database error")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    /// Stable error code exposed to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::BadRequest(_) => "VALIDATION_ERROR",
            AppError::Internal(_) | AppError::Db(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, AppError::Internal(_) | AppError::Db(_))
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Validation(msg) => AppError::BadRequest(msg),
            StoreError::Database(e) => AppError::Db(e),
            StoreError::Unavailable(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RuleViolation> for AppError {
    fn from(e: RuleViolation) -> Self {
        AppError::Conflict(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) | AppError::Db(_) => {
                tracing::error!("request failed: {self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (
            status,
            Json(ErrorBody {
                error: if self.is_internal() {
                    "Internal server error".to_string()
                } else {
                    self.to_string()
                },
                code: self.code(),
            }),
        )
            .into_response()
    }
}
