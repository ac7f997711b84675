//! Closed error taxonomy and its HTTP mapping.
//!
//! `ErrorCode` is the exact set exposed at the boundary; `AppError` pairs a
//! code with a short, user-safe message. Internal causes (SQL text, transport
//! errors) are logged via `tracing` and never reach `message`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The closed set of error codes the boundary may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    NotImplemented,
    ServiceUnavailable,
    RedisError,
    Timeout,
    Unauthorized,
    InvalidInput,
    InternalError,
    StoreNotFound,
    ProductNotFound,
    StoreUpsertFailed,
    CategoryUpsertFailed,
    TaxUpsertFailed,
    ProductUpsertFailed,
    StockUpdateFailed,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound | ErrorCode::StoreNotFound | ErrorCode::ProductNotFound => {
                StatusCode::NOT_FOUND
            }
            ErrorCode::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            ErrorCode::ServiceUnavailable | ErrorCode::RedisError => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::InternalError
            | ErrorCode::StoreUpsertFailed
            | ErrorCode::CategoryUpsertFailed
            | ErrorCode::TaxUpsertFailed
            | ErrorCode::ProductUpsertFailed
            | ErrorCode::StockUpdateFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application-level error. `message` is always safe to show a client.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotImplemented, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn redis_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RedisError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Timeout, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn store_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreNotFound, message)
    }

    pub fn product_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProductNotFound, message)
    }

    pub fn store_upsert_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreUpsertFailed, message)
    }

    pub fn category_upsert_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CategoryUpsertFailed, message)
    }

    pub fn tax_upsert_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TaxUpsertFailed, message)
    }

    pub fn product_upsert_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProductUpsertFailed, message)
    }

    pub fn stock_update_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StockUpdateFailed, message)
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: ErrorCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self.code, ErrorCode::InternalError) {
            tracing::error!(code = ?self.code, message = %self.message, "internal error");
        } else {
            tracing::debug!(code = ?self.code, message = %self.message, "request error");
        }

        let body = ErrorBody {
            status: "error",
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };

        (self.code.status(), Json(body)).into_response()
    }
}
