//! Shared types for the catalog gateway
//!
//! - `error`: the closed `AppError` taxonomy and its axum `IntoResponse` mapping
//! - `envelope`: the success/error response envelope
//! - `pagination`: the `limit`/`offset` pagination shape carried in envelope metadata

pub mod envelope;
pub mod error;
pub mod pagination;

pub use envelope::{Envelope, Metadata};
pub use error::{AppError, AppResult, ErrorCode};
pub use pagination::Pagination;
