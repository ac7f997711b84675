//! `GET /api/v1/<domain>/…` read placeholders (§6, §9).
//!
//! Whether these are meant to return `501 NOT_IMPLEMENTED` or be wired to
//! the read orchestrator (component F) is inconsistent in the distilled
//! spec; tests pin `501` (§9 resolved open question), so every placeholder
//! namespace below stays a stub. Unauthenticated, like health (§4.8:
//! "Unprotected endpoints (health and three placeholder read namespaces)
//! bypass the check").

use axum::routing::get;
use axum::Router;

use catalog_gateway_shared::AppError;

use crate::core::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/categories", get(not_implemented))
        .route("/api/v1/categories/{*rest}", get(not_implemented))
        .route("/api/v1/brands", get(not_implemented))
        .route("/api/v1/brands/{*rest}", get(not_implemented))
        .route("/api/v1/search", get(not_implemented))
        .route("/api/v1/search/{*rest}", get(not_implemented))
}

async fn not_implemented() -> AppError {
    AppError::not_implemented("this read namespace is not yet wired to the read orchestrator")
}
