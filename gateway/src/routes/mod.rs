//! HTTP routing and app construction (component H, §6).
//!
//! Mirrors `edge-server/src/routes/mod.rs`'s public/protected route-group
//! split: `public_router` merges the unauthenticated surface (health,
//! placeholders), `protected_router` merges the authenticated one (stores,
//! products). `build_app` merges both, applying the flat bearer-token check
//! (§4.8, in place of `edge-server`'s JWT middleware) only to the protected
//! group, then layers request tracing, compression, CORS, and request-id
//! propagation on top.

pub mod health;
pub mod placeholders;
pub mod products;
pub mod stores;

use axum::http::{HeaderName, HeaderValue};
use axum::middleware as axum_middleware;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use catalog_gateway_shared::AppError;

use crate::auth::require_bearer_token;
use crate::core::state::AppState;

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).ok()?))
    }
}

/// Unauthenticated surface: health and the read placeholders (§4.8).
fn public_router() -> Router<AppState> {
    health::router().merge(placeholders::router())
}

/// Authenticated surface: store and product CRUD/bulk operations (§4.8,
/// §6), gated by [`require_bearer_token`].
fn protected_router() -> Router<AppState> {
    stores::router().merge(products::router())
}

/// Build the fully configured app: middleware, auth, and a fallback for
/// unknown routes (§6: `{status:"error", error:{code:"NOT_FOUND", ...}}`,
/// HTTP 404).
pub fn build_app(state: AppState) -> Router<AppState> {
    let protected = protected_router().layer(axum_middleware::from_fn_with_state(
        state,
        require_bearer_token,
    ));

    public_router()
        .merge(protected)
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
}

async fn not_found() -> impl IntoResponse {
    AppError::not_found("no route matches this request")
}
