//! Bearer-token boundary (component H, §4.8).
//!
//! Membership in a flat token set, not JWT validation. Missing header,
//! malformed header, empty token, and unknown token each log a distinct
//! reason but all surface identically to the client as `UNAUTHORIZED`/401 —
//! the asymmetry (detailed internal reason, uniform external message) keeps
//! the failure mode from leaking which tokens are and are not valid.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use catalog_gateway_shared::AppError;

use crate::core::state::AppState;

enum Rejection {
    MissingHeader,
    Malformed,
    Empty,
    Unknown,
}

impl Rejection {
    fn log(&self) -> &'static str {
        match self {
            Rejection::MissingHeader => "missing Authorization header",
            Rejection::Malformed => "malformed Authorization header",
            Rejection::Empty => "empty bearer token",
            Rejection::Unknown => "token not a member of the configured set",
        }
    }
}

/// Extracted token from a well-formed `Authorization: Bearer <token>` header.
fn extract_token(request: &Request) -> Result<&str, Rejection> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(Rejection::MissingHeader)?
        .to_str()
        .map_err(|_| Rejection::Malformed)?;

    let token = header.strip_prefix("Bearer ").ok_or(Rejection::Malformed)?;
    if token.is_empty() {
        return Err(Rejection::Empty);
    }
    Ok(token)
}

pub async fn require_bearer_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let result = match extract_token(&request) {
        Ok(token) if state.config.bearer_tokens.contains(token) => Ok(()),
        Ok(_) => Err(Rejection::Unknown),
        Err(rejection) => Err(rejection),
    };

    match result {
        Ok(()) => Ok(next.run(request).await),
        Err(rejection) => {
            tracing::debug!(reason = rejection.log(), "rejected unauthenticated request");
            Err(AppError::unauthorized("authentication required"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    fn request_with_header(value: Option<&str>) -> Request {
        let mut builder = HttpRequest::builder().uri("/api/v1/stores/1");
        if let Some(v) = value {
            builder = builder.header(AUTHORIZATION, v);
        }
        builder.body(axum::body::Body::empty()).unwrap()
    }

    #[test]
    fn missing_header_is_rejected() {
        assert!(matches!(extract_token(&request_with_header(None)), Err(Rejection::MissingHeader)));
    }

    #[test]
    fn non_bearer_scheme_is_malformed() {
        assert!(matches!(
            extract_token(&request_with_header(Some("Basic abc"))),
            Err(Rejection::Malformed)
        ));
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!(matches!(extract_token(&request_with_header(Some("Bearer "))), Err(Rejection::Empty)));
    }

    #[test]
    fn well_formed_token_is_extracted() {
        assert_eq!(extract_token(&request_with_header(Some("Bearer abc123"))).unwrap(), "abc123");
    }
}
