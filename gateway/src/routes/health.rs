//! `GET /health` and `/health/detailed` (§4.8, §6) — unauthenticated.
//!
//! Composite status per §4.8: `healthy` when every probe passes, `degraded`
//! when only the optional cache is unreachable while the primary
//! dependencies answer, `unhealthy` when either primary dependency
//! (relational store or origin row-store) is unreachable (§9 resolved open
//! question — the origin probe is a plain `GET /health` against the origin
//! base URL, treating a 2xx or 404 response as reachable). The composite
//! governs the HTTP status: 200 for healthy/degraded, 503 for unhealthy.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::core::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(health))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum ProbeStatus {
    Ok,
    Unhealthy,
    Skipped,
}

#[derive(Serialize)]
struct Probe {
    status: ProbeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl Probe {
    fn ok() -> Self {
        Self {
            status: ProbeStatus::Ok,
            message: None,
        }
    }

    fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Unhealthy,
            message: Some(message.into()),
        }
    }

    fn skipped(message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Skipped,
            message: Some(message.into()),
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == ProbeStatus::Ok
    }
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    dependencies: BTreeMap<&'static str, Probe>,
}

const PROBE_DEADLINE: Duration = Duration::from_secs(2);

async fn health(State(state): State<AppState>) -> Response {
    let mut dependencies = BTreeMap::new();

    let db_probe = match state.db.ping(PROBE_DEADLINE).await {
        Ok(()) => Probe::ok(),
        Err(e) => Probe::unhealthy(e.to_string()),
    };
    dependencies.insert("database", db_probe);

    // "supabase" names the remote row-store client (component C).
    let origin_probe = match state.origin.ping(PROBE_DEADLINE).await {
        Ok(()) => Probe::ok(),
        Err(e) => Probe::unhealthy(e.to_string()),
    };
    dependencies.insert("supabase", origin_probe);

    let cache_probe = match &state.cache {
        Some(cache) => match tokio::time::timeout(PROBE_DEADLINE, cache.ping()).await {
            Ok(Ok(())) => Probe::ok(),
            Ok(Err(e)) => Probe::unhealthy(e.to_string()),
            Err(_) => Probe::unhealthy("cache ping timed out"),
        },
        None => Probe::skipped("cache not connected at boot, running in degraded mode"),
    };
    dependencies.insert("cache", cache_probe);

    let primary_ok = dependencies["database"].is_healthy() && dependencies["supabase"].is_healthy();
    let all_ok = primary_ok && dependencies["cache"].is_healthy();

    let (status_code, status) = if !primary_ok {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    } else if !all_ok {
        (StatusCode::OK, "degraded")
    } else {
        (StatusCode::OK, "healthy")
    };

    (status_code, Json(HealthBody { status, dependencies })).into_response()
}
