//! Store routes (§6): CRUD by primary key backed directly by the relational
//! repository (component D), plus the one cache-aside list read (component F,
//! §4.4) this gateway exposes — `GET /api/v1/stores/:id/products` fingerprints
//! the query, checks the cache, falls back to the origin row-store
//! (component C) on a miss, and populates the cache on the way back out.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use catalog_gateway_shared::{AppError, AppResult, Envelope, Pagination};

use crate::core::state::AppState;
use crate::db::models::StoreUpdate;
use crate::db::repository::{store, RepoError};
use crate::fingerprint::{self, FilterValue};
use crate::orchestrator::read::read_through;
use crate::origin::{OriginError, Row};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/stores/{id}", get(get_store).put(update_store))
        .route("/api/v1/stores/{id}/status", put(set_status).get(get_status))
        .route("/api/v1/stores/{id}/products", get(list_store_products))
}

fn map_repo_err(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(msg) => AppError::store_not_found(msg),
        RepoError::Database(e) => AppError::internal(e.to_string()),
    }
}

fn map_origin_err(e: OriginError) -> AppError {
    match e {
        OriginError::NotFound => AppError::product_not_found("no products matched at the origin"),
        OriginError::Timeout => AppError::timeout("origin request timed out"),
        OriginError::Connection(msg) => AppError::service_unavailable(msg),
        OriginError::Query(msg) => AppError::internal(msg),
    }
}

#[derive(Debug, Deserialize)]
struct ListProductsQuery {
    category: Option<String>,
    brand: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

/// `GET /api/v1/stores/:id/products` (§4.4 "THE CORE"): cache-aside list
/// read, scoped to one store and optionally filtered by category/brand.
async fn list_store_products(
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    Query(query): Query<ListProductsQuery>,
) -> AppResult<Envelope<Vec<Row>>> {
    let pagination = Pagination::new(query.limit, query.offset);

    let mut filters: BTreeMap<String, FilterValue> = BTreeMap::new();
    filters.insert("store_id".to_string(), FilterValue::from(store_id.to_string()));
    if let Some(category) = &query.category {
        filters.insert("category".to_string(), FilterValue::from(category.clone()));
    }
    if let Some(brand) = &query.brand {
        filters.insert("brand".to_string(), FilterValue::from(brand.clone()));
    }

    let key = fingerprint::for_query("products", "list", &filters, pagination.limit, pagination.offset);
    let deadline = state.request_deadline();
    let ttl = state.cache_ttl();
    let origin = state.origin.clone();

    let result = read_through(state.cache.as_ref(), &key, ttl, move || async move {
        origin
            .query("products", &filters, pagination.limit, pagination.offset, deadline)
            .await
            .map_err(map_origin_err)
    })
    .await?;

    Ok(Envelope::ok(result.data).with_metadata(result.metadata.with_pagination(pagination)))
}

async fn get_store(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Envelope<crate::db::models::Store>> {
    let row = store::find_by_id(state.db.pool(), id).await.map_err(map_repo_err)?;
    Ok(Envelope::ok(row))
}

async fn update_store(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StoreUpdate>,
) -> AppResult<Envelope<crate::db::models::Store>> {
    let row = store::update_by_id(state.db.pool(), id, &body).await.map_err(map_repo_err)?;
    Ok(Envelope::ok(row))
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    is_active: bool,
}

#[derive(Debug, serde::Serialize)]
struct StatusResponse {
    is_active: bool,
}

async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> AppResult<Envelope<crate::db::models::Store>> {
    let row = store::set_active(state.db.pool(), id, body.is_active)
        .await
        .map_err(map_repo_err)?;
    Ok(Envelope::ok(row))
}

async fn get_status(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Envelope<StatusResponse>> {
    let row = store::find_by_id(state.db.pool(), id).await.map_err(map_repo_err)?;
    Ok(Envelope::ok(StatusResponse { is_active: row.is_active }))
}
