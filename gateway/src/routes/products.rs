//! Product write routes (§6): legacy bulk-create, small stock/status
//! updates, and the two bulk transactional entry points (§4.6, §4.7).
//! All authenticated.

use axum::extract::{Path, State};
use axum::routing::{post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use catalog_gateway_shared::{AppError, AppResult, Envelope};

use crate::core::state::AppState;
use crate::db::models::product::LegacyProductCreate;
use crate::db::models::Product;
use crate::db::models::store_product::StockUpdateRequest;
use crate::db::repository::{product, store_product, RepoError};
use crate::orchestrator::ingest::{self, IngestCounters, IngestRequest};
use crate::orchestrator::stock;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/products/bulk", post(bulk_create))
        .route("/api/v1/products/{id}/stock", put(update_stock))
        .route("/api/v1/products/{id}/status", put(update_status))
        .route("/api/v1/products/stock/bulk", put(bulk_stock_by_id))
        .route("/api/v1/products/push", post(push))
        .route("/api/v1/products/stock", post(stock_update))
}

fn map_repo_err(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(msg) => AppError::product_not_found(msg),
        RepoError::Database(e) => AppError::internal(e.to_string()),
    }
}

#[derive(Debug, Serialize)]
struct BulkCreateResponse {
    created: usize,
    products: Vec<Product>,
}

/// `POST /api/v1/products/bulk` — legacy bulk-create, predates §4.5
/// resolution (see [`LegacyProductCreate`]).
async fn bulk_create(
    State(state): State<AppState>,
    Json(entries): Json<Vec<LegacyProductCreate>>,
) -> AppResult<Envelope<BulkCreateResponse>> {
    let mut products = Vec::with_capacity(entries.len());
    for entry in &entries {
        let row = product::create_simple(state.db.pool(), entry)
            .await
            .map_err(map_repo_err)?;
        products.push(row);
    }
    Ok(Envelope::ok(BulkCreateResponse {
        created: products.len(),
        products,
    }))
}

#[derive(Debug, Deserialize)]
struct StockBody {
    stock: i32,
    #[serde(default)]
    available: bool,
    price: Option<Decimal>,
}

/// `PUT /api/v1/products/:id/stock` — `:id` is a store-product id; product
/// stock is carried by the store binding, never by the global product
/// (§3 "StoreProduct").
async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StockBody>,
) -> AppResult<Envelope<crate::db::models::StoreProduct>> {
    let row = store_product::update_by_id(state.db.pool(), id, body.stock, body.available, body.price)
        .await
        .map_err(map_repo_err)?;
    Ok(Envelope::ok(row))
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    is_active: bool,
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> AppResult<Envelope<Product>> {
    let row = product::set_active(state.db.pool(), id, body.is_active)
        .await
        .map_err(map_repo_err)?;
    Ok(Envelope::ok(row))
}

#[derive(Debug, Deserialize)]
struct BulkStockEntry {
    id: Uuid,
    stock: i32,
    #[serde(default)]
    available: bool,
    price: Option<Decimal>,
}

#[derive(Debug, Default, Serialize)]
struct BulkStockResponse {
    updated: usize,
}

/// `PUT /api/v1/products/stock/bulk` — the small variant: every entry
/// addresses a store-product by internal id the caller already holds, so an
/// unknown id is a client error rather than a counted miss (contrast
/// `POST /api/v1/products/stock`, §4.7, which matches by external id and
/// tolerates misses).
async fn bulk_stock_by_id(
    State(state): State<AppState>,
    Json(entries): Json<Vec<BulkStockEntry>>,
) -> AppResult<Envelope<BulkStockResponse>> {
    let mut updated = 0usize;
    for entry in &entries {
        store_product::update_by_id(state.db.pool(), entry.id, entry.stock, entry.available, entry.price)
            .await
            .map_err(map_repo_err)?;
        updated += 1;
    }
    Ok(Envelope::ok(BulkStockResponse { updated }))
}

/// `POST /api/v1/products/push` — the bulk catalog upsert (§4.6).
async fn push(State(state): State<AppState>, Json(body): Json<IngestRequest>) -> AppResult<Envelope<IngestCounters>> {
    let counters = ingest::run(&state.db, &body).await?;
    Ok(Envelope::ok(counters))
}

/// `POST /api/v1/products/stock` — the bulk stock update (§4.7).
async fn stock_update(
    State(state): State<AppState>,
    Json(body): Json<StockUpdateRequest>,
) -> AppResult<Envelope<crate::db::models::store_product::StockUpdateCounters>> {
    let counters = stock::run(&state.db, &body).await?;
    Ok(Envelope::ok(counters))
}
