//! Bulk catalog upsert orchestrator (component G, §4.6).
//!
//! Single top-level transaction per request; steps run in the mandatory
//! order below because later steps resolve identifiers earlier steps
//! produce. A prior bug ran variations before store-products and they could
//! not find their parent — step 6 must follow step 5.
//!
//! This gateway only accepts the "simplified" input shape (§4.6 last
//! paragraph): each product entry carries its own store-binding fields
//! (`store_external_product_id`, `price`, `stock`, `available`, `taxes`,
//! `variations`) rather than a separate top-level store-products list, so
//! the orchestrator always synthesizes one store-product per product — the
//! general shape collapses to this one since every store-product still
//! needs exactly one product to bind to.

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};

use catalog_gateway_shared::AppError;

use crate::db::models::category::CategoryUpsert;
use crate::db::models::product::IncomingProduct;
use crate::db::models::store::StoreUpsert;
use crate::db::models::tax::TaxUpsert;
use crate::db::repository::{category, product, store, store_product, store_product_tax, tax, variation};
use crate::db::DbService;

#[derive(Debug, Clone, Deserialize)]
pub struct IngestRequest {
    pub store: StoreUpsert,
    #[serde(default)]
    pub categories: Vec<CategoryUpsert>,
    #[serde(default)]
    pub taxes: Vec<TaxUpsert>,
    pub products: Vec<IncomingProduct>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestCounters {
    pub created: u32,
    pub updated: u32,
    pub variations_processed: u32,
    pub store_products_processed: u32,
    pub taxes_processed: u32,
}

pub async fn run(db: &DbService, request: &IngestRequest) -> Result<IngestCounters, AppError> {
    let mut tx = db
        .begin()
        .await
        .map_err(|e| AppError::store_upsert_failed(format!("failed to start transaction: {e}")))?;

    let counters = run_in_transaction(&mut tx, request).await;

    match counters {
        Ok(counters) => {
            tx.commit()
                .await
                .map_err(|e| AppError::store_upsert_failed(format!("commit failed: {e}")))?;
            Ok(counters)
        }
        Err(e) => {
            let _ = tx.rollback().await;
            Err(e)
        }
    }
}

async fn run_in_transaction(
    tx: &mut Transaction<'_, Postgres>,
    request: &IngestRequest,
) -> Result<IngestCounters, AppError> {
    let mut counters = IngestCounters::default();

    // 1. Store.
    let (store_row, store_created) = store::upsert(tx, &request.store)
        .await
        .map_err(|e| AppError::store_upsert_failed(e.to_string()))?;
    if store_created {
        counters.created += 1;
    } else {
        counters.updated += 1;
    }

    // 2. Categories: roots before children.
    if !request.categories.is_empty() {
        let (_categories, created, updated) = category::upsert_batch(tx, &request.categories)
            .await
            .map_err(|e| AppError::category_upsert_failed(e.to_string()))?;
        counters.created += created;
        counters.updated += updated;
    }

    // 3. Taxes scoped to the store.
    if !request.taxes.is_empty() {
        let (_taxes, processed) = tax::upsert_batch(tx, store_row.id, &request.taxes)
            .await
            .map_err(|e| AppError::tax_upsert_failed(e.to_string()))?;
        counters.taxes_processed += processed;
    }

    for incoming in &request.products {
        // 4. Resolve and upsert the product (§4.5), then its images.
        let (product_row, product_created) = product::resolve_and_upsert(tx, store_row.id, incoming)
            .await
            .map_err(|e| AppError::product_upsert_failed(e.to_string()))?;
        if product_created {
            counters.created += 1;
        } else {
            counters.updated += 1;
        }

        // 5. Store-product binding. When the caller supplied no explicit
        // stock data, synthesize "stock = 0, in-stock = true" (§4.6
        // "Simplified input shape") instead of mechanically deriving
        // in-stock from a stock quantity that was never actually given.
        let price = incoming.price.unwrap_or(incoming.base_price);
        let (stock, in_stock) = match incoming.stock {
            Some(stock) => (stock, stock > 0),
            None => (0, true),
        };
        let available = incoming.available.unwrap_or(true);
        let (store_product_row, _sp_created) = store_product::upsert(
            tx,
            store_row.id,
            product_row.id,
            incoming.store_external_product_id.as_deref(),
            price,
            stock,
            in_stock,
            available,
        )
        .await
        .map_err(|e| AppError::store_upsert_failed(e.to_string()))?;
        counters.store_products_processed += 1;

        // 6. Variations — must follow step 5.
        let processed = variation::upsert_batch(tx, store_product_row.id, &incoming.variations)
            .await
            .map_err(|e| AppError::product_upsert_failed(e.to_string()))?;
        counters.variations_processed += processed;

        // 7. Link taxes to this store-product.
        for tax_code in &incoming.taxes {
            let tax_row = tax::find_by_code(tx, store_row.id, tax_code)
                .await
                .map_err(|e| AppError::tax_upsert_failed(e.to_string()))?;
            store_product_tax::link(tx, store_row.id, store_product_row.id, tax_row.id)
                .await
                .map_err(|e| AppError::tax_upsert_failed(e.to_string()))?;
        }
    }

    Ok(counters)
}
