//! Bulk stock-update orchestrator (§4.7).
//!
//! One transaction per request; missing products/variants do not abort the
//! transaction — they are reported in counters.

use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};

use catalog_gateway_shared::AppError;

use crate::db::models::store_product::{StockUpdateCounters, StockUpdateRequest};
use crate::db::repository::{store, store_product, variation};
use crate::db::DbService;

pub async fn run(db: &DbService, request: &StockUpdateRequest) -> Result<StockUpdateCounters, AppError> {
    let mut tx = db
        .begin()
        .await
        .map_err(|e| AppError::stock_update_failed(format!("failed to start transaction: {e}")))?;

    let counters = run_in_transaction(&mut tx, request).await;

    match counters {
        Ok(counters) => {
            tx.commit()
                .await
                .map_err(|e| AppError::stock_update_failed(format!("commit failed: {e}")))?;
            Ok(counters)
        }
        Err(e) => {
            let _ = tx.rollback().await;
            Err(e)
        }
    }
}

/// Only a positive price replaces the stored one (§4.7 step 2/3: "if price
/// is positive, price").
fn positive(price: Option<Decimal>) -> Option<Decimal> {
    price.filter(|p| *p > Decimal::ZERO)
}

async fn run_in_transaction(
    tx: &mut Transaction<'_, Postgres>,
    request: &StockUpdateRequest,
) -> Result<StockUpdateCounters, AppError> {
    let mut counters = StockUpdateCounters::default();

    let store_row = store::find_by_external_id(&mut **tx, &request.store_external_id)
        .await
        .map_err(|e| AppError::store_not_found(e.to_string()))?;

    for entry in &request.products {
        let updated = store_product::update_stock_by_external_id(
            tx,
            store_row.id,
            &entry.product_external_id,
            entry.stock,
            entry.available,
            positive(entry.price),
        )
        .await
        .map_err(|e| AppError::stock_update_failed(e.to_string()))?;

        match updated {
            Some(_) => counters.updated += 1,
            None => counters.not_found += 1,
        }

        for variant in &entry.variants {
            let updated = variation::update_stock_by_external_id(
                tx,
                &variant.variation_external_id,
                variant.stock,
                positive(variant.price),
            )
            .await
            .map_err(|e| AppError::stock_update_failed(e.to_string()))?;

            match updated {
                Some(_) => counters.variants_updated += 1,
                None => counters.variants_not_found += 1,
            }
        }
    }

    Ok(counters)
}
