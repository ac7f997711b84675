use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::{RepoError, RepoResult};
use crate::db::models::StoreProduct;

/// Upsert by `(store_id, product_id)` (§4.6 step 5), recording
/// `store_external_product_id` so future ingests pin to this product.
/// `in_stock` is taken from the caller rather than derived here from
/// `stock > 0`, since the simplified-input-shape default (§4.6: "stock = 0,
/// in-stock = true" when no explicit stock data was supplied) can disagree
/// with that mechanical derivation — only the caller knows whether `stock`
/// is an explicit value or a synthesized default.
pub async fn upsert(
    tx: &mut Transaction<'_, Postgres>,
    store_id: Uuid,
    product_id: Uuid,
    store_external_product_id: Option<&str>,
    price: Decimal,
    stock: i32,
    in_stock: bool,
    available: bool,
) -> RepoResult<(StoreProduct, bool)> {
    let existed: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM store_products WHERE store_id = $1 AND product_id = $2)",
    )
    .bind(store_id)
    .bind(product_id)
    .fetch_one(&mut **tx)
    .await?;

    let store_product: StoreProduct = sqlx::query_as(
        r#"
        INSERT INTO store_products (store_id, product_id, store_external_product_id, price, stock, in_stock, available, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, now(), now())
        ON CONFLICT (store_id, product_id) DO UPDATE SET
            store_external_product_id = COALESCE(EXCLUDED.store_external_product_id, store_products.store_external_product_id),
            price = EXCLUDED.price,
            stock = EXCLUDED.stock,
            in_stock = EXCLUDED.in_stock,
            available = EXCLUDED.available,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(store_id)
    .bind(product_id)
    .bind(store_external_product_id)
    .bind(price)
    .bind(stock)
    .bind(in_stock)
    .bind(available)
    .fetch_one(&mut **tx)
    .await?;

    Ok((store_product, !existed))
}

/// Bulk stock-update of a single store-product, matched by
/// `(store_id, store_external_product_id)` (§4.7 step 2). Returns `None`
/// without erroring when no row matches — the caller counts it as
/// `not_found` rather than aborting the transaction.
pub async fn update_stock_by_external_id(
    tx: &mut Transaction<'_, Postgres>,
    store_id: Uuid,
    store_external_product_id: &str,
    stock: i32,
    available: bool,
    price: Option<Decimal>,
) -> RepoResult<Option<StoreProduct>> {
    let row: Option<StoreProduct> = sqlx::query_as(
        r#"
        UPDATE store_products SET
            stock = $3,
            in_stock = $4,
            available = $5,
            price = COALESCE($6, price),
            updated_at = now()
        WHERE store_id = $1 AND store_external_product_id = $2
        RETURNING *
        "#,
    )
    .bind(store_id)
    .bind(store_external_product_id)
    .bind(stock)
    .bind(stock > 0)
    .bind(available)
    .bind(price)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row)
}

/// Direct-by-id stock/availability/price update, used by the small
/// `PUT /api/v1/products/:id/stock` and `PUT /api/v1/products/stock/bulk`
/// routes (§6) — unlike [`update_stock_by_external_id`], these operate
/// on a known internal store-product id rather than matching by the
/// upstream system's external id, so an unknown id is a client error
/// rather than a counted miss.
pub async fn update_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: Uuid,
    stock: i32,
    available: bool,
    price: Option<Decimal>,
) -> RepoResult<StoreProduct> {
    sqlx::query_as(
        r#"
        UPDATE store_products SET
            stock = $2,
            in_stock = $3,
            available = $4,
            price = COALESCE($5, price),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(stock)
    .bind(stock > 0)
    .bind(available)
    .bind(price)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("store product {id}")))
}
