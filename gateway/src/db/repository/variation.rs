use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::RepoResult;
use crate::db::models::product::IncomingVariation;
use crate::db::models::Variation;

/// Upsert variations for a store-product, keyed by `(store_product_id, name)`
/// (§4.6 step 6 — must run after step 5 so `store_product_id` is known;
/// a prior ordering bug ran this before store-products existed).
pub async fn upsert_batch(
    tx: &mut Transaction<'_, Postgres>,
    store_product_id: Uuid,
    variations: &[IncomingVariation],
) -> RepoResult<u32> {
    let mut processed = 0u32;
    for v in variations {
        sqlx::query(
            r#"
            INSERT INTO variations (
                store_product_id, variation_external_id, name, display_name, price, stock,
                in_stock, is_default, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now(), now())
            ON CONFLICT (store_product_id, name) DO UPDATE SET
                variation_external_id = EXCLUDED.variation_external_id,
                display_name = EXCLUDED.display_name,
                price = EXCLUDED.price,
                stock = EXCLUDED.stock,
                in_stock = EXCLUDED.in_stock,
                is_default = EXCLUDED.is_default,
                is_active = EXCLUDED.is_active,
                updated_at = now()
            "#,
        )
        .bind(store_product_id)
        .bind(&v.variation_external_id)
        .bind(&v.name)
        .bind(&v.display_name)
        .bind(v.price)
        .bind(v.stock)
        .bind(v.stock > 0)
        .bind(v.is_default)
        .bind(v.is_active)
        .execute(&mut **tx)
        .await?;
        processed += 1;
    }
    Ok(processed)
}

/// Bulk stock-update of a single variation, matched by its own external id
/// (§4.7 step 3: same `in_stock` derivation and optional price; the variant
/// entry carries no `available` flag of its own).
pub async fn update_stock_by_external_id(
    tx: &mut Transaction<'_, Postgres>,
    variation_external_id: &str,
    stock: i32,
    price: Option<Decimal>,
) -> RepoResult<Option<Variation>> {
    let row: Option<Variation> = sqlx::query_as(
        r#"
        UPDATE variations SET
            stock = $2,
            in_stock = $3,
            price = COALESCE($4, price),
            updated_at = now()
        WHERE variation_external_id = $1
        RETURNING *
        "#,
    )
    .bind(variation_external_id)
    .bind(stock)
    .bind(stock > 0)
    .bind(price)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row)
}
