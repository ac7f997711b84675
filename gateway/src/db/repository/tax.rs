use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::RepoResult;
use crate::db::models::tax::TaxUpsert;
use crate::db::models::Tax;

/// Upsert taxes scoped to a store, keyed by `(store_id, tax_code)` — the
/// join key store-bindings use (§3 "Tax").
pub async fn upsert_batch(
    tx: &mut Transaction<'_, Postgres>,
    store_id: Uuid,
    taxes: &[TaxUpsert],
) -> RepoResult<(Vec<Tax>, u32)> {
    let mut out = Vec::with_capacity(taxes.len());
    for input in taxes {
        let tax: Tax = sqlx::query_as(
            r#"
            INSERT INTO taxes (store_id, tax_external_id, tax_code, name, rate, tax_type, inclusive, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now(), now())
            ON CONFLICT (store_id, tax_code) DO UPDATE SET
                tax_external_id = EXCLUDED.tax_external_id,
                name = EXCLUDED.name,
                rate = EXCLUDED.rate,
                tax_type = EXCLUDED.tax_type,
                inclusive = EXCLUDED.inclusive,
                is_active = EXCLUDED.is_active,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(store_id)
        .bind(&input.tax_external_id)
        .bind(&input.tax_code)
        .bind(&input.name)
        .bind(input.rate)
        .bind(input.tax_type)
        .bind(input.inclusive)
        .bind(input.is_active)
        .fetch_one(&mut **tx)
        .await?;
        out.push(tax);
    }
    let count = out.len() as u32;
    Ok((out, count))
}

pub async fn find_by_code(
    tx: &mut Transaction<'_, Postgres>,
    store_id: Uuid,
    tax_code: &str,
) -> RepoResult<Tax> {
    sqlx::query_as("SELECT * FROM taxes WHERE store_id = $1 AND tax_code = $2")
        .bind(store_id)
        .bind(tax_code)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| super::RepoError::NotFound(format!("tax {tax_code} for store {store_id}")))
}
