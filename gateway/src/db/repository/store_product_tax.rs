use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::RepoResult;

/// Link a store-product to a tax scoped to the same store (§4.6 step 7),
/// keyed by `(store_id, store_product_id, tax_id)`.
pub async fn link(
    tx: &mut Transaction<'_, Postgres>,
    store_id: Uuid,
    store_product_id: Uuid,
    tax_id: Uuid,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO store_product_taxes (store_id, store_product_id, tax_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (store_id, store_product_id, tax_id) DO NOTHING
        "#,
    )
    .bind(store_id)
    .bind(store_product_id)
    .bind(tax_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
