use sqlx::{Postgres, Transaction};

use super::{RepoError, RepoResult};
use crate::db::models::store::{slugify, StoreUpdate, StoreUpsert};
use crate::db::models::Store;

/// Upsert by `store_external_id`, recomputing the slug on every write
/// (§3 "Store": "slug is derived from name when name is written").
pub async fn upsert(tx: &mut Transaction<'_, Postgres>, input: &StoreUpsert) -> RepoResult<(Store, bool)> {
    let slug = slugify(&input.name);

    let existing: Option<Store> = sqlx::query_as(
        "SELECT * FROM stores WHERE store_external_id = $1",
    )
    .bind(&input.store_external_id)
    .fetch_optional(&mut **tx)
    .await?;

    let created = existing.is_none();

    let store: Store = sqlx::query_as(
        r#"
        INSERT INTO stores (
            store_external_id, name, slug, store_type, address_line1, address_line2,
            city, region, postal_code, country, latitude, longitude, is_active,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, now(), now())
        ON CONFLICT (store_external_id) DO UPDATE SET
            name = EXCLUDED.name,
            slug = EXCLUDED.slug,
            store_type = EXCLUDED.store_type,
            address_line1 = EXCLUDED.address_line1,
            address_line2 = EXCLUDED.address_line2,
            city = EXCLUDED.city,
            region = EXCLUDED.region,
            postal_code = EXCLUDED.postal_code,
            country = EXCLUDED.country,
            latitude = EXCLUDED.latitude,
            longitude = EXCLUDED.longitude,
            is_active = EXCLUDED.is_active,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(&input.store_external_id)
    .bind(&input.name)
    .bind(&slug)
    .bind(&input.store_type)
    .bind(&input.address_line1)
    .bind(&input.address_line2)
    .bind(&input.city)
    .bind(&input.region)
    .bind(&input.postal_code)
    .bind(&input.country)
    .bind(input.latitude)
    .bind(input.longitude)
    .bind(input.is_active)
    .fetch_one(&mut **tx)
    .await?;

    Ok((store, created))
}

pub async fn find_by_external_id(
    executor: impl sqlx::PgExecutor<'_>,
    store_external_id: &str,
) -> RepoResult<Store> {
    sqlx::query_as("SELECT * FROM stores WHERE store_external_id = $1")
        .bind(store_external_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("store {store_external_id}")))
}

pub async fn find_by_id(executor: impl sqlx::PgExecutor<'_>, id: uuid::Uuid) -> RepoResult<Store> {
    sqlx::query_as("SELECT * FROM stores WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("store {id}")))
}

/// `PUT /api/v1/stores/:id` (§6): general attribute update keyed by the
/// internal id, as opposed to [`upsert`] which is keyed by
/// `store_external_id` for the ingest path. Slug is recomputed from `name`
/// on every write (§3 "Store").
pub async fn update_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: uuid::Uuid,
    input: &StoreUpdate,
) -> RepoResult<Store> {
    let slug = slugify(&input.name);
    sqlx::query_as(
        r#"
        UPDATE stores SET
            name = $2,
            slug = $3,
            store_type = $4,
            address_line1 = $5,
            address_line2 = $6,
            city = $7,
            region = $8,
            postal_code = $9,
            country = $10,
            latitude = $11,
            longitude = $12,
            is_active = $13,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&slug)
    .bind(&input.store_type)
    .bind(&input.address_line1)
    .bind(&input.address_line2)
    .bind(&input.city)
    .bind(&input.region)
    .bind(&input.postal_code)
    .bind(&input.country)
    .bind(input.latitude)
    .bind(input.longitude)
    .bind(input.is_active)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("store {id}")))
}

pub async fn set_active(executor: impl sqlx::PgExecutor<'_>, id: uuid::Uuid, is_active: bool) -> RepoResult<Store> {
    sqlx::query_as("UPDATE stores SET is_active = $2, updated_at = now() WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(is_active)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("store {id}")))
}
