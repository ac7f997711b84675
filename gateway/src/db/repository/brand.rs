use sqlx::{Postgres, Transaction};

use super::RepoResult;
use crate::db::models::store::slugify;
use crate::db::models::Brand;
use crate::resolution::normalize::normalize_name;

/// Find-or-create a brand by name (§4.5 "Brand find-or-create"): try exact
/// name, then normalized-name equality, then create with a disambiguated
/// slug on collision.
pub async fn find_or_create(tx: &mut Transaction<'_, Postgres>, name: &str) -> RepoResult<Brand> {
    if let Some(brand) = find_by_exact_name(tx, name).await? {
        return Ok(brand);
    }

    let normalized = normalize_name(name);
    if let Some(brand) = find_by_normalized_name(tx, &normalized).await? {
        return Ok(brand);
    }

    create_with_disambiguated_slug(tx, name, &normalized).await
}

async fn find_by_exact_name(tx: &mut Transaction<'_, Postgres>, name: &str) -> RepoResult<Option<Brand>> {
    Ok(sqlx::query_as("SELECT * FROM brands WHERE name = $1")
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?)
}

async fn find_by_normalized_name(
    tx: &mut Transaction<'_, Postgres>,
    normalized: &str,
) -> RepoResult<Option<Brand>> {
    Ok(sqlx::query_as("SELECT * FROM brands WHERE normalized_name = $1")
        .bind(normalized)
        .fetch_optional(&mut **tx)
        .await?)
}

async fn create_with_disambiguated_slug(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
    normalized: &str,
) -> RepoResult<Brand> {
    let base_slug = slugify(name);
    let mut slug = base_slug.clone();
    let mut suffix = 1u32;

    loop {
        let result: Result<Brand, sqlx::Error> = sqlx::query_as(
            "INSERT INTO brands (name, slug, normalized_name, created_at, updated_at) VALUES ($1, $2, $3, now(), now()) RETURNING *",
        )
        .bind(name)
        .bind(&slug)
        .bind(normalized)
        .fetch_one(&mut **tx)
        .await;

        match result {
            Ok(brand) => return Ok(brand),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                suffix += 1;
                slug = format!("{base_slug}-{suffix}");
            }
            Err(e) => return Err(e.into()),
        }
    }
}
