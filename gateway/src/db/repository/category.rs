use sqlx::{Postgres, Transaction};

use super::RepoResult;
use crate::db::models::category::CategoryUpsert;
use crate::db::models::Category;
use crate::db::models::store::slugify;

/// Upsert a batch of categories, roots first then children, as required by
/// §4.6 step 2 (a child's parent external id must already resolve).
pub async fn upsert_batch(
    tx: &mut Transaction<'_, Postgres>,
    categories: &[CategoryUpsert],
) -> RepoResult<(Vec<Category>, u32, u32)> {
    let (roots, children): (Vec<_>, Vec<_>) = categories
        .iter()
        .partition(|c| c.parent_external_id.is_none());

    let mut created = 0u32;
    let mut updated = 0u32;
    let mut out = Vec::with_capacity(categories.len());

    for input in roots.iter().chain(children.iter()) {
        let parent_id = match &input.parent_external_id {
            Some(parent_external_id) => {
                let parent: Category = sqlx::query_as(
                    "SELECT * FROM categories WHERE category_external_id = $1",
                )
                .bind(parent_external_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| {
                    super::RepoError::NotFound(format!(
                        "parent category {parent_external_id} not found"
                    ))
                })?;
                Some(parent.id)
            }
            None => None,
        };

        let existed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE category_external_id = $1)",
        )
        .bind(&input.category_external_id)
        .fetch_one(&mut **tx)
        .await?;

        let slug = slugify(&input.name);
        let category: Category = sqlx::query_as(
            r#"
            INSERT INTO categories (category_external_id, parent_id, name, slug, sort_order, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, now(), now())
            ON CONFLICT (category_external_id) DO UPDATE SET
                parent_id = EXCLUDED.parent_id,
                name = EXCLUDED.name,
                slug = EXCLUDED.slug,
                sort_order = EXCLUDED.sort_order,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(&input.category_external_id)
        .bind(parent_id)
        .bind(&input.name)
        .bind(&slug)
        .bind(input.sort_order)
        .fetch_one(&mut **tx)
        .await?;

        if existed {
            updated += 1;
        } else {
            created += 1;
        }
        out.push(category);
    }

    Ok((out, created, updated))
}
