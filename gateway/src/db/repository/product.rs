use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::{RepoError, RepoResult};
use crate::db::models::product::IncomingProduct;
use crate::db::models::store::slugify;
use crate::db::models::Product;
use crate::resolution::normalize::{extract_volume_ml, extract_weight_g, normalize_name};
use crate::resolution::{resolve, IncomingMatchInput};

/// Resolve `incoming` against the existing catalog (§4.5), then create or
/// update the product so its derived fields stay in sync with `name`
/// (§8 invariant). Returns the resolved product and whether it was created.
pub async fn resolve_and_upsert(
    tx: &mut Transaction<'_, Postgres>,
    store_id: Uuid,
    incoming: &IncomingProduct,
) -> RepoResult<(Product, bool)> {
    let brand_id = match &incoming.brand {
        Some(name) if !name.trim().is_empty() => {
            Some(super::brand::find_or_create(tx, name).await?.id)
        }
        _ => None,
    };

    let category_id = match &incoming.category_external_id {
        Some(external_id) => {
            let id: Option<Uuid> = sqlx::query_scalar(
                "SELECT id FROM categories WHERE category_external_id = $1",
            )
            .bind(external_id)
            .fetch_optional(&mut **tx)
            .await?;
            id
        }
        None => None,
    };

    let outcome = resolve(
        tx,
        &IncomingMatchInput {
            store_id,
            store_external_product_id: incoming.store_external_product_id.as_deref(),
            barcode: incoming.barcode.as_deref(),
            ean: incoming.ean.as_deref(),
            sku: incoming.sku.as_deref(),
            name: &incoming.name,
        },
    )
    .await?;

    let normalized_name = normalize_name(&incoming.name);
    let volume_ml = extract_volume_ml(&incoming.name);
    let weight_g = extract_weight_g(&incoming.name);
    let slug = slugify(&incoming.name);

    let (product, created) = match outcome.product_id {
        Some(product_id) => {
            let product: Product = sqlx::query_as(
                r#"
                UPDATE products SET
                    sku = COALESCE($2, sku),
                    name = $3,
                    slug = $4,
                    description = COALESCE($5, description),
                    category_id = COALESCE($6, category_id),
                    base_price = $7,
                    currency = $8,
                    unit = COALESCE($9, unit),
                    unit_quantity = COALESCE($10, unit_quantity),
                    brand_id = COALESCE($11, brand_id),
                    manufacturer = COALESCE($12, manufacturer),
                    barcode = COALESCE($13, barcode),
                    ean = COALESCE($14, ean),
                    is_active = $15,
                    is_featured = $16,
                    is_customizable = $17,
                    is_addon = $18,
                    requires_prescription = $19,
                    normalized_name = $20,
                    extracted_volume_ml = $21,
                    extracted_weight_g = $22,
                    updated_at = now()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(product_id)
            .bind(&incoming.sku)
            .bind(&incoming.name)
            .bind(&slug)
            .bind(&incoming.description)
            .bind(category_id)
            .bind(incoming.base_price)
            .bind(&incoming.currency)
            .bind(&incoming.unit)
            .bind(incoming.unit_quantity)
            .bind(brand_id)
            .bind(&incoming.manufacturer)
            .bind(&incoming.barcode)
            .bind(&incoming.ean)
            .bind(incoming.is_active)
            .bind(incoming.is_featured)
            .bind(incoming.is_customizable)
            .bind(incoming.is_addon)
            .bind(incoming.requires_prescription)
            .bind(&normalized_name)
            .bind(volume_ml)
            .bind(weight_g)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("product {product_id}")))?;
            (product, false)
        }
        None => {
            let product: Product = sqlx::query_as(
                r#"
                INSERT INTO products (
                    sku, name, slug, description, category_id, base_price, currency, unit,
                    unit_quantity, brand_id, manufacturer, barcode, ean, is_active, is_featured,
                    is_customizable, is_addon, requires_prescription, normalized_name,
                    extracted_volume_ml, extracted_weight_g, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, now(), now())
                RETURNING *
                "#,
            )
            .bind(&incoming.sku)
            .bind(&incoming.name)
            .bind(&slug)
            .bind(&incoming.description)
            .bind(category_id)
            .bind(incoming.base_price)
            .bind(&incoming.currency)
            .bind(&incoming.unit)
            .bind(incoming.unit_quantity)
            .bind(brand_id)
            .bind(&incoming.manufacturer)
            .bind(&incoming.barcode)
            .bind(&incoming.ean)
            .bind(incoming.is_active)
            .bind(incoming.is_featured)
            .bind(incoming.is_customizable)
            .bind(incoming.is_addon)
            .bind(incoming.requires_prescription)
            .bind(&normalized_name)
            .bind(volume_ml)
            .bind(weight_g)
            .fetch_one(&mut **tx)
            .await?;
            (product, true)
        }
    };

    upsert_images(tx, product.id, &incoming.images).await?;

    Ok((product, created))
}

async fn upsert_images(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    images: &[crate::db::models::product::IncomingProductImage],
) -> RepoResult<()> {
    for image in images {
        sqlx::query(
            r#"
            INSERT INTO product_images (product_id, url, ordinal, is_primary)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (product_id, url) DO UPDATE SET
                ordinal = EXCLUDED.ordinal,
                is_primary = EXCLUDED.is_primary
            "#,
        )
        .bind(product_id)
        .bind(&image.url)
        .bind(image.ordinal)
        .bind(image.is_primary)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

pub async fn find_by_id(executor: impl sqlx::PgExecutor<'_>, id: Uuid) -> RepoResult<Product> {
    sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("product {id}")))
}

/// Legacy flat create (§6 `POST /api/v1/products/bulk`): no three-layer
/// resolution, no store binding — a plain insert with derived fields kept
/// in sync, same as every other write path (§8 invariant).
pub async fn create_simple(
    executor: impl sqlx::PgExecutor<'_>,
    input: &super::super::models::product::LegacyProductCreate,
) -> RepoResult<Product> {
    let normalized_name = normalize_name(&input.name);
    let volume_ml = extract_volume_ml(&input.name);
    let weight_g = extract_weight_g(&input.name);
    let slug = slugify(&input.name);

    let product: Product = sqlx::query_as(
        r#"
        INSERT INTO products (
            sku, name, slug, description, base_price, currency, unit, unit_quantity,
            barcode, ean, is_active, normalized_name, extracted_volume_ml, extracted_weight_g,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, now(), now())
        RETURNING *
        "#,
    )
    .bind(&input.sku)
    .bind(&input.name)
    .bind(&slug)
    .bind(&input.description)
    .bind(input.base_price)
    .bind(&input.currency)
    .bind(&input.unit)
    .bind(input.unit_quantity)
    .bind(&input.barcode)
    .bind(&input.ean)
    .bind(input.is_active)
    .bind(&normalized_name)
    .bind(volume_ml)
    .bind(weight_g)
    .fetch_one(executor)
    .await?;

    Ok(product)
}

/// All active products sharing a `normalized_name` (§4.5 layer 2 candidate
/// set) — exposed for tests; the resolution engine queries this inline
/// rather than through this helper since it also needs the transaction.
pub async fn find_by_normalized_name(
    executor: impl sqlx::PgExecutor<'_>,
    normalized_name: &str,
) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as("SELECT * FROM products WHERE normalized_name = $1 AND is_active = true")
        .bind(normalized_name)
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

/// `PUT /api/v1/products/:id/status` (§6): toggle a product's global active
/// flag.
pub async fn set_active(executor: impl sqlx::PgExecutor<'_>, id: Uuid, is_active: bool) -> RepoResult<Product> {
    sqlx::query_as("UPDATE products SET is_active = $2, updated_at = now() WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(is_active)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("product {id}")))
}
