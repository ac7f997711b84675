//! Product and ProductImage models (§3 "Product", "ProductImage").

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub sku: Option<String>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub base_price: Decimal,
    pub currency: String,
    pub unit: Option<String>,
    pub unit_quantity: Option<Decimal>,
    pub primary_image_url: Option<String>,
    pub brand_id: Option<Uuid>,
    pub manufacturer: Option<String>,
    pub barcode: Option<String>,
    pub ean: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub is_customizable: bool,
    pub is_addon: bool,
    pub requires_prescription: bool,
    pub normalized_name: String,
    pub extracted_volume_ml: Option<f64>,
    pub extracted_weight_g: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inbound product description from an upstream system, as accepted by the
/// ingest orchestrator before it runs §4.5 resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingProduct {
    pub name: String,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub ean: Option<String>,
    pub description: Option<String>,
    pub category_external_id: Option<String>,
    pub brand: Option<String>,
    pub manufacturer: Option<String>,
    pub base_price: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub unit: Option<String>,
    pub unit_quantity: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<IncomingProductImage>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_customizable: bool,
    #[serde(default)]
    pub is_addon: bool,
    #[serde(default)]
    pub requires_prescription: bool,
    /// Tax codes to link once the store-product exists (§4.6 step 7).
    #[serde(default)]
    pub taxes: Vec<String>,
    /// The upstream system's identifier for this product within the store,
    /// pinned onto the resulting store-product binding (§4.5 layer 1a).
    pub store_external_product_id: Option<String>,
    pub price: Option<Decimal>,
    /// `None` when the caller supplied no explicit store-product stock data
    /// at all — distinct from an explicit `0` — so the synthesized
    /// store-product can default to "stock = 0, in-stock = true" (§4.6
    /// "Simplified input shape") rather than mechanically deriving
    /// `in_stock` from an absent quantity.
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub variations: Vec<IncomingVariation>,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingProductImage {
    pub url: String,
    #[serde(default)]
    pub ordinal: i32,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingVariation {
    pub variation_external_id: Option<String>,
    pub name: String,
    pub display_name: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub url: String,
    pub ordinal: i32,
    pub is_primary: bool,
}

/// Shape accepted by the legacy `POST /api/v1/products/bulk` route — a
/// flat product create that predates §4.5 resolution and store-binding:
/// it inserts bare product rows with no store scope and no three-layer
/// matching, kept only for callers that have not migrated to `/push`.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyProductCreate {
    pub name: String,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub ean: Option<String>,
    pub description: Option<String>,
    pub base_price: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub unit: Option<String>,
    pub unit_quantity: Option<Decimal>,
    #[serde(default)]
    pub is_active: bool,
}
