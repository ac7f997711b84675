//! StoreProduct model (§3 "StoreProduct"): the store-specific binding of a
//! global product.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoreProduct {
    pub id: Uuid,
    pub store_id: Uuid,
    pub product_id: Uuid,
    pub store_external_product_id: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub in_stock: bool,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry of a bulk stock-update payload (§4.7).
#[derive(Debug, Clone, Deserialize)]
pub struct StockUpdateEntry {
    pub product_external_id: String,
    pub stock: i32,
    pub available: bool,
    pub price: Option<Decimal>,
    #[serde(default)]
    pub variants: Vec<VariantStockUpdateEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantStockUpdateEntry {
    pub variation_external_id: String,
    pub stock: i32,
    pub available: bool,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockUpdateRequest {
    pub store_external_id: String,
    pub products: Vec<StockUpdateEntry>,
}

/// Counters returned by a bulk stock update (§4.7).
#[derive(Debug, Clone, Default, Serialize)]
pub struct StockUpdateCounters {
    pub updated: u32,
    pub not_found: u32,
    pub variants_updated: u32,
    pub variants_not_found: u32,
}
