//! Variation model (§3 "Variation"): a size/pack option on a store-product.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Variation {
    pub id: Uuid,
    pub store_product_id: Uuid,
    pub variation_external_id: Option<String>,
    pub name: String,
    pub display_name: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub in_stock: bool,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
