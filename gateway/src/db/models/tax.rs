//! Tax model (§3 "Tax"), scoped to a store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaxType {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tax {
    pub id: Uuid,
    pub store_id: Uuid,
    pub tax_external_id: String,
    pub tax_code: String,
    pub name: String,
    pub rate: Decimal,
    pub tax_type: TaxType,
    pub inclusive: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaxUpsert {
    pub tax_external_id: String,
    pub tax_code: String,
    pub name: String,
    pub rate: Decimal,
    pub tax_type: TaxType,
    #[serde(default)]
    pub inclusive: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
