//! Category model (§3 "Category").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub category_external_id: String,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryUpsert {
    pub category_external_id: String,
    pub parent_external_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
}
