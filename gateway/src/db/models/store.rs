//! Store model (§3 "Store").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Store {
    pub id: Uuid,
    pub store_external_id: String,
    pub name: String,
    pub slug: String,
    pub store_type: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inbound shape for an upsert-by-`store_external_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreUpsert {
    pub store_external_id: String,
    pub name: String,
    pub store_type: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Inbound shape for `PUT /api/v1/stores/:id` — keyed by the path's internal
/// id rather than `store_external_id`, so that column is not part of the
/// update body.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreUpdate {
    pub name: String,
    pub store_type: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Derive a URL-safe slug from a display name, lower-cased with runs of
/// non-alphanumerics collapsed to a single `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_runs_of_separators() {
        assert_eq!(slugify("Coca-Cola  Soft Drink!"), "coca-cola-soft-drink");
    }

    #[test]
    fn slugify_trims_trailing_separators() {
        assert_eq!(slugify("Acme Corp."), "acme-corp");
    }
}
