//! Three-layer product resolution (§4.5), evaluated in order — first
//! positive match wins.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::normalize::{extract_volume_ml, extract_weight_g, normalize_name};
use crate::db::models::Product;
use crate::db::repository::RepoResult;

/// Fuzzy-match acceptance threshold (§4.5 layer 3, §9 open question: not
/// made configurable in this revision).
pub const FUZZY_THRESHOLD: f64 = 0.45;
/// Volume/weight tolerance for layer-2 matching, in the extracted unit
/// (ml or g).
pub const UNIT_TOLERANCE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLayer {
    ExactBinding,
    ExactBarcode,
    ExactEan,
    ExactSku,
    Normalized,
    Fuzzy,
    None,
}

#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub product_id: Option<Uuid>,
    pub layer: MatchLayer,
    pub confidence: f64,
}

impl MatchOutcome {
    fn none() -> Self {
        Self {
            product_id: None,
            layer: MatchLayer::None,
            confidence: 0.0,
        }
    }

    fn found(product_id: Uuid, layer: MatchLayer, confidence: f64) -> Self {
        Self {
            product_id: Some(product_id),
            layer,
            confidence,
        }
    }
}

pub struct IncomingMatchInput<'a> {
    pub store_id: Uuid,
    pub store_external_product_id: Option<&'a str>,
    pub barcode: Option<&'a str>,
    pub ean: Option<&'a str>,
    pub sku: Option<&'a str>,
    pub name: &'a str,
}

/// Run the three-layer match. Returns `MatchOutcome::none()`-shaped result
/// (`product_id: None`) when nothing matches, meaning the caller must create
/// a new product.
pub async fn resolve(
    tx: &mut Transaction<'_, Postgres>,
    input: &IncomingMatchInput<'_>,
) -> RepoResult<MatchOutcome> {
    // Layer 1a: an existing store-product binding for this store's external id
    // takes priority over every global identifier, so that once a store has
    // pinned (store_external_product_id -> product_id), later ingests from
    // the same store always resolve to it even if name/barcode later change.
    if let Some(external_id) = input.store_external_product_id {
        let existing: Option<Uuid> = sqlx::query_scalar(
            "SELECT product_id FROM store_products WHERE store_id = $1 AND store_external_product_id = $2",
        )
        .bind(input.store_id)
        .bind(external_id)
        .fetch_optional(&mut **tx)
        .await?;
        if let Some(product_id) = existing {
            return Ok(MatchOutcome::found(product_id, MatchLayer::ExactBinding, 100.0));
        }
    }

    if let Some(barcode) = input.barcode {
        if let Some(id) = find_active_by_column(tx, "barcode", barcode).await? {
            return Ok(MatchOutcome::found(id, MatchLayer::ExactBarcode, 100.0));
        }
    }

    if let Some(ean) = input.ean {
        if let Some(id) = find_active_by_column(tx, "ean", ean).await? {
            return Ok(MatchOutcome::found(id, MatchLayer::ExactEan, 100.0));
        }
    }

    if let Some(sku) = input.sku {
        if let Some(id) = find_active_by_column(tx, "sku", sku).await? {
            return Ok(MatchOutcome::found(id, MatchLayer::ExactSku, 98.0));
        }
    }

    // Layer 2: normalized name plus volume/weight tolerance.
    let normalized = normalize_name(input.name);
    let incoming_volume = extract_volume_ml(input.name);
    let incoming_weight = extract_weight_g(input.name);

    let candidates: Vec<Product> =
        sqlx::query_as("SELECT * FROM products WHERE normalized_name = $1 AND is_active = true")
            .bind(&normalized)
            .fetch_all(&mut **tx)
            .await?;

    for candidate in &candidates {
        if let (Some(incoming), Some(existing)) = (incoming_volume, candidate.extracted_volume_ml) {
            if (incoming - existing).abs() < UNIT_TOLERANCE {
                return Ok(MatchOutcome::found(candidate.id, MatchLayer::Normalized, 95.0));
            }
        } else if let (Some(incoming), Some(existing)) = (incoming_weight, candidate.extracted_weight_g) {
            if (incoming - existing).abs() < UNIT_TOLERANCE {
                return Ok(MatchOutcome::found(candidate.id, MatchLayer::Normalized, 95.0));
            }
        }
    }

    // Layer 3: trigram similarity against every active product, highest wins,
    // ties broken by most recently updated.
    let all_active: Vec<Product> = sqlx::query_as("SELECT * FROM products WHERE is_active = true")
        .fetch_all(&mut **tx)
        .await?;

    let mut best: Option<(f64, &Product)> = None;
    for candidate in &all_active {
        let score = trigram_similarity(input.name, &candidate.name);
        if score <= FUZZY_THRESHOLD {
            continue;
        }
        best = Some(match best {
            None => (score, candidate),
            Some((best_score, best_candidate)) => {
                if score > best_score
                    || (score == best_score && more_recent(candidate, best_candidate))
                {
                    (score, candidate)
                } else {
                    (best_score, best_candidate)
                }
            }
        });
    }

    if let Some((score, candidate)) = best {
        return Ok(MatchOutcome::found(candidate.id, MatchLayer::Fuzzy, score * 100.0));
    }

    Ok(MatchOutcome::none())
}

fn more_recent(a: &Product, b: &Product) -> bool {
    updated_at(a) > updated_at(b)
}

fn updated_at(p: &Product) -> DateTime<Utc> {
    p.updated_at
}

async fn find_active_by_column(
    tx: &mut Transaction<'_, Postgres>,
    column: &str,
    value: &str,
) -> RepoResult<Option<Uuid>> {
    // `column` is always one of a fixed internal set of literals
    // ("barcode" | "ean" | "sku"), never user input, so string-built SQL here
    // carries no injection risk.
    let sql = format!("SELECT id FROM products WHERE {column} = $1 AND is_active = true LIMIT 1");
    let id: Option<Uuid> = sqlx::query_scalar(&sql).bind(value).fetch_optional(&mut **tx).await?;
    Ok(id)
}

/// Dice coefficient over character trigrams — a whole-string-level
/// similarity more forgiving of word reordering than edit distance, matching
/// the common "trigram similarity" used by relational stores' own fuzzy
/// search extensions.
pub fn trigram_similarity(a: &str, b: &str) -> f64 {
    let a_grams = trigrams(a);
    let b_grams = trigrams(b);

    if a_grams.is_empty() || b_grams.is_empty() {
        return if a.eq_ignore_ascii_case(b) { 1.0 } else { 0.0 };
    }

    let mut shared = 0usize;
    let mut b_remaining = b_grams.clone();
    for gram in &a_grams {
        if let Some(pos) = b_remaining.iter().position(|g| g == gram) {
            b_remaining.remove(pos);
            shared += 1;
        }
    }

    (2.0 * shared as f64) / (a_grams.len() + b_grams.len()) as f64
}

fn trigrams(s: &str) -> Vec<String> {
    let normalized: Vec<char> = format!("  {}  ", s.to_lowercase()).chars().collect();
    if normalized.len() < 3 {
        return Vec::new();
    }
    normalized.windows(3).map(|w| w.iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigram_similarity_is_one_for_identical_strings() {
        assert_eq!(trigram_similarity("Coca Cola", "Coca Cola"), 1.0);
    }

    #[test]
    fn trigram_similarity_is_symmetric() {
        assert_eq!(
            trigram_similarity("Coca Cola 1L", "Coke 1000ml"),
            trigram_similarity("Coke 1000ml", "Coca Cola 1L")
        );
    }

    #[test]
    fn trigram_similarity_of_unrelated_strings_is_low() {
        assert!(trigram_similarity("Coca Cola", "Printer Paper") < FUZZY_THRESHOLD);
    }
}
