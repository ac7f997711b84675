//! Integration tests for the bulk stock-update orchestrator (§4.7).
//!
//! Requires a reachable Postgres at `TEST_DATABASE_URL` — see
//! `tests/common/mod.rs`.

mod common;

use catalog_gateway::db::models::store_product::{StockUpdateEntry, StockUpdateRequest, VariantStockUpdateEntry};
use catalog_gateway::orchestrator::ingest::{self, IngestRequest};
use catalog_gateway::orchestrator::stock;
use rust_decimal::Decimal;

#[tokio::test]
async fn stock_update_tolerates_unknown_products_and_variants() {
    let db = common::test_db().await;

    let store_external_id = common::unique("store");
    let known_product_id = common::unique("sp");
    let known_variation_id = common::unique("var");

    let mut product = common::sample_product("Orange Juice 1L", &known_product_id, None, vec![]);
    product.variations = vec![common::sample_variation(&known_variation_id, Decimal::new(399, 2), 20)];

    ingest::run(
        &db,
        &IngestRequest {
            store: common::sample_store(&store_external_id),
            categories: vec![],
            taxes: vec![],
            products: vec![product],
        },
    )
    .await
    .expect("seed push should succeed");

    let request = StockUpdateRequest {
        store_external_id: store_external_id.clone(),
        products: vec![
            StockUpdateEntry {
                product_external_id: known_product_id.clone(),
                stock: 3,
                available: true,
                price: Some(Decimal::new(429, 2)),
                variants: vec![
                    VariantStockUpdateEntry {
                        variation_external_id: known_variation_id.clone(),
                        stock: 8,
                        available: true,
                        price: None,
                    },
                    VariantStockUpdateEntry {
                        variation_external_id: common::unique("var-missing"),
                        stock: 1,
                        available: true,
                        price: None,
                    },
                ],
            },
            StockUpdateEntry {
                product_external_id: common::unique("sp-missing"),
                stock: 7,
                available: true,
                price: None,
                variants: vec![],
            },
        ],
    };

    let counters = stock::run(&db, &request).await.expect("stock update should not abort on misses");

    assert_eq!(counters.updated, 1, "the one known product was updated");
    assert_eq!(counters.not_found, 1, "the unknown product is counted, not fatal");
    assert_eq!(counters.variants_updated, 1, "the one known variant was updated");
    assert_eq!(counters.variants_not_found, 1, "the unknown variant is counted, not fatal");
}

#[tokio::test]
async fn zero_or_negative_price_leaves_stored_price_untouched() {
    let db = common::test_db().await;

    let store_external_id = common::unique("store");
    let product_external_id = common::unique("sp");

    ingest::run(
        &db,
        &IngestRequest {
            store: common::sample_store(&store_external_id),
            categories: vec![],
            taxes: vec![],
            products: vec![common::sample_product("Granola Bar", &product_external_id, None, vec![])],
        },
    )
    .await
    .unwrap();

    let request = StockUpdateRequest {
        store_external_id,
        products: vec![StockUpdateEntry {
            product_external_id,
            stock: 2,
            available: true,
            price: Some(Decimal::ZERO),
            variants: vec![],
        }],
    };

    let counters = stock::run(&db, &request).await.unwrap();
    assert_eq!(counters.updated, 1);
    // a zero/negative price is not applied (§4.7: "if price is positive");
    // the push's original price (5.49) should still be in effect, which the
    // repository layer itself already covers — this test only pins that the
    // orchestrator does not error out on the edge-case input.
}
