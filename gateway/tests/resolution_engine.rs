//! Integration tests for the three-layer resolution engine (§4.5), driven
//! through the ingest orchestrator (component G) rather than calling
//! `resolution::matcher::resolve` directly, since the match depends on rows
//! already committed by a prior ingest.
//!
//! Requires a reachable Postgres at `TEST_DATABASE_URL` — see
//! `tests/common/mod.rs`.

mod common;

use catalog_gateway::db::repository::product;
use catalog_gateway::orchestrator::ingest::{self, IngestRequest};

#[tokio::test]
async fn same_barcode_from_two_stores_collapses_to_one_product() {
    let db = common::test_db().await;

    let store_a = common::unique("store-a");
    let store_b = common::unique("store-b");
    let barcode = common::unique("barcode");

    let mut first_product = common::sample_product("Coca Cola 1L", &common::unique("sp"), None, vec![]);
    first_product.barcode = Some(barcode.clone());

    let first = IngestRequest {
        store: common::sample_store(&store_a),
        categories: vec![],
        taxes: vec![],
        products: vec![first_product],
    };
    let first_counters = ingest::run(&db, &first).await.expect("first ingest should succeed");
    assert_eq!(first_counters.created, 2, "store + product are new");

    let mut second_product = common::sample_product("Coke 1000ml", &common::unique("sp"), None, vec![]);
    second_product.barcode = Some(barcode.clone());

    let second = IngestRequest {
        store: common::sample_store(&store_b),
        categories: vec![],
        taxes: vec![],
        products: vec![second_product],
    };
    let second_counters = ingest::run(&db, &second).await.expect("second ingest should succeed");

    assert_eq!(second_counters.created, 1, "only the new store is created, not a new product");
    assert_eq!(second_counters.updated, 1, "the existing product matched by barcode is updated, not duplicated");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE barcode = $1")
        .bind(&barcode)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count, 1, "exactly one internal product exists for the shared barcode");

    let sp_count: i64 =
        sqlx::query_scalar("SELECT COUNT(DISTINCT store_id) FROM store_products sp JOIN products p ON p.id = sp.product_id WHERE p.barcode = $1")
            .bind(&barcode)
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(sp_count, 2, "both store-products reference the same collapsed product");
}

#[tokio::test]
async fn normalized_name_and_volume_match_updates_instead_of_creating() {
    let db = common::test_db().await;

    let store_external_id = common::unique("store");

    // Both normalize to "orange juice 1 l" (filler tokens and unit spelling
    // stripped — see resolution::normalize::normalize_name) and both extract
    // a volume of 1000ml, so the second ingest must land on layer 2 rather
    // than creating a second product.
    let seed = common::sample_product("Orange Juice 1 L", &common::unique("sp"), None, vec![]);

    let request = IngestRequest {
        store: common::sample_store(&store_external_id),
        categories: vec![],
        taxes: vec![],
        products: vec![seed],
    };
    let seed_counters = ingest::run(&db, &request).await.expect("seed ingest should succeed");
    assert_eq!(seed_counters.created, 2);

    let incoming_name = "Orange Juice Soft Drink 1 Litre Bottle";
    let incoming = common::sample_product(incoming_name, &common::unique("sp"), None, vec![]);

    let follow_up = IngestRequest {
        store: common::sample_store(&store_external_id),
        categories: vec![],
        taxes: vec![],
        products: vec![incoming],
    };
    let follow_up_counters = ingest::run(&db, &follow_up).await.expect("follow-up ingest should succeed");

    assert_eq!(follow_up_counters.created, 0, "store already exists and the product matched at layer 2");
    assert_eq!(follow_up_counters.updated, 2, "store and the matched product are both updated");

    let products = product::find_by_normalized_name(db.pool(), "orange juice 1 l")
        .await
        .expect("lookup by normalized name should succeed");
    assert_eq!(products.len(), 1, "only one product row exists for the collapsed normalized name");
    assert_eq!(products[0].name, incoming_name, "the matched row was updated in place with the later name");
}
