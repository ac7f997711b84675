//! StoreProductTax model (§3 "StoreProductTax"): links a store-product to a
//! tax scoped to the same store.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct StoreProductTax {
    pub store_id: Uuid,
    pub store_product_id: Uuid,
    pub tax_id: Uuid,
}
