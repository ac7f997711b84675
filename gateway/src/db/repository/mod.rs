//! Relational repository layer.
//!
//! Each repository exposes plain async functions over any `sqlx` executor
//! (`&PgPool` for reads, `&mut Transaction<'_, Postgres>` inside the ingest
//! and stock-update transactions) rather than wrapping a connection itself —
//! `edge-server`'s `BaseRepository` wraps a single `Surreal<Db>` handle
//! because SurrealDB's session object IS its transaction boundary;
//! `sqlx::Postgres` makes the boundary an explicit `Transaction` value
//! instead, so the wrapper struct is unnecessary here and is dropped.
//!
//! Every query is built at runtime with `sqlx::query`/`query_as` — never the
//! `query!` compile-time macro, which needs a live `DATABASE_URL` to check
//! against and would make this repository uncompilable without one. This
//! matches `edge-server`'s own dynamically-built `UPDATE ... SET` statements
//! in `services/catalog_service.rs`.

pub mod brand;
pub mod category;
pub mod product;
pub mod store;
pub mod store_product;
pub mod store_product_tax;
pub mod tax;
pub mod variation;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("not found: {0}")]
    NotFound(String),
}

pub type RepoResult<T> = Result<T, RepoError>;
