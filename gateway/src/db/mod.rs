//! Relational repository layer (component D).
//!
//! `DbService` owns the single connection pool to the relational store,
//! tuned from [`crate::core::config::Config`] the way `edge-server`'s
//! `DbService` tunes its embedded pool — only the engine changed, from an
//! embedded file to a networked Postgres-wire-protocol store, since the
//! external interface requires a connection URL that itself carries pool
//! tuning (max/min connections, idle timeout, max lifetime).

pub mod models;
pub mod repository;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres};
use std::time::Duration;

use crate::core::config::Config;

#[derive(Clone)]
pub struct DbService {
    pool: PgPool,
}

impl DbService {
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        let options: PgConnectOptions = config.database_url.parse()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .min_connections(config.db_min_connections)
            .idle_timeout(Some(config.db_idle_timeout))
            .max_lifetime(Some(config.db_max_lifetime))
            .acquire_timeout(config.request_timeout)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations")
            .set_ignore_missing(true)
            .run(&pool)
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
        tracing::info!("relational store migrations applied");

        Ok(Self { pool })
    }

    /// Close the pool, waiting for in-flight connections to be returned
    /// (§6 "Exit behavior": "close the relational pool").
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Test-only constructor: point a `DbService` at an already-open pool
    /// (e.g. an in-memory SQLite pool set up with the same table shapes).
    #[cfg(test)]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<sqlx::Transaction<'_, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Cheap liveness probe used by the health endpoint.
    pub async fn ping(&self, deadline: Duration) -> Result<(), sqlx::Error> {
        tokio::time::timeout(deadline, sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .map_err(|_| sqlx::Error::PoolTimedOut)??;
        Ok(())
    }
}
