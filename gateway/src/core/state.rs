//! Shared application state (§9 design note: "global mutable state... build
//! once at boot, pass through a context struct, never mutate").
//!
//! Mirrors `edge-server`'s `ServerState::initialize` shape — services
//! constructed in dependency order inside one async constructor — scaled
//! down to this gateway's three collaborators: the cache client, the
//! relational pool, and the origin client. Config and the bearer-token set
//! it carries are read-only after boot and shared across tasks without
//! synchronization, as `Arc` clones.
use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheClient;
use crate::core::config::Config;
use crate::db::DbService;
use crate::origin::OriginClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Option<CacheClient>,
    pub db: DbService,
    pub origin: OriginClient,
}

impl AppState {
    /// Build every collaborator. A cache connection failure is advisory
    /// (§4.1: "Ping on startup ... failure does not abort the process") —
    /// the gateway still boots in degraded mode with `cache: None`; a
    /// relational-store or origin-client construction failure is not
    /// advisory and aborts boot, since every route needs at least one of
    /// them reachable in principle.
    pub async fn initialize(config: Config) -> anyhow::Result<Self> {
        let db = DbService::connect(&config)
            .await
            .map_err(|e| anyhow::anyhow!("failed to connect to relational store: {e}"))?;

        let origin = OriginClient::new(config.origin_base_url.clone(), config.origin_api_key.clone());

        let cache = match CacheClient::connect(&config.cache_url()).await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "cache unreachable at boot, starting in degraded mode");
                None
            }
        };

        Ok(Self {
            config: Arc::new(config),
            cache,
            db,
            origin,
        })
    }

    pub fn request_deadline(&self) -> Duration {
        self.config.request_timeout
    }

    pub fn cache_ttl(&self) -> Duration {
        self.config.cache_ttl
    }

    /// Close the relational pool on shutdown (§6 "Exit behavior"). The cache
    /// client wraps a `redis::aio::ConnectionManager`, which has no explicit
    /// close — it is simply dropped with the last `AppState` clone.
    pub async fn close(&self) {
        self.db.close().await;
    }
}
